// Copyright 2023 Remi Bernotavicius

//! Meal planning logic that works purely on in-memory values: week windows, the per-day meal
//! plan and the grocery list derived from it.

mod calendar;
mod groceries;
mod recipe;
mod week;

pub use calendar::{DayPlan, WeekPlan};
pub use groceries::aggregate_groceries;
pub use recipe::{validate_name, RecipeDraft, ValidationError};
pub use week::{
    full_day_name, is_within_window, next_week, previous_week, this_week, week_dates, week_end,
    week_of, week_span,
};
