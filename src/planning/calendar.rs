// Copyright 2023 Remi Bernotavicius

use super::week::{is_within_window, week_dates};
use crate::database::models::{MealSlot, RecipeId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// What is planned for one calendar date. A slot holding `None` is empty, whether or not a meal
/// record happens to exist for it in storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub breakfast: Option<RecipeId>,
    pub lunch: Option<RecipeId>,
    pub dinner: Option<RecipeId>,
}

impl DayPlan {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            breakfast: None,
            lunch: None,
            dinner: None,
        }
    }

    pub fn slot(&self, slot: MealSlot) -> Option<RecipeId> {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::Lunch => self.lunch,
            MealSlot::Dinner => self.dinner,
        }
    }

    pub fn set_slot(&mut self, slot: MealSlot, recipe: Option<RecipeId>) {
        let s = match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        };
        *s = recipe;
    }

    pub fn recipes(&self) -> impl Iterator<Item = RecipeId> + '_ {
        MealSlot::iter().filter_map(|slot| self.slot(slot))
    }

    pub fn is_empty(&self) -> bool {
        self.recipes().next().is_none()
    }
}

pub fn find_day(days: &[DayPlan], date: NaiveDate) -> Option<&DayPlan> {
    days.iter().find(|d| d.date == date)
}

#[derive(Clone, Debug, Default)]
pub struct WeekPlan {
    start: NaiveDate,
    days: Vec<DayPlan>,
    names: HashMap<RecipeId, String>,
}

impl WeekPlan {
    /// Days outside the week starting at `start` are dropped.
    pub fn new(
        start: NaiveDate,
        mut days: Vec<DayPlan>,
        names: HashMap<RecipeId, String>,
    ) -> Self {
        days.retain(|d| is_within_window(start, d.date));
        days.sort_by_key(|d| d.date);
        Self { start, days, names }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn dates(&self) -> [NaiveDate; 7] {
        week_dates(self.start)
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        find_day(&self.days, date)
    }

    /// The recipe planned for a slot. A recipe whose name is unknown counts as not planned.
    pub fn meal(&self, date: NaiveDate, slot: MealSlot) -> Option<(RecipeId, &str)> {
        let id = self.day(date)?.slot(slot)?;
        self.names.get(&id).map(|name| (id, name.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(DayPlan::is_empty)
    }
}

#[test]
fn slots_round_trip() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
    let mut day = DayPlan::new(date);
    assert!(day.is_empty());

    day.set_slot(MealSlot::Dinner, Some(RecipeId::for_test(3)));
    day.set_slot(MealSlot::Breakfast, Some(RecipeId::for_test(1)));
    assert_eq!(day.slot(MealSlot::Dinner), Some(RecipeId::for_test(3)));
    assert_eq!(day.slot(MealSlot::Lunch), None);
    assert_eq!(
        day.recipes().collect::<Vec<_>>(),
        vec![RecipeId::for_test(1), RecipeId::for_test(3)]
    );

    day.set_slot(MealSlot::Breakfast, None);
    day.set_slot(MealSlot::Dinner, None);
    assert!(day.is_empty());
}

#[test]
fn find_day_matches_exact_date() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    let days = vec![DayPlan::new(d(3)), DayPlan::new(d(5))];

    assert_eq!(find_day(&days, d(5)).map(|p| p.date), Some(d(5)));
    assert!(find_day(&days, d(4)).is_none());
    assert!(find_day(&[], d(4)).is_none());
}

#[test]
fn week_plan_lookup() {
    use maplit::hashmap;

    let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    let soup = RecipeId::for_test(1);
    let gone = RecipeId::for_test(2);

    let mut tuesday = DayPlan::new(d(4));
    tuesday.set_slot(MealSlot::Lunch, Some(soup));
    tuesday.set_slot(MealSlot::Dinner, Some(gone));
    let mut next_monday = DayPlan::new(d(10));
    next_monday.set_slot(MealSlot::Lunch, Some(soup));

    let week = WeekPlan::new(
        d(3),
        vec![next_monday, tuesday],
        hashmap! { soup => "Soup".to_string() },
    );

    assert_eq!(week.days().len(), 1);
    assert_eq!(week.dates()[1], d(4));
    assert_eq!(week.meal(d(4), MealSlot::Lunch), Some((soup, "Soup")));
    assert_eq!(week.meal(d(4), MealSlot::Breakfast), None);
    assert_eq!(week.meal(d(4), MealSlot::Dinner), None);
    assert_eq!(week.meal(d(10), MealSlot::Lunch), None);
    assert!(!week.is_empty());
    assert!(WeekPlan::new(d(3), vec![], HashMap::new()).is_empty());
}
