// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

#[derive(
    DieselNewType, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize,
)]
pub struct RecipeId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub prep_time: String,
    pub cook_time: String,
    pub comments: String,
    pub image_path: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeHandle {
    pub id: RecipeId,
    pub name: String,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct IngredientEntry {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub position: i32,
    pub name: String,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct InstructionId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::instructions)]
pub struct InstructionEntry {
    pub id: InstructionId,
    pub recipe_id: RecipeId,
    pub step: i32,
    pub body: String,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct CategoryId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct CalendarDayId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::calendar_days)]
pub struct CalendarDay {
    pub id: CalendarDayId,
    pub day: chrono::NaiveDate,
}

#[derive(
    Debug,
    Display,
    EnumIter,
    Hash,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    DbEnum,
    Serialize,
    Deserialize,
)]
pub enum MealSlot {
    #[display("Breakfast")]
    Breakfast,
    #[display("Lunch")]
    Lunch,
    #[display("Dinner")]
    Dinner,
}

impl MealSlot {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MealId(i32);

/// A meal with no recipe is an empty slot, same as having no meal at all.
#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(belongs_to(CalendarDay))]
#[diesel(table_name = crate::database::schema::meals)]
pub struct Meal {
    pub id: MealId,
    pub calendar_day_id: CalendarDayId,
    pub slot: MealSlot,
    pub recipe_id: Option<RecipeId>,
}

#[cfg(test)]
impl RecipeId {
    pub fn for_test(id: i32) -> Self {
        Self(id)
    }
}
