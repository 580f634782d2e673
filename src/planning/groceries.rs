// Copyright 2023 Remi Bernotavicius

use super::calendar::DayPlan;
use super::week::is_within_window;
use crate::database::models::RecipeId;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Every ingredient needed for the meals planned in the week starting at `window_start`.
///
/// Days are visited in ascending date order and within a day breakfast, lunch then dinner.
/// Names are de-duplicated by exact, case-sensitive match keeping the first occurrence, so the
/// output order is the order ingredients are first needed in. Quantities are not modeled.
pub fn aggregate_groceries(
    window_start: NaiveDate,
    days: &[DayPlan],
    ingredients: &HashMap<RecipeId, Vec<String>>,
) -> Vec<String> {
    let mut in_window: Vec<&DayPlan> = days
        .iter()
        .filter(|d| is_within_window(window_start, d.date))
        .collect();
    in_window.sort_by_key(|d| d.date);

    let mut seen = HashSet::new();
    let mut list = vec![];
    for recipe in in_window.into_iter().flat_map(|d| d.recipes()) {
        for name in ingredients.get(&recipe).into_iter().flatten() {
            if seen.insert(name.as_str()) {
                list.push(name.clone());
            }
        }
    }
    list
}

#[cfg(test)]
fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[cfg(test)]
fn ingredient_map(recipes: &[(i32, &[&str])]) -> HashMap<RecipeId, Vec<String>> {
    recipes
        .iter()
        .map(|(id, names)| {
            (
                RecipeId::for_test(*id),
                names.iter().map(|n| n.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn week_example() {
    use crate::database::models::MealSlot;

    let toast = RecipeId::for_test(1);
    let cereal = RecipeId::for_test(2);
    let ingredients = ingredient_map(&[(1, &["Bread"]), (2, &["Cereal", "Milk"])]);

    let mut monday = DayPlan::new(date(3));
    monday.set_slot(MealSlot::Breakfast, Some(toast));
    let mut wednesday = DayPlan::new(date(5));
    wednesday.set_slot(MealSlot::Dinner, Some(cereal));

    // stored out of order on purpose
    let days = vec![wednesday, monday];
    assert_eq!(
        aggregate_groceries(date(3), &days, &ingredients),
        vec!["Bread", "Cereal", "Milk"]
    );
}

#[test]
fn first_seen_order_with_duplicates() {
    let ingredients = ingredient_map(&[(1, &["A", "B"]), (2, &["B", "C"])]);
    let mut day = DayPlan::new(date(4));
    day.breakfast = Some(RecipeId::for_test(1));
    day.lunch = Some(RecipeId::for_test(2));

    let list = aggregate_groceries(date(3), &[day.clone()], &ingredients);
    assert_eq!(list, vec!["A", "B", "C"]);

    // same data, same answer
    assert_eq!(aggregate_groceries(date(3), &[day], &ingredients), list);
}

#[test]
fn dedup_is_case_sensitive() {
    let ingredients = ingredient_map(&[(1, &["milk", "2 eggs"]), (2, &["Milk", "1 egg", "milk"])]);
    let mut day = DayPlan::new(date(6));
    day.lunch = Some(RecipeId::for_test(2));
    day.breakfast = Some(RecipeId::for_test(1));

    assert_eq!(
        aggregate_groceries(date(3), &[day], &ingredients),
        vec!["milk", "2 eggs", "Milk", "1 egg"]
    );
}

#[test]
fn only_days_inside_the_window() {
    let ingredients = ingredient_map(&[(1, &["Before"]), (2, &["Inside"]), (3, &["After"])]);
    let mut before = DayPlan::new(date(2));
    before.dinner = Some(RecipeId::for_test(1));
    let mut last_day = DayPlan::new(date(9));
    last_day.dinner = Some(RecipeId::for_test(2));
    let mut after = DayPlan::new(date(10));
    after.breakfast = Some(RecipeId::for_test(3));

    assert_eq!(
        aggregate_groceries(date(3), &[before, last_day, after], &ingredients),
        vec!["Inside"]
    );
}

#[test]
fn empty_inputs() {
    let ingredients = ingredient_map(&[(1, &["Bread"])]);
    assert!(aggregate_groceries(date(3), &[], &ingredients).is_empty());

    let empty_day = DayPlan::new(date(4));
    assert!(aggregate_groceries(date(3), &[empty_day], &ingredients).is_empty());

    // a recipe without ingredients contributes nothing
    let mut day = DayPlan::new(date(4));
    day.lunch = Some(RecipeId::for_test(7));
    assert!(aggregate_groceries(date(3), &[day], &ingredients).is_empty());
}
