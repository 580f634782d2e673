// Copyright 2023 Remi Bernotavicius

use super::models::{
    CalendarDay, Category, CategoryId, IngredientEntry, InstructionEntry, Meal, MealSlot, Recipe,
    RecipeHandle, RecipeId,
};
use super::{schema, Connection, Error, Result};
use crate::planning::{self, DayPlan, RecipeDraft, WeekPlan};
use chrono::NaiveDate;
use diesel::prelude::Connection as _;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::GroupedBy as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;
use std::ops::RangeInclusive;

#[derive(Clone, Debug)]
pub struct FullRecipe {
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientEntry>,
    pub instructions: Vec<InstructionEntry>,
    pub categories: Vec<Category>,
}

impl FullRecipe {
    pub fn to_draft(&self) -> RecipeDraft {
        let mut draft = RecipeDraft::new(self.recipe.name.clone());
        draft.prep_time = self.recipe.prep_time.clone();
        draft.cook_time = self.recipe.cook_time.clone();
        draft.comments = self.recipe.comments.clone();
        draft.image_path = self.recipe.image_path.clone();
        draft.ingredients = self.ingredients.iter().map(|i| i.name.clone()).collect();
        for instruction in &self.instructions {
            draft.push_instruction(instruction.body.clone());
        }
        for category in &self.categories {
            draft.add_category(&category.name);
        }
        draft
    }
}

pub struct CachedQuery<IdT> {
    query: String,
    results: Vec<(IdT, String)>,
}

fn cached_search<IdT: Clone>(
    cache: &mut Option<CachedQuery<IdT>>,
    query: &str,
    search: impl FnOnce() -> Result<Vec<(IdT, String)>>,
) -> Result<Vec<(IdT, String)>> {
    if let Some(cached) = cache.as_ref() {
        if cached.query == query {
            return Ok(cached.results.clone());
        }
    }

    let results = search()?;
    *cache = Some(CachedQuery {
        query: query.into(),
        results: results.clone(),
    });
    Ok(results)
}

/// `LIKE` pattern matching `query` anywhere, with `\` as the escape character.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn list_recipes(conn: &mut Connection) -> Result<Vec<RecipeHandle>> {
    use schema::recipes::dsl::*;

    Ok(recipes
        .select(RecipeHandle::as_select())
        .order_by(name.asc())
        .load(conn)?)
}

pub fn search_recipes(
    conn: &mut Connection,
    cached_recipe_search: &mut Option<CachedQuery<RecipeId>>,
    query: &str,
) -> Result<Vec<(RecipeId, String)>> {
    cached_search(cached_recipe_search, query, || {
        use diesel::expression_methods::EscapeExpressionMethods as _;
        use diesel::expression_methods::TextExpressionMethods as _;
        use schema::recipes::dsl::*;

        Ok(recipes
            .select(RecipeHandle::as_select())
            .filter(name.like(contains_pattern(query)).escape('\\'))
            .order_by(name.asc())
            .load(conn)?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect())
    })
}

pub fn gallery_recipes(
    conn: &mut Connection,
    category: Option<CategoryId>,
) -> Result<Vec<Recipe>> {
    let query = schema::recipes::table
        .select(Recipe::as_select())
        .order_by(schema::recipes::name.asc());
    Ok(match category {
        Some(category) => query
            .filter(
                schema::recipes::id.eq_any(
                    schema::recipe_categories::table
                        .filter(schema::recipe_categories::category_id.eq(category))
                        .select(schema::recipe_categories::recipe_id),
                ),
            )
            .load(conn)?,
        None => query.load(conn)?,
    })
}

pub fn recipe_names(
    conn: &mut Connection,
    ids: impl IntoIterator<Item = RecipeId>,
) -> Result<HashMap<RecipeId, String>> {
    use schema::recipes::dsl::*;

    let ids: Vec<RecipeId> = ids.into_iter().collect();
    Ok(recipes
        .select(RecipeHandle::as_select())
        .filter(id.eq_any(ids))
        .load(conn)?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect())
}

fn other_recipe_names(conn: &mut Connection, exclude: Option<RecipeId>) -> Result<Vec<String>> {
    Ok(list_recipes(conn)?
        .into_iter()
        .filter(|r| Some(r.id) != exclude)
        .map(|r| r.name)
        .collect())
}

pub fn get_recipe(conn: &mut Connection, recipe_id: RecipeId) -> Result<FullRecipe> {
    let recipe = {
        use schema::recipes::dsl::*;

        recipes
            .select(Recipe::as_select())
            .filter(id.eq(recipe_id))
            .get_result(conn)
            .optional()?
            .ok_or(Error::NotFound("recipe"))?
    };

    let ingredients = IngredientEntry::belonging_to(&recipe)
        .select(IngredientEntry::as_select())
        .order_by(schema::ingredients::position.asc())
        .load(conn)?;
    let instructions = InstructionEntry::belonging_to(&recipe)
        .select(InstructionEntry::as_select())
        .order_by(schema::instructions::step.asc())
        .load(conn)?;
    let categories = schema::recipe_categories::table
        .inner_join(schema::categories::table)
        .filter(schema::recipe_categories::recipe_id.eq(recipe_id))
        .select(Category::as_select())
        .order_by(schema::categories::name.asc())
        .load(conn)?;

    Ok(FullRecipe {
        recipe,
        ingredients,
        instructions,
        categories,
    })
}

fn write_recipe_contents(
    conn: &mut Connection,
    edit_recipe_id: RecipeId,
    draft: &RecipeDraft,
) -> Result<()> {
    {
        use schema::ingredients::dsl::*;

        diesel::delete(ingredients.filter(recipe_id.eq(edit_recipe_id))).execute(conn)?;
        for (i, new_name) in draft.ingredients.iter().enumerate() {
            diesel::insert_into(ingredients)
                .values((
                    recipe_id.eq(edit_recipe_id),
                    position.eq(i as i32),
                    name.eq(new_name),
                ))
                .execute(conn)?;
        }
    }

    {
        use schema::instructions::dsl::*;

        diesel::delete(instructions.filter(recipe_id.eq(edit_recipe_id))).execute(conn)?;
        for instruction in draft.instructions() {
            diesel::insert_into(instructions)
                .values((
                    recipe_id.eq(edit_recipe_id),
                    step.eq(instruction.step),
                    body.eq(&instruction.body),
                ))
                .execute(conn)?;
        }
    }

    {
        use schema::recipe_categories::dsl::*;

        diesel::delete(recipe_categories.filter(recipe_id.eq(edit_recipe_id))).execute(conn)?;
        for category_name in &draft.categories {
            let new_category_id = add_category(conn, category_name)?;
            diesel::insert_into(recipe_categories)
                .values((
                    recipe_id.eq(edit_recipe_id),
                    category_id.eq(new_category_id),
                ))
                .execute(conn)?;
        }
    }

    Ok(())
}

pub fn add_recipe(conn: &mut Connection, draft: &RecipeDraft) -> Result<RecipeId> {
    conn.transaction::<_, Error, _>(|conn| {
        let others = other_recipe_names(conn, None)?;
        let new_name = planning::validate_name(&draft.name, others.iter().map(String::as_str))?;

        let new_id = {
            use schema::recipes::dsl::*;

            diesel::insert_into(recipes)
                .values((
                    name.eq(&new_name),
                    prep_time.eq(draft.prep_time.trim()),
                    cook_time.eq(draft.cook_time.trim()),
                    comments.eq(&draft.comments),
                    image_path.eq(draft.image_path.as_deref()),
                    created_at.eq(chrono::Local::now().naive_local()),
                ))
                .execute(conn)?;
            recipes
                .select(id)
                .filter(name.eq(&new_name))
                .get_result::<RecipeId>(conn)?
        };
        write_recipe_contents(conn, new_id, draft)?;

        log::info!("added recipe {new_name:?}");
        Ok(new_id)
    })
}

pub fn update_recipe(conn: &mut Connection, edit_id: RecipeId, draft: &RecipeDraft) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let others = other_recipe_names(conn, Some(edit_id))?;
        let new_name = planning::validate_name(&draft.name, others.iter().map(String::as_str))?;

        let updated = {
            use schema::recipes::dsl::*;

            diesel::update(recipes.filter(id.eq(edit_id)))
                .set((
                    name.eq(&new_name),
                    prep_time.eq(draft.prep_time.trim()),
                    cook_time.eq(draft.cook_time.trim()),
                    comments.eq(&draft.comments),
                    image_path.eq(draft.image_path.as_deref()),
                ))
                .execute(conn)?
        };
        if updated == 0 {
            return Err(Error::NotFound("recipe"));
        }
        write_recipe_contents(conn, edit_id, draft)?;

        log::info!("updated recipe {new_name:?}");
        Ok(())
    })
}

/// Deletes a recipe with its ingredients and instructions. Meals that pointed at it become
/// empty rather than disappearing.
pub fn delete_recipe(conn: &mut Connection, delete_id: RecipeId) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        {
            use schema::meals::dsl::*;

            diesel::update(meals.filter(recipe_id.eq(delete_id)))
                .set(recipe_id.eq(None::<RecipeId>))
                .execute(conn)?;
        }
        diesel::delete(
            schema::ingredients::table.filter(schema::ingredients::recipe_id.eq(delete_id)),
        )
        .execute(conn)?;
        diesel::delete(
            schema::instructions::table.filter(schema::instructions::recipe_id.eq(delete_id)),
        )
        .execute(conn)?;
        diesel::delete(
            schema::recipe_categories::table
                .filter(schema::recipe_categories::recipe_id.eq(delete_id)),
        )
        .execute(conn)?;

        let deleted = diesel::delete(
            schema::recipes::table.filter(schema::recipes::id.eq(delete_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("recipe"));
        }

        log::info!("deleted recipe {delete_id:?}");
        Ok(())
    })
}

pub fn add_category(conn: &mut Connection, new_category_name: &str) -> Result<CategoryId> {
    use schema::categories::dsl::*;

    let new_category_name = new_category_name.trim();
    diesel::insert_into(categories)
        .values(name.eq(new_category_name))
        .on_conflict(name)
        .do_nothing()
        .execute(conn)?;
    Ok(categories
        .select(id)
        .filter(name.eq(new_category_name))
        .get_result(conn)?)
}

pub fn list_categories(conn: &mut Connection) -> Result<Vec<Category>> {
    use schema::categories::dsl::*;

    Ok(categories
        .select(Category::as_select())
        .order_by(name.asc())
        .load(conn)?)
}

pub fn delete_category(conn: &mut Connection, delete_id: CategoryId) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        diesel::delete(
            schema::recipe_categories::table
                .filter(schema::recipe_categories::category_id.eq(delete_id)),
        )
        .execute(conn)?;
        diesel::delete(
            schema::categories::table.filter(schema::categories::id.eq(delete_id)),
        )
        .execute(conn)?;
        Ok(())
    })
}

pub fn search_categories(
    conn: &mut Connection,
    cached_category_search: &mut Option<CachedQuery<CategoryId>>,
    query: &str,
) -> Result<Vec<(CategoryId, String)>> {
    cached_search(cached_category_search, query, || {
        use diesel::expression_methods::EscapeExpressionMethods as _;
        use diesel::expression_methods::TextExpressionMethods as _;
        use schema::categories::dsl::*;

        Ok(categories
            .select(Category::as_select())
            .filter(name.like(contains_pattern(query)).escape('\\'))
            .order_by(name.asc())
            .load(conn)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    })
}

pub fn find_day(conn: &mut Connection, date: NaiveDate) -> Result<Option<CalendarDay>> {
    use schema::calendar_days::dsl::*;

    Ok(calendar_days
        .select(CalendarDay::as_select())
        .filter(day.eq(date))
        .get_result(conn)
        .optional()?)
}

pub fn ensure_day(conn: &mut Connection, date: NaiveDate) -> Result<CalendarDay> {
    if let Some(existing) = find_day(conn, date)? {
        return Ok(existing);
    }

    {
        use schema::calendar_days::dsl::*;
        diesel::insert_into(calendar_days)
            .values(day.eq(date))
            .execute(conn)?;
    }
    log::debug!("created calendar day {date}");
    find_day(conn, date)?.ok_or(Error::NotFound("calendar day"))
}

/// Clearing a slot on a date that was never planned leaves the calendar untouched.
pub fn assign_meal(
    conn: &mut Connection,
    date: NaiveDate,
    meal_slot: MealSlot,
    recipe: Option<RecipeId>,
) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let calendar_day = match recipe {
            Some(_) => ensure_day(conn, date)?,
            None => match find_day(conn, date)? {
                Some(d) => d,
                None => return Ok(()),
            },
        };

        use schema::meals::dsl::*;

        let existing = meals
            .select(Meal::as_select())
            .filter(calendar_day_id.eq(calendar_day.id))
            .filter(slot.eq(meal_slot))
            .get_result(conn)
            .optional()?;
        if let Some(meal) = existing {
            diesel::update(meals.filter(id.eq(meal.id)))
                .set(recipe_id.eq(recipe))
                .execute(conn)?;
        } else if recipe.is_some() {
            diesel::insert_into(meals)
                .values((
                    calendar_day_id.eq(calendar_day.id),
                    slot.eq(meal_slot),
                    recipe_id.eq(recipe),
                ))
                .execute(conn)?;
        }

        log::info!("{date} {meal_slot}: {recipe:?}");
        Ok(())
    })
}

pub fn meal_recipe(
    conn: &mut Connection,
    date: NaiveDate,
    meal_slot: MealSlot,
) -> Result<Option<RecipeHandle>> {
    Ok(schema::meals::table
        .inner_join(schema::calendar_days::table)
        .inner_join(schema::recipes::table)
        .filter(schema::calendar_days::day.eq(date))
        .filter(schema::meals::slot.eq(meal_slot))
        .select(RecipeHandle::as_select())
        .get_result(conn)
        .optional()?)
}

pub fn clear_day(conn: &mut Connection, date: NaiveDate) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let Some(calendar_day) = find_day(conn, date)? else {
            return Ok(());
        };

        diesel::delete(
            schema::meals::table.filter(schema::meals::calendar_day_id.eq(calendar_day.id)),
        )
        .execute(conn)?;
        diesel::delete(
            schema::calendar_days::table.filter(schema::calendar_days::id.eq(calendar_day.id)),
        )
        .execute(conn)?;
        Ok(())
    })
}

pub fn load_day_plans(
    conn: &mut Connection,
    span: RangeInclusive<NaiveDate>,
) -> Result<Vec<DayPlan>> {
    let days = {
        use schema::calendar_days::dsl::*;

        calendar_days
            .select(CalendarDay::as_select())
            .filter(day.between(*span.start(), *span.end()))
            .order_by(day.asc())
            .load(conn)?
    };
    let meals = Meal::belonging_to(&days)
        .select(Meal::as_select())
        .load(conn)?;

    Ok(meals
        .grouped_by(&days)
        .into_iter()
        .zip(&days)
        .map(|(meals, calendar_day)| {
            let mut plan = DayPlan::new(calendar_day.day);
            for meal in meals {
                plan.set_slot(meal.slot, meal.recipe_id);
            }
            plan
        })
        .collect())
}

pub fn load_week(conn: &mut Connection, start: NaiveDate) -> Result<WeekPlan> {
    let days = load_day_plans(conn, planning::week_span(start))?;
    let names = recipe_names(conn, days.iter().flat_map(|d| d.recipes()))?;
    Ok(WeekPlan::new(start, days, names))
}

pub fn load_ingredients(
    conn: &mut Connection,
    ids: impl IntoIterator<Item = RecipeId>,
) -> Result<HashMap<RecipeId, Vec<String>>> {
    use schema::ingredients::dsl::*;

    let ids: Vec<RecipeId> = ids.into_iter().collect();
    let rows: Vec<(RecipeId, String)> = ingredients
        .select((recipe_id, name))
        .filter(recipe_id.eq_any(ids))
        .order_by((recipe_id.asc(), position.asc()))
        .load(conn)?;

    let mut map: HashMap<RecipeId, Vec<String>> = HashMap::new();
    for (r, n) in rows {
        map.entry(r).or_default().push(n);
    }
    Ok(map)
}

pub fn aggregate_groceries(conn: &mut Connection, window_start: NaiveDate) -> Result<Vec<String>> {
    let days = load_day_plans(conn, planning::week_span(window_start))?;
    let ingredients = load_ingredients(conn, days.iter().flat_map(|d| d.recipes()))?;
    Ok(planning::aggregate_groceries(
        window_start,
        &days,
        &ingredients,
    ))
}

#[cfg(test)]
fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
fn recipe_with(conn: &mut Connection, name: &str, ingredients: &[&str]) -> RecipeId {
    let mut draft = RecipeDraft::new(name);
    draft.ingredients = ingredients.iter().map(|i| i.to_string()).collect();
    add_recipe(conn, &draft).unwrap()
}

#[test]
fn recipe_round_trip() {
    let mut conn = super::establish_in_memory();

    let mut draft = RecipeDraft::new("  Pancakes ");
    draft.prep_time = "10 min".into();
    draft.cook_time = "15 min".into();
    draft.comments = "fluffy".into();
    draft.image_path = Some("/tmp/pancakes.png".into());
    draft.set_ingredients_text("flour\neggs\nmilk");
    draft.set_instructions_text("mix\nfry");
    draft.add_category("Breakfast");
    draft.add_category("Easy");

    let id = add_recipe(&mut conn, &draft).unwrap();
    let full = get_recipe(&mut conn, id).unwrap();
    assert_eq!(full.recipe.name, "Pancakes");
    assert_eq!(full.recipe.image_path.as_deref(), Some("/tmp/pancakes.png"));
    assert_eq!(
        full.ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>(),
        vec!["flour", "eggs", "milk"]
    );
    assert_eq!(
        full.instructions
            .iter()
            .map(|i| (i.step, i.body.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "mix"), (2, "fry")]
    );
    assert_eq!(
        full.categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Breakfast", "Easy"]
    );

    let mut edited = full.to_draft();
    assert_eq!(edited.name, "Pancakes");
    edited.remove_instruction(0);
    edited.ingredients.pop();
    edited.remove_category("Easy");
    update_recipe(&mut conn, id, &edited).unwrap();

    let full = get_recipe(&mut conn, id).unwrap();
    assert_eq!(full.ingredients.len(), 2);
    assert_eq!(full.instructions.len(), 1);
    assert_eq!(full.instructions[0].step, 1);
    assert_eq!(full.instructions[0].body, "fry");
    assert_eq!(full.categories.len(), 1);

    // category rows are shared and outlive the link
    assert_eq!(list_categories(&mut conn).unwrap().len(), 2);
}

#[test]
fn duplicate_names_are_rejected() {
    use crate::planning::ValidationError;

    let mut conn = super::establish_in_memory();
    let soup = recipe_with(&mut conn, "Tomato Soup", &[]);
    recipe_with(&mut conn, "Toast", &[]);

    let error = add_recipe(&mut conn, &RecipeDraft::new("tomato  SOUP")).unwrap_err();
    assert!(matches!(
        error,
        Error::Validation(ValidationError::DuplicateName(_))
    ));
    let error = add_recipe(&mut conn, &RecipeDraft::new(" ")).unwrap_err();
    assert!(matches!(error, Error::Validation(ValidationError::EmptyName)));

    // keeping your own name is fine, taking another one is not
    update_recipe(&mut conn, soup, &RecipeDraft::new("Tomato soup")).unwrap();
    assert!(update_recipe(&mut conn, soup, &RecipeDraft::new("toast")).is_err());
    assert_eq!(
        list_recipes(&mut conn)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect::<Vec<_>>(),
        vec!["Toast", "Tomato soup"]
    );
}

#[test]
fn viewing_a_date_creates_nothing() {
    let mut conn = super::establish_in_memory();
    let d = date(2024, 6, 4);

    assert!(find_day(&mut conn, d).unwrap().is_none());
    assert!(meal_recipe(&mut conn, d, MealSlot::Lunch).unwrap().is_none());
    assert!(load_day_plans(&mut conn, planning::week_span(date(2024, 6, 3)))
        .unwrap()
        .is_empty());
    assign_meal(&mut conn, d, MealSlot::Lunch, None).unwrap();
    assert!(find_day(&mut conn, d).unwrap().is_none());

    let first = ensure_day(&mut conn, d).unwrap();
    let second = ensure_day(&mut conn, d).unwrap();
    assert_eq!(first, second);
}

#[test]
fn assign_then_read_slot() {
    let mut conn = super::establish_in_memory();
    let toast = recipe_with(&mut conn, "Toast", &["Bread"]);
    let eggs = recipe_with(&mut conn, "Eggs", &["Eggs"]);
    let d = date(2024, 6, 4);

    assign_meal(&mut conn, d, MealSlot::Breakfast, Some(toast)).unwrap();
    let handle = meal_recipe(&mut conn, d, MealSlot::Breakfast)
        .unwrap()
        .unwrap();
    assert_eq!(handle.id, toast);
    assert_eq!(handle.name, "Toast");

    // reassigning updates the same meal
    assign_meal(&mut conn, d, MealSlot::Breakfast, Some(eggs)).unwrap();
    let plans = load_day_plans(&mut conn, d..=d).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].breakfast, Some(eggs));
    assert_eq!(plans[0].lunch, None);
}

#[test]
fn cleared_slot_leaves_groceries() {
    let mut conn = super::establish_in_memory();
    let toast = recipe_with(&mut conn, "Toast", &["Bread", "Butter"]);
    let soup = recipe_with(&mut conn, "Soup", &["Tomato"]);
    let monday = date(2024, 6, 3);

    assign_meal(&mut conn, monday, MealSlot::Breakfast, Some(toast)).unwrap();
    assign_meal(&mut conn, monday, MealSlot::Dinner, Some(soup)).unwrap();
    assert_eq!(
        aggregate_groceries(&mut conn, monday).unwrap(),
        vec!["Bread", "Butter", "Tomato"]
    );

    assign_meal(&mut conn, monday, MealSlot::Breakfast, None).unwrap();
    assert!(meal_recipe(&mut conn, monday, MealSlot::Breakfast)
        .unwrap()
        .is_none());
    assert_eq!(aggregate_groceries(&mut conn, monday).unwrap(), vec!["Tomato"]);

    clear_day(&mut conn, monday).unwrap();
    assert!(find_day(&mut conn, monday).unwrap().is_none());
    assert!(aggregate_groceries(&mut conn, monday).unwrap().is_empty());
}

#[test]
fn groceries_for_week() {
    let mut conn = super::establish_in_memory();
    let toast = recipe_with(&mut conn, "Toast", &["Bread"]);
    let cereal = recipe_with(&mut conn, "Cereal", &["Cereal", "Milk"]);
    let pancakes = recipe_with(&mut conn, "Pancakes", &["Milk", "Flour"]);
    let monday = date(2024, 6, 3);

    assert!(aggregate_groceries(&mut conn, monday).unwrap().is_empty());

    assign_meal(&mut conn, date(2024, 6, 5), MealSlot::Dinner, Some(cereal)).unwrap();
    assign_meal(&mut conn, monday, MealSlot::Breakfast, Some(toast)).unwrap();
    // the following Monday is outside the window
    assign_meal(&mut conn, date(2024, 6, 10), MealSlot::Lunch, Some(pancakes)).unwrap();

    let list = aggregate_groceries(&mut conn, monday).unwrap();
    assert_eq!(list, vec!["Bread", "Cereal", "Milk"]);
    assert_eq!(aggregate_groceries(&mut conn, monday).unwrap(), list);

    assert_eq!(
        aggregate_groceries(&mut conn, date(2024, 6, 10)).unwrap(),
        vec!["Milk", "Flour"]
    );

    let week = load_week(&mut conn, monday).unwrap();
    assert_eq!(week.days().len(), 2);
    assert_eq!(
        week.meal(date(2024, 6, 5), MealSlot::Dinner),
        Some((cereal, "Cereal"))
    );
    assert_eq!(week.meal(date(2024, 6, 10), MealSlot::Lunch), None);
}

#[test]
fn deleting_a_recipe_empties_its_meals() {
    let mut conn = super::establish_in_memory();
    let toast = recipe_with(&mut conn, "Toast", &["Bread"]);
    let d = date(2024, 6, 4);
    assign_meal(&mut conn, d, MealSlot::Lunch, Some(toast)).unwrap();

    delete_recipe(&mut conn, toast).unwrap();
    assert!(matches!(
        get_recipe(&mut conn, toast),
        Err(Error::NotFound(_))
    ));
    assert!(meal_recipe(&mut conn, d, MealSlot::Lunch).unwrap().is_none());
    assert!(find_day(&mut conn, d).unwrap().is_some());
    assert!(load_ingredients(&mut conn, [toast]).unwrap().is_empty());
    assert!(aggregate_groceries(&mut conn, date(2024, 6, 3))
        .unwrap()
        .is_empty());
}

#[test]
fn searching() {
    let mut conn = super::establish_in_memory();
    let soup = recipe_with(&mut conn, "Tomato Soup", &[]);
    recipe_with(&mut conn, "Toast", &[]);
    recipe_with(&mut conn, "Salad", &[]);

    let mut cache = None;
    let results = search_recipes(&mut conn, &mut cache, "To").unwrap();
    assert_eq!(
        results.iter().map(|(_, n)| n.as_str()).collect::<Vec<_>>(),
        vec!["Toast", "Tomato Soup"]
    );
    assert_eq!(
        search_recipes(&mut conn, &mut cache, "Soup").unwrap(),
        vec![(soup, "Tomato Soup".to_string())]
    );

    let names = recipe_names(&mut conn, [soup]).unwrap();
    assert_eq!(names.get(&soup).map(String::as_str), Some("Tomato Soup"));

    let mut dinner = RecipeDraft::new("Salad Supreme");
    dinner.add_category("Dinner");
    let supreme = add_recipe(&mut conn, &dinner).unwrap();
    assert_eq!(gallery_recipes(&mut conn, None).unwrap().len(), 4);
    let dinner_id = list_categories(&mut conn).unwrap()[0].id;
    assert_eq!(
        gallery_recipes(&mut conn, Some(dinner_id))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect::<Vec<_>>(),
        vec![supreme]
    );
    delete_recipe(&mut conn, supreme).unwrap();

    let mut category_cache = None;
    add_category(&mut conn, "Dinner").unwrap();
    add_category(&mut conn, "Dinner").unwrap();
    let found = search_categories(&mut conn, &mut category_cache, "inn").unwrap();
    assert_eq!(found.len(), 1);
    delete_category(&mut conn, found[0].0).unwrap();
    assert!(list_categories(&mut conn).unwrap().is_empty());
}

#[test]
fn search_wildcards_match_literally() {
    assert_eq!(contains_pattern(r"50%_a\b"), r"%50\%\_a\\b%");

    let mut conn = super::establish_in_memory();
    recipe_with(&mut conn, "Toast", &[]);
    let rye = recipe_with(&mut conn, "50% Rye", &[]);
    let snake = recipe_with(&mut conn, "snake_case stew", &[]);
    let slash = recipe_with(&mut conn, r"Back\slash", &[]);

    for (query, expected) in [
        ("%", vec![rye]),
        ("_", vec![snake]),
        (r"\", vec![slash]),
        ("T_ast", vec![]),
    ] {
        let found = search_recipes(&mut conn, &mut None, query).unwrap();
        assert_eq!(
            found.into_iter().map(|(id, _)| id).collect::<Vec<_>>(),
            expected,
            "{query}"
        );
    }

    add_category(&mut conn, "Sides").unwrap();
    add_category(&mut conn, "100% Veg").unwrap();
    let found = search_categories(&mut conn, &mut None, "%").unwrap();
    assert_eq!(
        found.into_iter().map(|(_, n)| n).collect::<Vec<_>>(),
        vec!["100% Veg"]
    );
}

#[test]
fn stale_search_reruns_once_forgotten() {
    let mut conn = super::establish_in_memory();
    let mut cache = None;
    assert!(search_recipes(&mut conn, &mut cache, "Sou").unwrap().is_empty());

    let soup = recipe_with(&mut conn, "Soup", &[]);
    cache = None;
    assert_eq!(
        search_recipes(&mut conn, &mut cache, "Sou").unwrap(),
        vec![(soup, "Soup".to_string())]
    );
}
