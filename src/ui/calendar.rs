use super::{generate_rtf, new_error_toast, search::SearchWidget, show_error, state::Action};
use crate::database::{
    self,
    models::{MealSlot, RecipeId},
    query,
};
use crate::planning::{full_day_name, is_within_window, WeekPlan};
use chrono::{Datelike as _, NaiveDate};
use eframe::egui;
use std::collections::HashMap;
use std::path::Path;

#[derive(Default)]
struct RecipeBeingSelected {
    name: String,
    recipe_id: Option<RecipeId>,
    cached_recipe_search: Option<query::CachedQuery<RecipeId>>,
}

pub struct CalendarPane {
    week: WeekPlan,
    edit_mode: bool,
    recipes_being_selected: HashMap<(NaiveDate, MealSlot), RecipeBeingSelected>,
}

impl CalendarPane {
    pub fn new(conn: &mut database::Connection, start: NaiveDate) -> database::Result<Self> {
        Ok(Self {
            week: query::load_week(conn, start)?,
            edit_mode: false,
            recipes_being_selected: HashMap::new(),
        })
    }

    pub fn week(&self) -> &WeekPlan {
        &self.week
    }

    pub fn refresh(
        &mut self,
        conn: &mut database::Connection,
        start: NaiveDate,
    ) -> database::Result<()> {
        if start != self.week.start() {
            self.recipes_being_selected.clear();
        }
        self.forget_searches();
        self.week = query::load_week(conn, start)?;
        Ok(())
    }

    fn forget_searches(&mut self) {
        for selecting in self.recipes_being_selected.values_mut() {
            selecting.recipe_id = None;
            selecting.cached_recipe_search = None;
        }
    }

    fn update_header(
        &mut self,
        ui: &mut egui::Ui,
        toasts: &mut egui_toast::Toasts,
        data_dir: &Path,
        actions: &mut Vec<Action>,
    ) {
        let start = self.week.start();
        ui.horizontal(|ui| {
            ui.heading(format!("Week of {}", start.format("%B %e, %Y")));
            let mut date = start;
            ui.add(egui_extras::DatePickerButton::new(&mut date));
            if date != start {
                actions.push(Action::ShowWeekOf(date));
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Previous").clicked() {
                actions.push(Action::PreviousWeek);
            }
            if ui.button("Today").clicked() {
                actions.push(Action::ShowWeekOf(chrono::Local::now().date_naive()));
            }
            if ui.button("Next").clicked() {
                actions.push(Action::NextWeek);
            }
            ui.separator();
            ui.toggle_value(&mut self.edit_mode, "Edit");
            if ui.button("Menu").clicked() {
                if let Err(error) = generate_rtf::generate_and_open_menu(data_dir, &self.week) {
                    show_error(toasts, format!("Error generating menu: {error}"));
                }
            }
        });
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        data_dir: &Path,
        selected_day: Option<NaiveDate>,
    ) -> Vec<Action> {
        let mut actions = vec![];
        self.update_header(ui, toasts, data_dir, &mut actions);
        ui.separator();

        let mut changes = vec![];
        let Self {
            week,
            edit_mode,
            recipes_being_selected,
        } = self;
        egui::Grid::new("calendar grid")
            .striped(true)
            .min_col_width(120.0)
            .show(ui, |ui| {
                ui.label("");
                for slot in MealSlot::iter() {
                    ui.strong(slot.to_string());
                }
                ui.end_row();

                for date in week.dates() {
                    let label = format!(
                        "{} {}",
                        full_day_name(date.weekday()),
                        date.format("%b %e")
                    );
                    if ui
                        .selectable_label(selected_day == Some(date), label)
                        .clicked()
                    {
                        actions.push(Action::SelectDay(Some(date)));
                    }

                    for slot in MealSlot::iter() {
                        ui.horizontal(|ui| {
                            if let Some((recipe_id, name)) = week.meal(date, slot) {
                                if ui.link(name).clicked() {
                                    actions.push(Action::SelectRecipe(Some(recipe_id)));
                                }
                                if *edit_mode && ui.small_button("Clear").clicked() {
                                    changes.push((date, slot, None));
                                }
                            } else if *edit_mode {
                                let e = recipes_being_selected.entry((date, slot)).or_default();
                                ui.add(
                                    SearchWidget::new(
                                        ("meal recipe", date, slot),
                                        &mut e.name,
                                        &mut e.recipe_id,
                                        |query| {
                                            query::search_recipes(
                                                conn,
                                                &mut e.cached_recipe_search,
                                                query,
                                            )
                                        },
                                    )
                                    .hint_text("search for recipe")
                                    .desired_width(120.0),
                                );
                                if ui.small_button("Select").clicked() {
                                    match e.recipe_id {
                                        Some(id) => changes.push((date, slot, Some(id))),
                                        None => {
                                            toasts.add(new_error_toast("Couldn't find recipe"));
                                        }
                                    }
                                }
                            } else {
                                ui.weak("No Recipe");
                            }
                        });
                    }
                    ui.end_row();
                }
            });

        if let Some(day) = selected_day.filter(|d| is_within_window(self.week.start(), *d)) {
            ui.separator();
            if self.update_selected_day(ui, day, &mut actions) {
                match query::clear_day(conn, day) {
                    Ok(()) => actions.push(Action::MealPlanChanged(day)),
                    Err(error) => show_error(toasts, format!("Couldn't clear {day}: {error}")),
                }
            }
        }

        for (date, slot, recipe) in changes {
            match query::assign_meal(conn, date, slot, recipe) {
                Ok(()) => {
                    self.recipes_being_selected.remove(&(date, slot));
                    actions.push(Action::MealPlanChanged(date));
                }
                Err(error) => show_error(toasts, format!("Couldn't update {slot}: {error}")),
            }
        }
        actions
    }

    /// Returns true when the day should be cleared.
    fn update_selected_day(
        &mut self,
        ui: &mut egui::Ui,
        day: NaiveDate,
        actions: &mut Vec<Action>,
    ) -> bool {
        ui.heading(format!(
            "{}, {}",
            full_day_name(day.weekday()),
            day.format("%B %e")
        ));
        egui::Grid::new("selected day grid").show(ui, |ui| {
            for slot in MealSlot::iter() {
                ui.label(format!("{slot}:"));
                match self.week.meal(day, slot) {
                    Some((recipe_id, name)) => {
                        if ui.button(name).clicked() {
                            actions.push(Action::SelectRecipe(Some(recipe_id)));
                        }
                    }
                    None => {
                        ui.weak("No Recipe");
                    }
                }
                ui.end_row();
            }
        });
        let mut clear = false;
        ui.horizontal(|ui| {
            let planned = self.week.day(day).is_some();
            if self.edit_mode {
                clear = ui
                    .add_enabled(planned, egui::Button::new("Clear Day"))
                    .clicked();
            }
            if ui.button("Close").clicked() {
                actions.push(Action::SelectDay(None));
            }
        });
        clear
    }
}

#[cfg(test)]
fn search_slot(
    pane: &mut CalendarPane,
    conn: &mut database::Connection,
    key: (NaiveDate, MealSlot),
) -> Vec<String> {
    let selecting = pane.recipes_being_selected.entry(key).or_default();
    query::search_recipes(conn, &mut selecting.cached_recipe_search, &selecting.name)
        .unwrap()
        .into_iter()
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
fn add_recipe(conn: &mut database::Connection, name: &str) -> RecipeId {
    query::add_recipe(conn, &crate::planning::RecipeDraft::new(name)).unwrap()
}

#[test]
fn reload_sees_added_and_deleted_recipes() {
    let mut conn = database::establish_in_memory();
    let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let key = (start, MealSlot::Dinner);
    let mut pane = CalendarPane::new(&mut conn, start).unwrap();
    pane.recipes_being_selected.entry(key).or_default().name = "Sou".into();
    assert!(search_slot(&mut pane, &mut conn, key).is_empty());

    let soup = add_recipe(&mut conn, "Soup");
    pane.refresh(&mut conn, start).unwrap();
    assert_eq!(search_slot(&mut pane, &mut conn, key), vec!["Soup"]);
    assert_eq!(pane.recipes_being_selected[&key].name, "Sou");

    pane.recipes_being_selected.get_mut(&key).unwrap().recipe_id = Some(soup);
    query::delete_recipe(&mut conn, soup).unwrap();
    pane.refresh(&mut conn, start).unwrap();
    assert_eq!(pane.recipes_being_selected[&key].recipe_id, None);
    assert!(search_slot(&mut pane, &mut conn, key).is_empty());
}

#[test]
fn changing_week_drops_slot_searches() {
    let mut conn = database::establish_in_memory();
    let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let mut pane = CalendarPane::new(&mut conn, start).unwrap();
    pane.recipes_being_selected
        .entry((start, MealSlot::Lunch))
        .or_default()
        .name = "Toast".into();

    pane.refresh(&mut conn, crate::planning::next_week(start)).unwrap();
    assert!(pane.recipes_being_selected.is_empty());
    assert_eq!(pane.week().start(), crate::planning::next_week(start));
}
