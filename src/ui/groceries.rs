use super::{generate_rtf, show_error, state::Action};
use crate::database::{self, models::MealSlot, query};
use crate::planning::{full_day_name, week_end, WeekPlan};
use chrono::{Datelike as _, NaiveDate};
use eframe::egui;
use std::path::Path;

pub struct GroceriesPane {
    week: WeekPlan,
    groceries: Vec<String>,
}

impl GroceriesPane {
    pub fn new(conn: &mut database::Connection, start: NaiveDate) -> database::Result<Self> {
        Ok(Self {
            week: query::load_week(conn, start)?,
            groceries: query::aggregate_groceries(conn, start)?,
        })
    }

    fn update_meals(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Meals");
        if self.week.is_empty() {
            ui.weak("Nothing planned this week");
            return;
        }
        for day in self.week.days().iter().filter(|d| !d.is_empty()) {
            ui.label(egui::RichText::new(full_day_name(day.date.weekday())).italics());
            for slot in MealSlot::iter() {
                if let Some((recipe_id, name)) = self.week.meal(day.date, slot) {
                    ui.horizontal(|ui| {
                        ui.label(format!("{slot} --"));
                        if ui.link(name).clicked() {
                            actions.push(Action::SelectRecipe(Some(recipe_id)));
                        }
                    });
                }
            }
        }
    }

    fn update_ingredients(
        &self,
        ui: &mut egui::Ui,
        toasts: &mut egui_toast::Toasts,
        data_dir: &Path,
    ) {
        ui.horizontal(|ui| {
            ui.heading("Ingredient List");
            let has_groceries = !self.groceries.is_empty();
            if ui
                .add_enabled(has_groceries, egui::Button::new("Copy"))
                .clicked()
            {
                ui.ctx().copy_text(self.groceries.join("\n"));
            }
            if ui
                .add_enabled(has_groceries, egui::Button::new("Export"))
                .clicked()
            {
                if let Err(error) = generate_rtf::generate_and_open_shopping_list(
                    data_dir,
                    self.week.start(),
                    &self.groceries,
                ) {
                    show_error(toasts, format!("Error generating shopping list: {error}"));
                }
            }
        });
        for item in &self.groceries {
            ui.label(format!("• {item}"));
        }
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        toasts: &mut egui_toast::Toasts,
        data_dir: &Path,
    ) -> Vec<Action> {
        let mut actions = vec![];
        let start = self.week.start();
        ui.horizontal(|ui| {
            ui.heading(format!(
                "{} - {}",
                start.format("%B %e"),
                week_end(start).format("%B %e, %Y")
            ));
            if ui.button("Previous").clicked() {
                actions.push(Action::PreviousWeek);
            }
            if ui.button("This Week").clicked() {
                actions.push(Action::ShowWeekOf(chrono::Local::now().date_naive()));
            }
            if ui.button("Next").clicked() {
                actions.push(Action::NextWeek);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                ui.columns(2, |columns| {
                    self.update_meals(&mut columns[0], &mut actions);
                    self.update_ingredients(&mut columns[1], toasts, data_dir);
                });
            });
        actions
    }
}
