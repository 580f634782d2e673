use super::{show_error, state::Action};
use crate::database::{
    self,
    models::{MealSlot, RecipeId},
    query::{self, FullRecipe},
};
use crate::planning::{full_day_name, WeekPlan};
use chrono::Datelike as _;
use eframe::egui;

pub enum UpdateEvent {
    Closed,
    Edit,
    Action(Action),
}

pub struct RecipeWindow {
    full: FullRecipe,
}

impl RecipeWindow {
    pub fn new(conn: &mut database::Connection, recipe_id: RecipeId) -> database::Result<Self> {
        Ok(Self {
            full: query::get_recipe(conn, recipe_id)?,
        })
    }

    pub fn id(&self) -> RecipeId {
        self.full.recipe.id
    }

    pub fn full(&self) -> &FullRecipe {
        &self.full
    }

    fn update_details(&self, ui: &mut egui::Ui) {
        let recipe = &self.full.recipe;
        if let Some(path) = &recipe.image_path {
            ui.add(egui::Image::new(format!("file://{path}")).max_height(200.0));
        }

        egui::Grid::new(("recipe information", recipe.id)).show(ui, |ui| {
            ui.label("Prep Time:");
            ui.label(&recipe.prep_time);
            ui.end_row();

            ui.label("Cook Time:");
            ui.label(&recipe.cook_time);
            ui.end_row();

            ui.label("Categories:");
            let names: Vec<_> = self.full.categories.iter().map(|c| c.name.as_str()).collect();
            ui.label(names.join(", "));
            ui.end_row();

            ui.label("Added:");
            ui.label(recipe.created_at.format("%B %e, %Y").to_string());
            ui.end_row();
        });

        ui.separator();
        ui.strong("Ingredients");
        for ingredient in &self.full.ingredients {
            ui.label(format!("• {}", ingredient.name));
        }

        ui.separator();
        ui.strong("Instructions");
        for instruction in &self.full.instructions {
            ui.horizontal_wrapped(|ui| {
                ui.label(format!("{}.", instruction.step));
                ui.label(&instruction.body);
            });
        }

        if !recipe.comments.is_empty() {
            ui.separator();
            ui.strong("Comments");
            ui.label(&recipe.comments);
        }
    }

    fn update_schedule_menu(
        &self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        week: &WeekPlan,
        events: &mut Vec<UpdateEvent>,
    ) {
        ui.menu_button("Schedule", |ui| {
            for date in week.dates() {
                ui.menu_button(full_day_name(date.weekday()), |ui| {
                    for slot in MealSlot::iter() {
                        let current = week
                            .meal(date, slot)
                            .map(|(_, name)| name)
                            .unwrap_or("No Recipe");
                        if ui.button(format!("{slot}: {current}")).clicked() {
                            match query::assign_meal(conn, date, slot, Some(self.id())) {
                                Ok(()) => events
                                    .push(UpdateEvent::Action(Action::MealPlanChanged(date))),
                                Err(error) => show_error(toasts, format!("{error}")),
                            }
                            ui.close_menu();
                        }
                    }
                });
            }
        });
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        week: &WeekPlan,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        let mut open = true;
        let mut delete = false;
        egui::Window::new(self.full.recipe.name.clone())
            .id(egui::Id::new(("recipe", self.id())))
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 35.0)
                    .show(ui, |ui| self.update_details(ui));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Edit").clicked() {
                        events.push(UpdateEvent::Edit);
                    }
                    delete = ui.button("Delete").clicked();
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.update_schedule_menu(ui, conn, toasts, week, &mut events);
                    });
                });
            });

        if delete {
            match query::delete_recipe(conn, self.id()) {
                Ok(()) => events.push(UpdateEvent::Action(Action::RecipeDeleted(self.id()))),
                Err(error) => show_error(toasts, format!("Couldn't delete recipe: {error}")),
            }
        }
        if !open {
            events.push(UpdateEvent::Closed);
        }
        events
    }
}
