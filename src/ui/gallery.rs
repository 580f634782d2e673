use super::{show_error, state::Action};
use crate::database::{
    self,
    models::{Category, CategoryId, Recipe, RecipeId},
    query,
};
use eframe::egui;

const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(128.0, 96.0);

pub enum UpdateEvent {
    Action(Action),
    NewRecipe,
}

pub struct GalleryPane {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    category_filter: Option<CategoryId>,
    name_filter: String,
    edit_mode: bool,
}

impl GalleryPane {
    pub fn new(conn: &mut database::Connection) -> database::Result<Self> {
        Ok(Self {
            recipes: query::gallery_recipes(conn, None)?,
            categories: query::list_categories(conn)?,
            category_filter: None,
            name_filter: String::new(),
            edit_mode: false,
        })
    }

    pub fn refresh(&mut self, conn: &mut database::Connection) -> database::Result<()> {
        self.categories = query::list_categories(conn)?;
        if !self
            .categories
            .iter()
            .any(|c| Some(c.id) == self.category_filter)
        {
            self.category_filter = None;
        }
        self.recipes = query::gallery_recipes(conn, self.category_filter)?;
        Ok(())
    }

    fn category_name(&self) -> &str {
        self.categories
            .iter()
            .find(|c| Some(c.id) == self.category_filter)
            .map(|c| c.name.as_str())
            .unwrap_or("All Recipes")
    }

    fn update_toolbar(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        events: &mut Vec<UpdateEvent>,
    ) {
        let mut refresh_self = false;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.name_filter)
                    .hint_text("filter by name")
                    .desired_width(180.0),
            );

            let before = self.category_filter;
            egui::ComboBox::from_id_salt("gallery category")
                .selected_text(self.category_name().to_owned())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.category_filter, None, "All Recipes");
                    for category in &self.categories {
                        ui.selectable_value(
                            &mut self.category_filter,
                            Some(category.id),
                            &category.name,
                        );
                    }
                });
            refresh_self |= before != self.category_filter;

            if self.edit_mode {
                if let Some(category) = self.category_filter {
                    if ui.button("Delete Category").clicked() {
                        match query::delete_category(conn, category) {
                            Ok(()) => events.push(UpdateEvent::Action(Action::CategoriesChanged)),
                            Err(error) => show_error(toasts, format!("{error}")),
                        }
                    }
                }
            }

            ui.separator();
            ui.toggle_value(&mut self.edit_mode, "Edit");
            if ui.button("New Recipe").clicked() {
                events.push(UpdateEvent::NewRecipe);
            }
        });

        if refresh_self {
            if let Err(error) = self.refresh(conn) {
                show_error(toasts, format!("Couldn't load recipes: {error}"));
            }
        }
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        selected: Option<RecipeId>,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        self.update_toolbar(ui, conn, toasts, &mut events);
        ui.separator();

        let filter = self.name_filter.trim().to_lowercase();
        let mut recipes_to_delete = vec![];
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    let shown = self
                        .recipes
                        .iter()
                        .filter(|r| r.name.to_lowercase().contains(&filter));
                    for recipe in shown {
                        ui.group(|ui| {
                            ui.vertical(|ui| {
                                ui.set_width(THUMBNAIL_SIZE.x);
                                match &recipe.image_path {
                                    Some(path) => {
                                        ui.add(
                                            egui::Image::new(format!("file://{path}"))
                                                .fit_to_exact_size(THUMBNAIL_SIZE),
                                        );
                                    }
                                    None => {
                                        ui.add_sized(THUMBNAIL_SIZE, egui::Label::new("No Image"));
                                    }
                                }
                                let label = ui.selectable_label(
                                    selected == Some(recipe.id),
                                    recipe.name.clone(),
                                );
                                if label.clicked() {
                                    events.push(UpdateEvent::Action(Action::SelectRecipe(Some(
                                        recipe.id,
                                    ))));
                                }
                                if self.edit_mode && ui.small_button("Delete").clicked() {
                                    recipes_to_delete.push(recipe.id);
                                }
                            });
                        });
                    }
                    if self.recipes.is_empty() {
                        ui.label("No recipes yet");
                    }
                });
            });

        for recipe in recipes_to_delete {
            match query::delete_recipe(conn, recipe) {
                Ok(()) => events.push(UpdateEvent::Action(Action::RecipeDeleted(recipe))),
                Err(error) => show_error(toasts, format!("Couldn't delete recipe: {error}")),
            }
        }
        events
    }
}
