use super::{new_error_toast, search::SearchWidget, show_error};
use crate::database::{
    self,
    models::{CategoryId, RecipeId},
    query,
};
use crate::planning::RecipeDraft;
use eframe::egui;

pub enum UpdateEvent {
    Closed,
    Saved(RecipeId),
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

pub struct RecipeEditor {
    editing: Option<RecipeId>,
    draft: RecipeDraft,
    ingredients_text: String,
    new_instruction: String,
    steps_text: Option<String>,

    new_category_name: String,
    new_category: Option<CategoryId>,
    cached_category_search: Option<query::CachedQuery<CategoryId>>,
}

impl RecipeEditor {
    pub fn new(editing: Option<RecipeId>, draft: RecipeDraft) -> Self {
        Self {
            editing,
            ingredients_text: draft.ingredients_text(),
            draft,
            new_instruction: String::new(),
            steps_text: None,
            new_category_name: String::new(),
            new_category: None,
            cached_category_search: None,
        }
    }

    pub fn editing(&self) -> Option<RecipeId> {
        self.editing
    }

    fn save(&mut self, conn: &mut database::Connection) -> database::Result<RecipeId> {
        self.draft.set_ingredients_text(&self.ingredients_text);
        if let Some(text) = &self.steps_text {
            self.draft.set_instructions_text(text);
        }
        match self.editing {
            Some(id) => query::update_recipe(conn, id, &self.draft).map(|()| id),
            None => query::add_recipe(conn, &self.draft),
        }
    }

    fn update_image(&mut self, ui: &mut egui::Ui) {
        ui.label("Image:");
        ui.horizontal(|ui| {
            match &self.draft.image_path {
                Some(path) => {
                    ui.add(egui::Image::new(format!("file://{path}")).max_height(64.0));
                    if ui.button("Remove").clicked() {
                        self.draft.image_path = None;
                    }
                }
                None => {
                    ui.weak("None");
                }
            }
            if ui.button("Choose…").clicked() {
                if let Some(file) = rfd::FileDialog::new()
                    .add_filter("Image", IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    self.draft.image_path = Some(file.display().to_string());
                }
            }
        });
        ui.end_row();
    }

    fn update_categories(&mut self, ui: &mut egui::Ui, conn: &mut database::Connection) {
        ui.label("Categories:");
        ui.vertical(|ui| {
            ui.horizontal_wrapped(|ui| {
                for category in self.draft.categories.clone() {
                    if ui
                        .small_button(format!("{category} ✖"))
                        .on_hover_text("Remove")
                        .clicked()
                    {
                        self.draft.remove_category(&category);
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.add(
                    SearchWidget::new(
                        "editor category",
                        &mut self.new_category_name,
                        &mut self.new_category,
                        |query| {
                            query::search_categories(conn, &mut self.cached_category_search, query)
                        },
                    )
                    .hint_text("category"),
                );
                if ui.button("Add").clicked() {
                    self.draft.add_category(&self.new_category_name);
                    self.new_category_name.clear();
                    self.new_category = None;
                }
            });
        });
        ui.end_row();
    }

    fn update_instructions(&mut self, ui: &mut egui::Ui) {
        ui.label("Instructions:");
        ui.vertical(|ui| {
            if let Some(text) = &mut self.steps_text {
                ui.add(
                    egui::TextEdit::multiline(text)
                        .hint_text("one step per line")
                        .desired_rows(6),
                );
                if ui.button("Done").clicked() {
                    self.draft.set_instructions_text(text);
                    self.steps_text = None;
                }
                return;
            }
            let count = self.draft.instructions().len();
            let mut remove = None;
            let mut swap = None;
            for (i, instruction) in self.draft.instructions().iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("{}.", instruction.step));
                    ui.label(&instruction.body);
                    if ui.add_enabled(i > 0, egui::Button::new("⏶").small()).clicked() {
                        swap = Some((i, i - 1));
                    }
                    if ui
                        .add_enabled(i + 1 < count, egui::Button::new("⏷").small())
                        .clicked()
                    {
                        swap = Some((i, i + 1));
                    }
                    if ui.small_button("✖").clicked() {
                        remove = Some(i);
                    }
                });
            }
            if let Some(i) = remove {
                self.draft.remove_instruction(i);
            }
            if let Some((from, to)) = swap {
                self.draft.move_instruction(from, to);
            }

            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.new_instruction)
                        .hint_text("next step")
                        .desired_width(300.0),
                );
                if ui.button("Add Step").clicked() && !self.new_instruction.trim().is_empty() {
                    self.draft.push_instruction(self.new_instruction.trim());
                    self.new_instruction.clear();
                }
                if ui.button("Edit as Text").clicked() {
                    self.steps_text = Some(self.draft.instructions_text());
                }
            });
        });
        ui.end_row();
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        let title = match self.editing {
            Some(_) => "Edit Recipe",
            None => "New Recipe",
        };
        egui::Window::new(title)
            .id(egui::Id::new(("recipe editor", self.editing)))
            .open(&mut open)
            .default_width(480.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 35.0)
                    .show(ui, |ui| {
                        egui::Grid::new("recipe editor grid")
                            .num_columns(2)
                            .show(ui, |ui| {
                                ui.label("Name:");
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.draft.name)
                                        .hint_text("recipe name"),
                                );
                                ui.end_row();

                                ui.label("Prep Time:");
                                ui.text_edit_singleline(&mut self.draft.prep_time);
                                ui.end_row();

                                ui.label("Cook Time:");
                                ui.text_edit_singleline(&mut self.draft.cook_time);
                                ui.end_row();

                                self.update_image(ui);
                                self.update_categories(ui, conn);

                                ui.label("Ingredients:")
                                    .on_hover_text("One ingredient per line");
                                ui.add(
                                    egui::TextEdit::multiline(&mut self.ingredients_text)
                                        .desired_rows(6),
                                );
                                ui.end_row();

                                self.update_instructions(ui);

                                ui.label("Comments:");
                                ui.add(
                                    egui::TextEdit::multiline(&mut self.draft.comments)
                                        .desired_rows(3),
                                );
                                ui.end_row();
                            });
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if save {
            match self.save(conn) {
                Ok(id) => {
                    events.push(UpdateEvent::Saved(id));
                    cancel = true;
                }
                Err(database::Error::Validation(error)) => {
                    toasts.add(new_error_toast(error.to_string()));
                }
                Err(error) => show_error(toasts, format!("Couldn't save recipe: {error}")),
            }
        }
        if !open || cancel {
            events.push(UpdateEvent::Closed);
        }
        events
    }
}

#[test]
fn editor_saves_new_and_existing_recipes() {
    let mut conn = database::establish_in_memory();

    let mut editor = RecipeEditor::new(None, RecipeDraft::new("Pancakes"));
    editor.ingredients_text = "Flour\n\n Milk \nEggs".into();
    let id = editor.save(&mut conn).unwrap();

    let saved = query::get_recipe(&mut conn, id).unwrap();
    assert_eq!(
        saved.ingredients.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        vec!["Flour", "Milk", "Eggs"]
    );

    let mut editor = RecipeEditor::new(Some(id), saved.to_draft());
    assert_eq!(editor.ingredients_text, "Flour\nMilk\nEggs");
    editor.draft.name = "Crepes".into();
    assert_eq!(editor.save(&mut conn).unwrap(), id);
    assert_eq!(query::get_recipe(&mut conn, id).unwrap().recipe.name, "Crepes");

    let mut duplicate = RecipeEditor::new(None, RecipeDraft::new(" crepes"));
    assert!(matches!(
        duplicate.save(&mut conn),
        Err(database::Error::Validation(_))
    ));
}

#[test]
fn editor_saves_steps_typed_as_text() {
    let mut conn = database::establish_in_memory();

    let mut draft = RecipeDraft::new("Bread");
    draft.push_instruction("knead");
    let mut editor = RecipeEditor::new(None, draft);
    editor.steps_text = Some(editor.draft.instructions_text());
    editor.steps_text.as_mut().unwrap().push_str("\n\n  proof \nbake");
    let id = editor.save(&mut conn).unwrap();

    let saved = query::get_recipe(&mut conn, id).unwrap();
    assert_eq!(
        saved
            .instructions
            .iter()
            .map(|i| (i.step, i.body.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "knead"), (2, "proof"), (3, "bake")]
    );
}
