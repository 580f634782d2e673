// Copyright 2023 Remi Bernotavicius

use crate::database::{self, models::RecipeId};
use crate::planning::RecipeDraft;
use eframe::egui;
use std::path::PathBuf;

mod calendar;
mod editor;
mod gallery;
mod generate_rtf;
mod groceries;
mod recipe;
mod search;
mod state;

use state::{Action, AppState, SidebarItem};

fn new_error_toast(text: impl Into<egui::WidgetText>) -> egui_toast::Toast {
    egui_toast::Toast {
        text: text.into(),
        kind: egui_toast::ToastKind::Error,
        options: egui_toast::ToastOptions::default()
            .duration_in_seconds(3.0)
            .show_progress(false)
            .show_icon(true),
        ..Default::default()
    }
}

fn show_error(toasts: &mut egui_toast::Toasts, message: String) {
    log::error!("{message}");
    toasts.add(new_error_toast(message));
}

struct Panes {
    gallery: gallery::GalleryPane,
    calendar: calendar::CalendarPane,
    groceries: groceries::GroceriesPane,
}

impl Panes {
    fn new(conn: &mut database::Connection, state: &AppState) -> database::Result<Self> {
        Ok(Self {
            gallery: gallery::GalleryPane::new(conn)?,
            calendar: calendar::CalendarPane::new(conn, state.week_start)?,
            groceries: groceries::GroceriesPane::new(conn, state.week_start)?,
        })
    }

    fn refresh(
        &mut self,
        conn: &mut database::Connection,
        state: &AppState,
    ) -> database::Result<()> {
        self.gallery.refresh(conn)?;
        self.calendar.refresh(conn, state.week_start)?;
        self.groceries = groceries::GroceriesPane::new(conn, state.week_start)?;
        Ok(())
    }
}

pub struct RecipePlanner {
    conn: database::Connection,
    data_dir: PathBuf,
    toasts: egui_toast::Toasts,
    state: AppState,
    panes: Panes,
    recipe_window: Option<recipe::RecipeWindow>,
    editor: Option<editor::RecipeEditor>,
}

impl RecipePlanner {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut conn: database::Connection,
        data_dir: PathBuf,
    ) -> crate::Result<Self> {
        let mut state: AppState = cc
            .storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default();
        state.apply(Action::ShowWeekOf(chrono::Local::now().date_naive()));
        log::debug!("restored {state:?}");

        let panes = Panes::new(&mut conn, &state)?;
        let mut planner = Self {
            conn,
            data_dir,
            toasts: egui_toast::Toasts::new()
                .anchor(egui::Align2::RIGHT_BOTTOM, (-10.0, -10.0))
                .direction(egui::Direction::BottomUp),
            state,
            panes,
            recipe_window: None,
            editor: None,
        };
        planner.sync_recipe_window();
        Ok(planner)
    }

    fn dispatch(&mut self, action: Action) {
        log::debug!("{action:?}");
        let reload = action.changes_data();
        let week_start = self.state.week_start;
        self.state.apply(action);

        if reload || week_start != self.state.week_start {
            if let Err(error) = self.panes.refresh(&mut self.conn, &self.state) {
                show_error(&mut self.toasts, format!("Couldn't load data: {error}"));
            }
        }
        if reload {
            self.recipe_window = None;
        }
        self.sync_recipe_window();
    }

    /// Opens the detail window for the selected recipe, dropping the selection if it is gone.
    fn sync_recipe_window(&mut self) {
        let Some(id) = self.state.selected_recipe else {
            self.recipe_window = None;
            return;
        };
        if self.recipe_window.as_ref().is_some_and(|w| w.id() == id) {
            return;
        }
        match recipe::RecipeWindow::new(&mut self.conn, id) {
            Ok(window) => self.recipe_window = Some(window),
            Err(error) => {
                log::warn!("can't show recipe {id:?}: {error}");
                self.state.selected_recipe = None;
                self.recipe_window = None;
            }
        }
    }

    fn open_editor(&mut self, editing: Option<RecipeId>, draft: RecipeDraft) {
        self.editor = Some(editor::RecipeEditor::new(editing, draft));
    }

    fn update_sidebar(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = vec![];
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(140.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Recipes");
                ui.separator();
                for item in SidebarItem::iter() {
                    if ui
                        .selectable_label(self.state.pane == item, item.to_string())
                        .clicked()
                    {
                        actions.push(Action::SelectPane(item));
                    }
                }
            });
        actions
    }

    fn update_pane(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = vec![];
        let mut new_recipe = false;
        egui::CentralPanel::default().show(ctx, |ui| match self.state.pane {
            SidebarItem::Gallery => {
                for event in self.panes.gallery.update(
                    ui,
                    &mut self.conn,
                    &mut self.toasts,
                    self.state.selected_recipe,
                ) {
                    match event {
                        gallery::UpdateEvent::Action(action) => actions.push(action),
                        gallery::UpdateEvent::NewRecipe => new_recipe = true,
                    }
                }
            }
            SidebarItem::Calendar => {
                actions = self.panes.calendar.update(
                    ui,
                    &mut self.conn,
                    &mut self.toasts,
                    &self.data_dir,
                    self.state.selected_day,
                );
            }
            SidebarItem::Groceries => {
                actions = self
                    .panes
                    .groceries
                    .update(ui, &mut self.toasts, &self.data_dir);
            }
        });
        if new_recipe {
            self.open_editor(None, RecipeDraft::default());
        }
        actions
    }

    fn update_recipe_window(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = vec![];
        let Some(window) = &mut self.recipe_window else {
            return actions;
        };
        let mut edit = None;
        for event in window.update(
            ctx,
            &mut self.conn,
            &mut self.toasts,
            self.panes.calendar.week(),
        ) {
            match event {
                recipe::UpdateEvent::Closed => actions.push(Action::SelectRecipe(None)),
                recipe::UpdateEvent::Edit => {
                    edit = Some((window.id(), window.full().to_draft()));
                }
                recipe::UpdateEvent::Action(action) => actions.push(action),
            }
        }
        if let Some((id, draft)) = edit {
            self.open_editor(Some(id), draft);
        }
        actions
    }

    fn update_editor(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = vec![];
        let Some(editor) = &mut self.editor else {
            return actions;
        };
        let mut closed = false;
        for event in editor.update(ctx, &mut self.conn, &mut self.toasts) {
            match event {
                editor::UpdateEvent::Closed => closed = true,
                editor::UpdateEvent::Saved(id) => actions.push(Action::RecipeSaved(id)),
            }
        }
        if closed {
            log::debug!("closed editor for {:?}", editor.editing());
            self.editor = None;
        }
        actions
    }
}

impl eframe::App for RecipePlanner {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = self.update_sidebar(ctx);
        actions.extend(self.update_pane(ctx));
        actions.extend(self.update_recipe_window(ctx));
        actions.extend(self.update_editor(ctx));
        for action in actions {
            self.dispatch(action);
        }
        self.toasts.show(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }
}
