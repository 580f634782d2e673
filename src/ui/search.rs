use crate::database;
use eframe::egui;
use std::hash::Hash;

/// A text box that pops up the stored values matching what has been typed. `value` holds the
/// match whose text equals the box exactly, if there is one.
pub struct SearchWidget<'a, SearchFn, ValueT> {
    buf: &'a mut String,
    value: &'a mut Option<ValueT>,
    search_fn: SearchFn,
    pop_up_id: egui::Id,
    hint_text: Option<egui::WidgetText>,
    desired_width: Option<f32>,
}

impl<'a, SearchFn, ValueT> SearchWidget<'a, SearchFn, ValueT>
where
    SearchFn: FnOnce(&str) -> database::Result<Vec<(ValueT, String)>>,
{
    pub fn new(
        id_salt: impl Hash,
        buf: &'a mut String,
        value: &'a mut Option<ValueT>,
        search_fn: SearchFn,
    ) -> Self {
        Self {
            buf,
            value,
            search_fn,
            pop_up_id: egui::Id::new(id_salt),
            hint_text: None,
            desired_width: None,
        }
    }

    pub fn hint_text(mut self, hint_text: impl Into<egui::WidgetText>) -> Self {
        self.hint_text = Some(hint_text.into());
        self
    }

    pub fn desired_width(mut self, desired_width: f32) -> Self {
        self.desired_width = Some(desired_width);
        self
    }
}

impl<'a, SearchFn, ValueT> egui::Widget for SearchWidget<'a, SearchFn, ValueT>
where
    SearchFn: FnOnce(&str) -> database::Result<Vec<(ValueT, String)>>,
    ValueT: Clone,
{
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let Self {
            pop_up_id,
            buf,
            value,
            search_fn,
            hint_text,
            desired_width,
        } = self;

        let mut edit = egui::TextEdit::singleline(buf);
        if let Some(hint_text) = hint_text {
            edit = edit.hint_text(hint_text);
        }
        if let Some(desired_width) = desired_width {
            edit = edit.desired_width(desired_width);
        }
        let mut r = edit.show(ui).response;
        if r.gained_focus() {
            ui.memory_mut(|m| m.open_popup(pop_up_id));
        }
        if r.changed() {
            *value = None;
        }

        let mut picked = false;
        egui::popup_below_widget(
            ui,
            pop_up_id,
            &r,
            egui::PopupCloseBehavior::CloseOnClick,
            |ui| {
                let results = match search_fn(buf) {
                    Ok(results) => results,
                    Err(error) => {
                        log::error!("search for {buf:?} failed: {error}");
                        vec![]
                    }
                };
                egui::ScrollArea::vertical()
                    .max_height(200.0)
                    .show(ui, |ui| {
                        if results.is_empty() {
                            ui.weak("No matches");
                        }
                        for (result, text) in results {
                            if *buf == text && value.is_none() {
                                *value = Some(result.clone());
                            }
                            if ui.selectable_label(false, &text).clicked() {
                                *value = Some(result);
                                *buf = text;
                                picked = true;
                                ui.memory_mut(|m| m.close_popup());
                            }
                        }
                    });
            },
        );

        if picked {
            r.mark_changed();
        }
        r
    }
}
