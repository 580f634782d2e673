use crate::database::models::RecipeId;
use crate::planning;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum SidebarItem {
    #[default]
    #[display("Gallery")]
    Gallery,
    #[display("Calendar")]
    Calendar,
    #[display("Groceries")]
    Groceries,
}

impl SidebarItem {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub pane: SidebarItem,
    pub selected_recipe: Option<RecipeId>,
    pub selected_day: Option<NaiveDate>,
    pub week_start: NaiveDate,
}

impl AppState {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            pane: SidebarItem::default(),
            selected_recipe: None,
            selected_day: None,
            week_start,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(planning::this_week())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SelectPane(SidebarItem),
    SelectRecipe(Option<RecipeId>),
    /// Selecting a date only moves the view there; it never creates a calendar day.
    SelectDay(Option<NaiveDate>),
    ShowWeekOf(NaiveDate),
    NextWeek,
    PreviousWeek,
    RecipeSaved(RecipeId),
    RecipeDeleted(RecipeId),
    MealPlanChanged(NaiveDate),
    CategoriesChanged,
}

impl Action {
    /// Whether views showing stored data need reloading after this.
    pub fn changes_data(&self) -> bool {
        matches!(
            self,
            Self::RecipeSaved(_)
                | Self::RecipeDeleted(_)
                | Self::MealPlanChanged(_)
                | Self::CategoriesChanged
        )
    }
}

impl AppState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectPane(pane) => self.pane = pane,
            Action::SelectRecipe(recipe) => self.selected_recipe = recipe,
            Action::SelectDay(day) => {
                if let Some(day) = day {
                    self.week_start = planning::week_of(day);
                }
                self.selected_day = day;
            }
            Action::ShowWeekOf(date) => self.show_week(planning::week_of(date)),
            Action::NextWeek => self.show_week(planning::next_week(self.week_start)),
            Action::PreviousWeek => self.show_week(planning::previous_week(self.week_start)),
            Action::RecipeSaved(id) => self.selected_recipe = Some(id),
            Action::RecipeDeleted(id) => {
                if self.selected_recipe == Some(id) {
                    self.selected_recipe = None;
                }
            }
            Action::MealPlanChanged(_) | Action::CategoriesChanged => {}
        }
    }

    fn show_week(&mut self, start: NaiveDate) {
        self.week_start = start;
        if let Some(day) = self.selected_day {
            if !planning::is_within_window(start, day) {
                self.selected_day = None;
            }
        }
    }
}

#[cfg(test)]
fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[test]
fn navigation() {
    let mut state = AppState::new(date(3));
    assert_eq!(state.pane, SidebarItem::Gallery);

    state.apply(Action::SelectPane(SidebarItem::Calendar));
    assert_eq!(state.pane, SidebarItem::Calendar);

    state.apply(Action::SelectDay(Some(date(13))));
    assert_eq!(state.selected_day, Some(date(13)));
    assert_eq!(state.week_start, date(10));

    state.apply(Action::PreviousWeek);
    assert_eq!(state.week_start, date(3));
    assert_eq!(state.selected_day, None);

    state.apply(Action::SelectDay(Some(date(5))));
    state.apply(Action::ShowWeekOf(date(9)));
    assert_eq!(state.week_start, date(3));
    assert_eq!(state.selected_day, Some(date(5)));

    state.apply(Action::NextWeek);
    assert_eq!(state.week_start, date(10));
    assert_eq!(state.selected_day, None);
}

#[test]
fn recipe_selection() {
    let mut state = AppState::new(date(3));
    let a = RecipeId::for_test(1);
    let b = RecipeId::for_test(2);

    state.apply(Action::RecipeSaved(a));
    assert_eq!(state.selected_recipe, Some(a));

    state.apply(Action::RecipeDeleted(b));
    assert_eq!(state.selected_recipe, Some(a));

    state.apply(Action::RecipeDeleted(a));
    assert_eq!(state.selected_recipe, None);

    state.apply(Action::SelectRecipe(Some(b)));
    let before = state.clone();
    state.apply(Action::MealPlanChanged(date(4)));
    assert_eq!(state, before);
    assert!(Action::MealPlanChanged(date(4)).changes_data());
    assert!(!Action::NextWeek.changes_data());
}

#[test]
fn sidebar_order() {
    assert_eq!(
        SidebarItem::iter().collect::<Vec<_>>(),
        vec![
            SidebarItem::Gallery,
            SidebarItem::Calendar,
            SidebarItem::Groceries
        ]
    );
    assert_eq!(SidebarItem::Groceries.to_string(), "Groceries");
}
