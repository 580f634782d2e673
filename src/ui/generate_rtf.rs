use crate::database::models::MealSlot;
use crate::planning::{full_day_name, WeekPlan};
use chrono::{Datelike as _, NaiveDate};
use std::path::{Path, PathBuf};

fn rich_text_header() -> String {
    let mut rich_text = String::new();
    rich_text += "{\\rtf1\n";
    rich_text +=
        "{\\fonttbl\\f0\\fnil\\fcharset0 HelveticaNeue-Bold;\\f1\\fswiss\\fcharset0 Helvetica;}\n";

    rich_text += "\\pard";
    for i in 1..13 {
        rich_text += &format!("\\tx{}", i * 560);
    }
    rich_text += "\\pardirnatural\\partightenfactor0\n";
    rich_text
}

fn rich_text_heading(text: &str, start: NaiveDate) -> String {
    let mut rich_text = String::new();
    rich_text += &format!("\\f0\\b\\fs24 \\cf0 {text} for the Week \\\n");
    rich_text += &start.format("of the %e, %B %Y\n").to_string();
    rich_text += "\\f1\\b0 ";
    rich_text
}

/// Escapes text typed by the user so it shows up literally in the document.
fn escape(text: &str) -> String {
    let mut escaped = String::new();
    for c in text.chars() {
        match c {
            '\\' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() => escaped.push(c),
            c => {
                let mut units = [0; 2];
                for unit in c.encode_utf16(&mut units) {
                    escaped += &format!("\\u{}?", *unit as i16);
                }
            }
        }
    }
    escaped
}

pub fn menu_rich_text(week: &WeekPlan) -> String {
    let mut rich_text = rich_text_header();
    rich_text += &rich_text_heading("Menu", week.start());
    for date in week.dates() {
        let day_str = full_day_name(date.weekday());
        rich_text += &format!("\\\n\\\n\\f0\\b {day_str}\\f1\\b0 ");
        for slot in MealSlot::iter() {
            let recipe = week
                .meal(date, slot)
                .map(|(_, name)| escape(name))
                .unwrap_or("No Recipe".into());
            rich_text += &format!("\\\n{slot}\t\t{recipe}");
        }
    }
    rich_text += "}";
    rich_text
}

pub fn shopping_list_rich_text(start: NaiveDate, groceries: &[String]) -> String {
    let mut rich_text = rich_text_header();
    rich_text += &rich_text_heading("Shopping List", start);
    rich_text += "\\\n";
    for item in groceries {
        rich_text += &format!("\\\n{}", escape(item));
    }
    rich_text += "}";
    rich_text
}

fn write_rich_text(dir: &Path, file_name: &str, rich_text: &str) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, rich_text)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

pub fn generate_and_open_menu(data_dir: &Path, week: &WeekPlan) -> crate::Result<()> {
    let path = write_rich_text(
        &data_dir.join("menus"),
        &format!("menu-{}.rtf", week.start()),
        &menu_rich_text(week),
    )?;
    open::that(path)?;
    Ok(())
}

pub fn generate_and_open_shopping_list(
    data_dir: &Path,
    start: NaiveDate,
    groceries: &[String],
) -> crate::Result<()> {
    let path = write_rich_text(
        &data_dir.join("shopping-lists"),
        &format!("shopping-list-{start}.rtf"),
        &shopping_list_rich_text(start, groceries),
    )?;
    open::that(path)?;
    Ok(())
}

#[cfg(test)]
fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[test]
fn escaping() {
    assert_eq!(escape("plain text"), "plain text");
    assert_eq!(escape("{a} \\ b"), "\\{a\\} \\\\ b");
    assert_eq!(escape("crème"), "cr\\u232?me");
}

#[test]
fn menu() {
    use crate::database::models::RecipeId;
    use crate::planning::DayPlan;
    use maplit::hashmap;

    let soup = RecipeId::for_test(4);
    let mut tuesday = DayPlan::new(date(4));
    tuesday.set_slot(MealSlot::Dinner, Some(soup));
    let week = WeekPlan::new(
        date(3),
        vec![tuesday],
        hashmap! { soup => "Soup {spicy}".to_string() },
    );

    let text = menu_rich_text(&week);
    assert!(text.starts_with("{\\rtf1\n"));
    assert!(text.ends_with('}'));
    assert!(text.contains("Menu for the Week \\\nof the  3, June 2024\n"));
    assert!(text.contains("\\f0\\b Tuesday\\f1\\b0 \\\nBreakfast\t\tNo Recipe"));
    assert!(text.contains("Dinner\t\tSoup \\{spicy\\}"));
    assert_eq!(text.matches("No Recipe").count(), 20);

    let monday = text.find("Monday").unwrap();
    let sunday = text.find("Sunday").unwrap();
    assert!(monday < sunday);
}

#[test]
fn shopping_list() {
    let groceries = vec!["Bread".to_string(), "Milk".to_string()];
    let text = shopping_list_rich_text(date(3), &groceries);
    assert!(text.contains("Shopping List for the Week"));
    assert!(text.contains("\\\nBread\\\nMilk}"));

    let empty = shopping_list_rich_text(date(3), &[]);
    assert!(!empty.contains("Bread"));
}

#[test]
fn writes_into_directory() {
    let dir = std::env::temp_dir().join(format!("recipe-planner-rtf-{}", std::process::id()));
    let path = write_rich_text(&dir.join("menus"), "menu-test.rtf", "{\\rtf1 hi}").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\\rtf1 hi}");
    std::fs::remove_dir_all(&dir).unwrap();
}
