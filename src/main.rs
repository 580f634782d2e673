// Copyright 2023 Remi Bernotavicius

use chrono::{Datelike as _, NaiveDate};
use clap::Parser;
use clap::Subcommand;
use std::io::Write;
use std::path::PathBuf;

mod database;
mod planning;
mod ui;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
#[command(version, about = "Plan the week's meals and get the groceries for them")]
struct Args {
    /// Directory holding the database and generated documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the planner window (the default)
    Run,
    /// Print the grocery list for a week
    Groceries {
        /// Any date in the week, defaults to this week
        #[arg(long)]
        week: Option<NaiveDate>,
    },
    /// Print the meals planned for a week
    Menu {
        #[arg(long)]
        week: Option<NaiveDate>,
    },
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_planner/`
fn data_path(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match data_dir {
        Some(path) => path,
        None => {
            let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
            dirs.data_dir().join("recipe_planner")
        }
    };
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn week_start(week: Option<NaiveDate>) -> NaiveDate {
    week.map(planning::week_of)
        .unwrap_or_else(planning::this_week)
}

fn run(conn: database::Connection, data_dir: PathBuf) -> Result<()> {
    let native_options = eframe::NativeOptions {
        window_builder: Some(Box::new(|mut b: egui::viewport::ViewportBuilder| {
            b.maximized = Some(true);
            b.min_inner_size = Some(egui::vec2(800.0, 600.0));
            b
        })),
        ..Default::default()
    };
    eframe::run_native(
        "Recipe Planner",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ui::RecipePlanner::new(cc, conn, data_dir)?))
        }),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn print_groceries(
    out: &mut impl Write,
    conn: &mut database::Connection,
    start: NaiveDate,
) -> Result<()> {
    let groceries = database::query::aggregate_groceries(conn, start)?;
    writeln!(out, "Groceries for {start} to {}", planning::week_end(start))?;
    if groceries.is_empty() {
        writeln!(out, "  nothing planned")?;
    }
    for item in groceries {
        writeln!(out, "  {item}")?;
    }
    Ok(())
}

fn print_menu(
    out: &mut impl Write,
    conn: &mut database::Connection,
    start: NaiveDate,
) -> Result<()> {
    writeln!(out, "Menu for the week of {start}")?;
    for date in planning::week_dates(start) {
        writeln!(out, "{} {date}", planning::full_day_name(date.weekday()))?;
        for slot in database::models::MealSlot::iter() {
            let recipe = database::query::meal_recipe(conn, date, slot)?;
            let name = recipe.as_ref().map(|r| r.name.as_str()).unwrap_or("-");
            writeln!(out, "  {:<10} {name}", slot.to_string())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .with_module_level("eframe", log::LevelFilter::Warn)
        .with_module_level("egui_glow", log::LevelFilter::Warn)
        .with_module_level("winit", log::LevelFilter::Warn)
        .init()?;

    let data_dir = data_path(args.data_dir)?;
    let mut conn = match database::establish_connection(data_dir.join("data.sqlite")) {
        Ok(conn) => conn,
        Err(error) => {
            if error.is_unavailable() {
                log::error!("can't open the recipe store in {}", data_dir.display());
            }
            return Err(error.into());
        }
    };

    match args.commands.unwrap_or(Commands::Run) {
        Commands::Run => run(conn, data_dir)?,
        Commands::Groceries { week } => {
            print_groceries(&mut std::io::stdout().lock(), &mut conn, week_start(week))?
        }
        Commands::Menu { week } => {
            print_menu(&mut std::io::stdout().lock(), &mut conn, week_start(week))?
        }
    }
    Ok(())
}

#[cfg(test)]
fn planned_week() -> (database::Connection, NaiveDate) {
    use database::{models::MealSlot, query};

    let mut conn = database::establish_in_memory();
    let mut soup = planning::RecipeDraft::new("Soup");
    soup.ingredients = vec!["Stock".into(), "Onion".into()];
    let soup = query::add_recipe(&mut conn, &soup).unwrap();
    let mut toast = planning::RecipeDraft::new("Toast");
    toast.ingredients = vec!["Bread".into(), "Onion".into()];
    let toast = query::add_recipe(&mut conn, &toast).unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let tuesday = start.succ_opt().unwrap();
    query::assign_meal(&mut conn, tuesday, MealSlot::Breakfast, Some(toast)).unwrap();
    query::assign_meal(&mut conn, tuesday, MealSlot::Dinner, Some(soup)).unwrap();
    (conn, start)
}

#[cfg(test)]
fn printed(print: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
    let mut out = vec![];
    print(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn groceries_output() {
    let (mut conn, start) = planned_week();
    assert_eq!(
        printed(|out| print_groceries(out, &mut conn, start)),
        "Groceries for 2024-03-04 to 2024-03-10\n  Bread\n  Onion\n  Stock\n"
    );

    let next = planning::next_week(start);
    assert_eq!(
        printed(|out| print_groceries(out, &mut conn, next)),
        "Groceries for 2024-03-11 to 2024-03-17\n  nothing planned\n"
    );
}

#[test]
fn menu_output() {
    let (mut conn, start) = planned_week();
    let menu = printed(|out| print_menu(out, &mut conn, start));
    let lines: Vec<&str> = menu.lines().collect();
    assert_eq!(lines.len(), 1 + 7 * 4);
    assert_eq!(lines[0], "Menu for the week of 2024-03-04");
    assert_eq!(lines[1], "Monday 2024-03-04");
    assert_eq!(lines[2], "  Breakfast  -");
    assert_eq!(
        &lines[5..9],
        &[
            "Tuesday 2024-03-05",
            "  Breakfast  Toast",
            "  Lunch      -",
            "  Dinner     Soup",
        ]
    );
    assert_eq!(lines[25], "Sunday 2024-03-10");
}
