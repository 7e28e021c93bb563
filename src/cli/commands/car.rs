//! `carcat car` command - Cars and their categories

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{print_deleted, print_structured, print_written, Session};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::Car;

#[derive(Subcommand, Debug)]
pub enum CarCommands {
    /// List cars
    List(ListArgs),

    /// Show a car's details
    Show(ShowArgs),

    /// Create a car, creating its manufacturer and model if needed
    New(NewArgs),

    /// Re-point a car at another manufacturer, model or year
    Update(UpdateArgs),

    /// Delete a car and its category memberships
    Delete(ShowArgs),

    /// Put a car into a category, creating the category if needed
    AddCategory(MembershipArgs),

    /// Take a car out of a category
    RemoveCategory(MembershipArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only cars of this manufacturer (any model year)
    #[arg(long, short = 'm')]
    pub manufacturer: Option<String>,

    /// Only model years from this one on
    #[arg(long, requires = "manufacturer")]
    pub min_year: Option<i32>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Car id
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Manufacturer name
    pub manufacturer: String,

    /// Model name
    pub model: String,

    /// Model year
    pub year: i32,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Car id
    pub id: i64,

    /// New manufacturer name
    pub manufacturer: String,

    /// New model name
    pub model: String,

    /// New model year
    pub year: i32,
}

#[derive(clap::Args, Debug)]
pub struct MembershipArgs {
    /// Car id
    pub id: i64,

    /// Category name
    pub category: String,
}

pub fn run(cmd: CarCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CarCommands::List(args) => run_list(args, global),
        CarCommands::Show(args) => run_show(args, global),
        CarCommands::New(args) => run_new(args, global),
        CarCommands::Update(args) => run_update(args, global),
        CarCommands::Delete(args) => run_delete(args, global),
        CarCommands::AddCategory(args) => run_add_category(args, global),
        CarCommands::RemoveCategory(args) => run_remove_category(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let page = session.page(global);
    let catalog = &session.catalog;

    let cars = match (&args.manufacturer, args.min_year) {
        (Some(name), Some(min_year)) => catalog.list_cars_by_manufacturer_min_year(name, min_year, &page)?,
        (Some(name), None) => catalog.list_cars_by_manufacturer(name, &page)?,
        (None, _) => catalog.list_cars(&page)?,
    };

    print_cars(&cars, session.format(global, OutputFormat::Tsv), global.quiet)
}

/// Print cars as a listing; shared by the `show` commands of the other entities
pub(crate) fn print_cars(cars: &[Car], format: OutputFormat, quiet: bool) -> Result<()> {
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(cars, format);
    }

    let mut table = Table::new("car", &["id", "manufacturer", "model", "year", "categories"]);
    for car in cars {
        table.push(
            car.id,
            vec![
                car.id.to_string(),
                car.manufacturer.name.clone(),
                car.model.name.clone(),
                car.year().to_string(),
                car.category_names().join(", "),
            ],
        );
    }
    table.print(format, quiet)
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let car = session.catalog.get_car(args.id)?;

    match session.format(global, OutputFormat::Auto) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&car, format),
        OutputFormat::Id => {
            println!("{}", car.id);
            Ok(())
        }
        _ => {
            print_car(&car);
            Ok(())
        }
    }
}

fn print_car(car: &Car) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(car.id).cyan());
    println!(
        "{}: {} (#{})",
        style("Manufacturer").bold(),
        style(&car.manufacturer.name).yellow(),
        car.manufacturer.id
    );
    println!(
        "{}: {} (#{})",
        style("Model").bold(),
        style(&car.model.name).yellow(),
        car.model.id
    );
    println!("{}: {}", style("Year").bold(), car.year());
    println!("{}", style("─".repeat(60)).dim());

    if car.categories.is_empty() {
        println!("{}", style("No categories").dim());
    } else {
        println!("{} ({}):", style("Categories").bold(), car.categories.len());
        for category in &car.categories {
            println!("  • {} {}", category.name, style(format!("#{}", category.id)).dim());
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let car = session
        .catalog
        .create_car(&args.manufacturer, &args.model, args.year)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Created", "car", car.id, &car, global, format)
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let car = session
        .catalog
        .update_car(args.id, &args.manufacturer, &args.model, args.year)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Updated", "car", car.id, &car, global, format)
}

fn run_delete(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let stats = session.catalog.delete_car(args.id)?;

    let format = session.format(global, OutputFormat::Auto);
    print_deleted(&format!("car #{}", args.id), &stats, global, format)
}

fn run_add_category(args: MembershipArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let car = session.catalog.add_category(args.id, &args.category)?;

    let format = session.format(global, OutputFormat::Auto);
    let what = format!("car to category '{}':", args.category);
    print_written("Added", &what, car.id, &car, global, format)
}

fn run_remove_category(args: MembershipArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let car = session.catalog.remove_category(args.id, &args.category)?;

    let format = session.format(global, OutputFormat::Auto);
    let what = format!("car from category '{}':", args.category);
    print_written("Removed", &what, car.id, &car, global, format)
}
