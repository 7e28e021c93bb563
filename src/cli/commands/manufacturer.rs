//! `carcat manufacturer` command - Manufacturer management
//!
//! A manufacturer is one row per `(name, year)`; commands that take only a
//! name act on every year-version of it.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{print_deleted, print_structured, print_written, Session};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::ManufacturerWithCars;

#[derive(Subcommand, Debug)]
pub enum ManufacturerCommands {
    /// List manufacturer versions
    List(ListArgs),

    /// List distinct manufacturer names
    Names,

    /// Show a manufacturer's versions and their cars
    Show(NameArgs),

    /// Create a manufacturer version
    New(NewArgs),

    /// Rename a manufacturer version or change its year
    Update(UpdateArgs),

    /// Delete manufacturer versions with their cars and memberships
    Delete(NameArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only names starting with this prefix
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Manufacturer name
    pub name: String,

    /// Only this model year (default: every year)
    #[arg(long, short = 'y')]
    pub year: Option<i32>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Manufacturer name
    pub name: String,

    /// Model year
    pub year: i32,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Manufacturer id
    pub id: i64,

    /// New name
    pub name: String,

    /// New model year
    pub year: i32,
}

pub fn run(cmd: ManufacturerCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ManufacturerCommands::List(args) => run_list(args, global),
        ManufacturerCommands::Names => run_names(global),
        ManufacturerCommands::Show(args) => run_show(args, global),
        ManufacturerCommands::New(args) => run_new(args, global),
        ManufacturerCommands::Update(args) => run_update(args, global),
        ManufacturerCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let page = session.page(global);
    let manufacturers = session
        .catalog
        .list_manufacturers(args.prefix.as_deref(), &page)?;

    let format = session.format(global, OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(&manufacturers, format);
    }

    let mut table = Table::new("manufacturer", &["id", "name", "year"]);
    for mf in &manufacturers {
        table.push(mf.id, vec![mf.id.to_string(), mf.name.clone(), mf.year.to_string()]);
    }
    table.print(format, global.quiet)
}

fn run_names(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let page = session.page(global);
    let names = session.catalog.list_manufacturer_names(&page)?;

    let format = session.format(global, OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(&names, format);
    }

    let mut table = Table::new("manufacturer name", &["name"]);
    for name in &names {
        table.push(name, vec![name.clone()]);
    }
    table.print(format, global.quiet)
}

fn run_show(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;

    if let Some(year) = args.year {
        catalog.find_manufacturer(&args.name, year)?;
    }
    let versions: Vec<ManufacturerWithCars> = catalog
        .list_manufacturers_by_name(&args.name, &session.page(global))?
        .into_iter()
        .filter(|v| args.year.map_or(true, |year| v.manufacturer.year == year))
        .collect();
    if versions.is_empty() {
        return Err(miette::miette!("No manufacturer named '{}'", args.name));
    }

    match session.format(global, OutputFormat::Auto) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&versions, format),
        OutputFormat::Id => {
            for v in &versions {
                println!("{}", v.manufacturer.id);
            }
            Ok(())
        }
        _ => {
            for v in &versions {
                print_version(v);
            }
            Ok(())
        }
    }
}

fn print_version(version: &ManufacturerWithCars) {
    let mf = &version.manufacturer;
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{} {} {}",
        style(&mf.name).yellow().bold(),
        mf.year,
        style(format!("#{}", mf.id)).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    if version.cars.is_empty() {
        println!("{}", style("No cars").dim());
        return;
    }
    println!("{} ({}):", style("Cars").bold(), version.cars.len());
    for car in &version.cars {
        let categories = car.category_names();
        if categories.is_empty() {
            println!("  • #{} {}", car.id, car.model.name);
        } else {
            println!(
                "  • #{} {} {}",
                car.id,
                car.model.name,
                style(format!("[{}]", categories.join(", "))).dim()
            );
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let mf = session.catalog.create_manufacturer(&args.name, args.year)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Created", "manufacturer", mf.id, &mf, global, format)
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let mf = session
        .catalog
        .update_manufacturer(args.id, &args.name, args.year)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Updated", "manufacturer", mf.id, &mf, global, format)
}

fn run_delete(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let (stats, what) = match args.year {
        Some(year) => (
            session.catalog.delete_manufacturer(&args.name, year)?,
            format!("manufacturer '{}' ({})", args.name, year),
        ),
        None => (
            session.catalog.delete_manufacturers_by_name(&args.name)?,
            format!("manufacturer '{}'", args.name),
        ),
    };

    let format = session.format(global, OutputFormat::Auto);
    print_deleted(&what, &stats, global, format)
}
