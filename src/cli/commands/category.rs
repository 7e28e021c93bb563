//! `carcat category` command - Category management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::car::print_cars;
use crate::cli::helpers::{print_deleted, print_structured, print_written, Session};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List(ListArgs),

    /// Show a category and its cars
    Show(NameArgs),

    /// Create a category
    New(NameArgs),

    /// Rename a category
    Update(UpdateArgs),

    /// Delete a category; its cars stay, their memberships go
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
    /// Category name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Category id
    pub id: i64,

    /// New name
    pub name: String,
}

pub fn run(cmd: CategoryCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CategoryCommands::List(args) => run_list(args, global),
        CategoryCommands::Show(args) => run_show(args, global),
        CategoryCommands::New(args) => run_new(args, global),
        CategoryCommands::Update(args) => run_update(args, global),
        CategoryCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let categories = session
        .catalog
        .list_categories(args.prefix.as_deref(), &session.page(global))?;

    let format = session.format(global, OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(&categories, format);
    }

    let mut table = Table::new("category", &["id", "name"]);
    for category in &categories {
        table.push(category.id, vec![category.id.to_string(), category.name.clone()]);
    }
    table.print(format, global.quiet)
}

fn run_show(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let found = session.catalog.category_with_cars(&args.name)?;

    match session.format(global, OutputFormat::Auto) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&found, format),
        OutputFormat::Id => {
            println!("{}", found.category.id);
            Ok(())
        }
        format => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {} {}",
                style("Category").bold(),
                style(&found.category.name).yellow(),
                style(format!("#{}", found.category.id)).cyan()
            );
            println!("{}", style("─".repeat(60)).dim());
            print_cars(&found.cars, format, global.quiet)
        }
    }
}

fn run_new(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let category = session.catalog.create_category(&args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Created", "category", category.id, &category, global, format)
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let category = session.catalog.update_category(args.id, &args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Updated", "category", category.id, &category, global, format)
}

fn run_delete(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let stats = session.catalog.delete_category(&args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_deleted(&format!("category '{}'", args.name), &stats, global, format)
}
