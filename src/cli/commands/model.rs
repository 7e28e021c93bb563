//! `carcat model` command - Model management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::car::print_cars;
use crate::cli::helpers::{print_deleted, print_structured, print_written, Session};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ModelCommands {
    /// List models
    List(ListArgs),

    /// Show a model and every car built on it
    Show(NameArgs),

    /// Create a model
    New(NameArgs),

    /// Rename a model
    Update(UpdateArgs),

    /// Delete a model; refused while cars still reference it
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
    /// Model name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Model id
    pub id: i64,

    /// New name
    pub name: String,
}

pub fn run(cmd: ModelCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ModelCommands::List(args) => run_list(args, global),
        ModelCommands::Show(args) => run_show(args, global),
        ModelCommands::New(args) => run_new(args, global),
        ModelCommands::Update(args) => run_update(args, global),
        ModelCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let models = session
        .catalog
        .list_models(args.prefix.as_deref(), &session.page(global))?;

    let format = session.format(global, OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(&models, format);
    }

    let mut table = Table::new("model", &["id", "name"]);
    for model in &models {
        table.push(model.id, vec![model.id.to_string(), model.name.clone()]);
    }
    table.print(format, global.quiet)
}

fn run_show(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let found = session.catalog.model_with_cars(&args.name)?;

    match session.format(global, OutputFormat::Auto) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&found, format),
        OutputFormat::Id => {
            println!("{}", found.model.id);
            Ok(())
        }
        format => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {} {}",
                style("Model").bold(),
                style(&found.model.name).yellow(),
                style(format!("#{}", found.model.id)).cyan()
            );
            println!("{}", style("─".repeat(60)).dim());
            print_cars(&found.cars, format, global.quiet)
        }
    }
}

fn run_new(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let model = session.catalog.create_model(&args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Created", "model", model.id, &model, global, format)
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let model = session.catalog.update_model(args.id, &args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_written("Updated", "model", model.id, &model, global, format)
}

fn run_delete(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let stats = session.catalog.delete_model(&args.name)?;

    let format = session.format(global, OutputFormat::Auto);
    print_deleted(&format!("model '{}'", args.name), &stats, global, format)
}
