//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    car::CarCommands, category::CategoryCommands, completions::CompletionsArgs, init::InitArgs,
    manufacturer::ManufacturerCommands, model::ModelCommands, status::StatusArgs,
};
use crate::core::page::SortSpec;

#[derive(Parser)]
#[command(name = "carcat")]
#[command(author, version, about = "Car catalog")]
#[command(
    long_about = "Manage a catalog of manufacturers, models, cars and categories with strict identity: no duplicate rows, no dangling references, no orphans after a delete."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog root (default: auto-detect by finding .carcat/)
    #[arg(long, global = true, env = "CARCAT_HOME")]
    pub catalog: Option<PathBuf>,

    /// Page number for list commands, starting at 0
    #[arg(long, global = true, default_value_t = 0)]
    pub page: u32,

    /// Rows per page for list commands (default: config page_size)
    #[arg(long, global = true)]
    pub size: Option<u32>,

    /// Sort order for list commands: id, name or year, optionally ",desc"
    #[arg(long, global = true, value_parser = parse_sort)]
    pub sort: Option<SortSpec>,
}

fn parse_sort(s: &str) -> Result<SortSpec, String> {
    s.parse::<SortSpec>().map_err(|e| e.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new catalog
    Init(InitArgs),

    /// Show catalog row counts
    Status(StatusArgs),

    /// Manufacturer management (one row per name and model year)
    #[command(subcommand, visible_alias = "mf")]
    Manufacturer(ManufacturerCommands),

    /// Model management
    #[command(subcommand)]
    Model(ModelCommands),

    /// Category management
    #[command(subcommand, visible_alias = "cat")]
    Category(CategoryCommands),

    /// Car management and category membership
    #[command(subcommand)]
    Car(CarCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (pretty for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
