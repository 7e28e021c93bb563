//! `carcat status` command - Catalog row counts

use console::style;
use miette::Result;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let stats = session.catalog.statistics()?;

    match session.format(global, OutputFormat::Auto) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&stats, format),
        _ => {
            let width = 40;
            println!("{}", style("Catalog Status").bold().underlined());
            println!("{}", "═".repeat(width));
            println!(
                "{}: {}",
                style("Catalog").bold(),
                style(session.project.root().display()).cyan()
            );
            println!("{}", style("─".repeat(width)).dim());

            let rows = [
                ("Manufacturers", stats.manufacturers),
                ("Models", stats.models),
                ("Categories", stats.categories),
                ("Cars", stats.cars),
                ("Memberships", stats.memberships),
            ];
            for (label, count) in rows {
                println!("  {:<16}{}", label, style(count).cyan());
            }
            Ok(())
        }
    }
}
