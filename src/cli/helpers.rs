//! Shared helper functions for CLI commands
//!
//! Opening the catalog, resolving the page request and output format, and
//! the status lines printed after writes.

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, DeleteStats};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::logging;
use crate::core::page::PageRequest;
use crate::core::project::Project;

/// An opened catalog with the configuration it was opened with
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub catalog: Catalog,
}

impl Session {
    /// Locate the catalog home, load config and open the database
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = locate_project(global)?;
        let config = Config::load(Some(&project))?;
        let path = config.database_path(&project);
        debug!(path = %path.display(), "opening catalog");

        let catalog = Catalog::open(&path, &config.store_options())?;
        Ok(Self {
            project,
            config,
            catalog,
        })
    }

    /// Page request from `--page`, `--size`, `--sort` and the configured page size
    pub fn page(&self, global: &GlobalOpts) -> PageRequest {
        let size = global.size.unwrap_or_else(|| self.config.page_size());
        let page = PageRequest::new(global.page, size);
        match global.sort {
            Some(spec) => page.sorted(spec.key, spec.direction),
            None => page,
        }
    }

    /// Output format: the flag, then `default_format` from config, then `fallback`
    pub fn format(&self, global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
        resolve_format(global.format, self.config.default_format.as_deref(), fallback)
    }
}

/// Find the catalog home from `--catalog` or the current directory
pub fn locate_project(global: &GlobalOpts) -> Result<Project> {
    let found = match &global.catalog {
        Some(dir) => Project::discover_from(dir),
        None => Project::discover(),
    };
    found.map_err(|e| miette::miette!("{}", e))
}

pub fn resolve_format(flag: OutputFormat, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
    if flag != OutputFormat::Auto {
        return flag;
    }
    match configured.and_then(|s| OutputFormat::from_str(s, true).ok()) {
        Some(OutputFormat::Auto) | None => fallback,
        Some(format) => format,
    }
}

/// Install logging before any command runs
///
/// Reads `log_filter` from config when a catalog home is found; a broken
/// or missing config is reported later by the command itself.
pub fn init_logging(global: &GlobalOpts) -> Result<()> {
    let configured = locate_project(global)
        .ok()
        .and_then(|project| Config::load(Some(&project)).ok())
        .and_then(|config| config.log_filter);
    logging::init_logging(configured.as_deref(), global.verbose)?;
    Ok(())
}

/// Print a serializable value as JSON or YAML
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Report the outcome of a write
///
/// JSON/YAML print the entity, `id` and `--quiet` print only its id, and
/// everything else prints a styled status line.
pub fn print_written<T: Serialize>(
    verb: &str,
    what: &str,
    id: i64,
    value: &T,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(value, format),
        OutputFormat::Id => {
            println!("{}", id);
            Ok(())
        }
        _ if global.quiet => {
            println!("{}", id);
            Ok(())
        }
        _ => {
            println!(
                "{} {} {} {}",
                style("✓").green(),
                verb,
                what,
                style(format!("#{}", id)).cyan()
            );
            Ok(())
        }
    }
}

/// Report a delete; nothing removed is a notice, not an error
pub fn print_deleted(what: &str, stats: &DeleteStats, global: &GlobalOpts, format: OutputFormat) -> Result<()> {
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_structured(stats, format);
    }

    if stats.is_empty() {
        if !global.quiet {
            println!("{} No {} found, nothing deleted", style("!").yellow(), what);
        }
        return Ok(());
    }

    if global.quiet {
        return Ok(());
    }

    println!("{} Deleted {}", style("✓").green(), what);
    let parts: Vec<String> = [
        ("manufacturer", stats.manufacturers),
        ("model", stats.models),
        ("category", stats.categories),
        ("car", stats.cars),
        ("membership", stats.memberships),
    ]
    .iter()
    .filter(|(_, n)| *n > 0)
    .map(|(noun, n)| format!("{} {}(s)", n, noun))
    .collect();
    println!("  {}", style(parts.join(", ")).dim());
    Ok(())
}
