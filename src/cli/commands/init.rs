//! `carcat init` command - Initialize a new catalog

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::Catalog;
use crate::core::config::Config;
use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Recreate the catalog even if .carcat/ already exists (drops all rows)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        // Drop whatever database the current config resolves to
        let existing = Project::at(&path);
        let config = Config::load(Some(&existing))?;
        Project::init_force(&path, &config.database_path(&existing))
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            // Opening the store creates the database and its schema
            let config = Config::load(Some(&project))?;
            let db_path = config.database_path(&project);
            Catalog::open(&db_path, &config.store_options())?;

            println!(
                "{} Initialized catalog at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!("  {}", style(project.config_path().display()).dim());
            println!("  {}", style(db_path.display()).dim());
            println!();
            println!("Next steps:");
            println!(
                "  {} Add a car (creates its manufacturer and model)",
                style("carcat car new <MANUFACTURER> <MODEL> <YEAR>").yellow()
            );
            println!("  {} List all cars", style("carcat car list").yellow());
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Catalog already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to start over", style("carcat init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
