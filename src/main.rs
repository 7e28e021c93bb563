use carcat::cli::commands::{car, category, completions, init, manufacturer, model, status};
use carcat::cli::helpers;
use carcat::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    // Terminate silently when piped into `head` and friends
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    helpers::init_logging(&global)?;

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Status(args) => status::run(args, &global),
        Commands::Manufacturer(cmd) => manufacturer::run(cmd, &global),
        Commands::Model(cmd) => model::run(cmd, &global),
        Commands::Category(cmd) => category::run(cmd, &global),
        Commands::Car(cmd) => car::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
