mod analyzer;
mod cli;
mod error;
mod fmt;
mod loader;
mod models;
mod normalizer;
mod rules;
mod scorer;
mod settings;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "redflag=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Scan(args) => cli::scan::run(args),
        Commands::Normalize {
            file,
            format,
            output,
        } => cli::normalize::run(&file, format.as_deref(), output.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Show { config } => cli::config::show(config),
            ConfigCommands::Init { config, force } => cli::config::init(config, force),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "redflag", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
