mod category;
mod cli;
mod error;
mod fmt;
mod journal;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{Cli, Commands, ConfigCommands, RunArgs};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run(args)) => cli::run::run(args),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Set { path } => cli::config::set(&path),
            ConfigCommands::Show => cli::config::show(),
        },
        // Bare `cashflow` processes the current year with the configured
        // category file, like `cashflow run`.
        None => cli::run::run(RunArgs::default()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
