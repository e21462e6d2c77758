pub mod config;
pub mod report;
pub mod run;

use std::io::Write;

use clap::{Args, Parser, Subcommand};

pub(crate) fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
    input.trim().to_string()
}

#[derive(Parser)]
#[command(
    name = "cashflow",
    about = "Process a yearly cashflow journal into a category-tree report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process the journal for a year and write the report file.
    Run(RunArgs),
    /// Show or change where the category file lives.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Four-digit journal year to process (default: current year)
    pub year: Option<i32>,
    /// Category file path, overriding the configured location
    #[arg(long)]
    pub categories: Option<String>,
    /// Journal file path (default: <year>_cashflow_journal.txt in the cwd)
    #[arg(long)]
    pub journal: Option<String>,
    /// Report output path (default: YYYYMMDD_cashflow_report.txt in the cwd)
    #[arg(long)]
    pub output: Option<String>,
    /// Overwrite an existing report without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Remember where the category file lives.
    Set {
        /// Path to the category file, including the file name
        path: String,
    },
    /// Print the category file location currently in effect.
    Show,
}
