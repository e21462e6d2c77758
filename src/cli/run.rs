use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use colored::Colorize;

use crate::category::CategoryRegistry;
use crate::cli::{prompt, RunArgs};
use crate::error::{CashflowError, Result};
use crate::journal::load_journal;
use crate::reports;
use crate::settings;

pub fn run(args: RunArgs) -> Result<()> {
    let year = match args.year {
        Some(y) if (1500..=3000).contains(&y) => y,
        Some(y) => {
            return Err(CashflowError::Other(format!(
                "invalid journal year {y}, must be a four-digit year between 1500 and 3000"
            )))
        }
        None => Local::now().year(),
    };

    let category_path = args
        .categories
        .map(PathBuf::from)
        .unwrap_or_else(settings::category_file_path);
    if !category_path.is_file() {
        return Err(CashflowError::Other(format!(
            "category file not found: {}",
            category_path.display()
        )));
    }

    let journal_path = args
        .journal
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{year}_cashflow_journal.txt")));
    if !journal_path.is_file() {
        return Err(CashflowError::Other(format!(
            "journal file not found: {}",
            journal_path.display()
        )));
    }

    let report_path = args.output.map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(format!("{}_cashflow_report.txt", Local::now().format("%Y%m%d")))
    });
    if report_path.exists() && !args.yes {
        let answer = prompt(&format!(
            "Report file {} already exists, overwrite? y/n: ",
            report_path.display()
        ));
        if !answer.eq_ignore_ascii_case("y") {
            println!("Report file not changed");
            return Ok(());
        }
    }

    // The pipeline order matters: the registry must be complete, hierarchy
    // included, before the journal is read, and all totals loaded before the
    // aggregation fold.
    let category_text = fs::read_to_string(&category_path)?;
    let mut registry = CategoryRegistry::from_text(&category_text, &label(&category_path))?;
    let journal_text = fs::read_to_string(&journal_path)?;
    let journal = load_journal(&journal_text, &label(&journal_path), year, &mut registry)?;
    reports::aggregate(&mut registry);

    let text = super::report::render(&registry, &journal, &category_path, &journal_path, &report_path);
    fs::write(&report_path, text)?;

    println!(
        "{} {} transactions in {} categories for {year}, report written to {}",
        "Processed".green(),
        journal.len(),
        registry.len(),
        report_path.display()
    );
    Ok(())
}

fn label(path: &Path) -> String {
    path.display().to_string()
}
