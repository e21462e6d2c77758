use std::path::Path;

use colored::Colorize;

use crate::cli::prompt;
use crate::error::{CashflowError, Result};
use crate::settings::{self, Settings};

pub fn set(path: &str) -> Result<()> {
    if !Path::new(path).is_file() {
        return Err(CashflowError::Other(format!(
            "category file not found: {path}"
        )));
    }

    if settings::settings_file_exists() {
        let old = settings::load_settings().category_file;
        if old != path {
            let answer = prompt(&format!(
                "Category file is currently {old}\nChange to {path}? y/n: "
            ));
            if !answer.eq_ignore_ascii_case("y") {
                println!("Category file location not changed");
                return Ok(());
            }
        }
    }

    settings::save_settings(&Settings {
        category_file: path.to_string(),
    })?;
    println!("Category file set to {path}");
    Ok(())
}

pub fn show() -> Result<()> {
    let path = settings::category_file_path();
    let note = if settings::settings_file_exists() {
        "(from config file)"
    } else {
        "(from default location)"
    };
    println!("Category file: {} {}", path.display(), note.dimmed());
    Ok(())
}
