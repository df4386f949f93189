pub mod check;
pub mod params;

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print `data` as pretty JSON, with a heading in text mode
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat, title: Option<&str>) -> Result<()> {
    if format == OutputFormat::Text {
        if let Some(title) = title {
            println!("{}", title.bold().green());
            println!("{}", "=".repeat(title.len()));
        }
    }
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message.blue());
}
