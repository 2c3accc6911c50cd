//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use icl_eval_core::TabularRecord;
use icl_eval_metrics::{render, ReportFormat};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// LaTeX tabular
    Latex,
    /// Markdown pipe table
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Latex => write!(f, "latex"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders records in the selected format.
    pub fn render_records<T: Serialize + TabularRecord>(&self, records: &[T]) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Table => {
                if records.is_empty() {
                    "No data collected yet.".dimmed().to_string()
                } else {
                    build_table(records).to_string()
                }
            }
            OutputFormat::Json => render(ReportFormat::Json, records)?,
            OutputFormat::Yaml => serde_yaml::to_string(records)?,
            OutputFormat::Latex => render(ReportFormat::Latex, records)?,
            OutputFormat::Markdown => render(ReportFormat::Markdown, records)?,
        })
    }

    /// Write a list of records
    pub fn write_records<T: Serialize + TabularRecord>(&self, records: &[T]) -> Result<()> {
        println!("{}", self.render_records(records)?);
        Ok(())
    }

    /// Write a titled section; the title is only shown in table mode.
    pub fn write_section<T: Serialize + TabularRecord>(&self, title: &str, records: &[T]) -> Result<()> {
        if self.format == OutputFormat::Table {
            print_section(title);
        }
        self.write_records(records)
    }

    /// Write a single serializable value (used for raw model answers and prompts)
    pub fn write_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
            OutputFormat::Table | OutputFormat::Latex | OutputFormat::Markdown => {
                println!("{}", serde_json::to_string_pretty(value)?)
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Informational line, kept off stdout for machine-readable formats.
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        } else {
            eprintln!("{}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "⚠".yellow(), message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    /// Start a spinner for long operations
    pub fn spinner(&self, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    }

    /// Create a progress bar
    pub fn progress_bar(&self, total: u64, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let pb = indicatif::ProgressBar::new(total);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        pb.set_message(message.to_string());
        Some(pb)
    }
}

fn build_table<T: TabularRecord>(records: &[T]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);

    let header_cells: Vec<Cell> = T::columns()
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for record in records {
        table.add_row(record.cells());
    }
    table
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}
