pub mod config;
pub mod normalize;
pub mod render;
pub mod scan;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "redflag",
    version,
    about = "Rule-based fraud screening for batches of financial transactions."
)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a CSV/XLSX file and list prioritized fraud alerts.
    Scan(ScanArgs),
    /// Write the canonical, normalized form of a transaction file as CSV.
    Normalize {
        /// Path to CSV or XLSX file
        file: String,
        /// Input format: csv, xlsx (default: from extension)
        #[arg(long)]
        format: Option<String>,
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Inspect or create the settings file.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print a shell completion script.
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// Path to CSV or XLSX file
    pub file: String,
    /// Input format: csv, xlsx (default: from extension)
    #[arg(long)]
    pub format: Option<String>,
    /// How to render alerts
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
    /// Write to this path instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
    /// Also print each rule's findings (table output only)
    #[arg(long)]
    pub details: bool,
    /// Settings file (default: ~/.config/redflag/settings.json)
    #[arg(long)]
    pub config: Option<String>,
    #[command(flatten)]
    pub overrides: DetectionOverrides,
}

/// Per-run overrides layered on top of the settings file.
#[derive(Args, Debug, Default)]
pub struct DetectionOverrides {
    /// Minimum |z-score| for an amount spike
    #[arg(long = "z-threshold")]
    pub z_threshold: Option<f64>,
    /// Transaction count that flags an employee
    #[arg(long = "min-employee-tx")]
    pub min_employee_tx: Option<usize>,
    /// Small invoices per vendor and day that suggest splitting
    #[arg(long = "same-day-count")]
    pub same_day_count: Option<usize>,
    /// Largest amount counted as a small invoice
    #[arg(long = "small-amount")]
    pub small_amount: Option<f64>,
    /// Suspicious round amount (repeatable; replaces the configured set)
    #[arg(long = "threshold-amount")]
    pub threshold_amounts: Vec<f64>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as JSON.
    Show {
        /// Settings file (default: ~/.config/redflag/settings.json)
        #[arg(long)]
        config: Option<String>,
    },
    /// Write a settings file populated with defaults.
    Init {
        /// Settings file (default: ~/.config/redflag/settings.json)
        #[arg(long)]
        config: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Write rendered output to `output`, or stdout when `None`.
pub(crate) fn emit(body: &str, output: Option<&str>) -> crate::error::Result<()> {
    match output {
        Some(path) => {
            let p = std::path::Path::new(path);
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(p, body)?;
            eprintln!("Wrote {}", p.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}
