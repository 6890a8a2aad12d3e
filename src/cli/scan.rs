use std::io::IsTerminal;
use std::path::PathBuf;

use tracing::info;

use crate::analyzer::analyze;
use crate::cli::render;
use crate::cli::{emit, DetectionOverrides, OutputFormat, ScanArgs};
use crate::error::{RedflagError, Result};
use crate::loader::{compute_checksum, load_table};
use crate::settings::{load_settings, DetectionConfig};

impl DetectionOverrides {
    pub fn apply(&self, mut config: DetectionConfig) -> DetectionConfig {
        if let Some(z) = self.z_threshold {
            config.z_threshold = z;
        }
        if let Some(n) = self.min_employee_tx {
            config.employee_min_transactions = n;
        }
        if let Some(n) = self.same_day_count {
            config.same_day_count = n;
        }
        if let Some(a) = self.small_amount {
            config.small_amount = a;
        }
        if !self.threshold_amounts.is_empty() {
            config.threshold_amounts = self.threshold_amounts.clone();
        }
        config
    }
}

pub fn run(args: ScanArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref().map(std::path::Path::new))?;
    let config = args.overrides.apply(settings.detection);

    let file_path = PathBuf::from(&args.file);
    if !file_path.is_file() {
        return Err(RedflagError::Other(format!("File not found: {}", args.file)));
    }
    let checksum = compute_checksum(&file_path)?;
    info!(file = %file_path.display(), sha256 = %checksum, "scanning");

    let table = load_table(&file_path, args.format.as_deref())?;
    let analysis = analyze(&table, &config)?;

    if args.output.is_some() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let body = match args.output_format {
        OutputFormat::Table => {
            let source = file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| args.file.clone());
            render::report(&source, &checksum, &analysis, args.details)
        }
        OutputFormat::Csv => render::alerts_csv(&analysis.alerts)?,
        OutputFormat::Json => render::alerts_json(&analysis.alerts)?,
    };
    emit(body.trim_end(), args.output.as_deref())
}
