use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{RedflagError, Result};
use crate::models::{RawTable, RawValue};

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Source formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceFormat {
    Csv,
    #[cfg(feature = "xlsx")]
    Workbook,
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

impl SourceFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            #[cfg(feature = "xlsx")]
            Self::Workbook => "xlsx",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        match key.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            #[cfg(feature = "xlsx")]
            "xlsx" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(RedflagError::UnknownFormat(key.to_string())),
        }
    }

    /// Pick a format from the file extension; anything unrecognised is read as CSV.
    pub fn detect(file_path: &Path) -> Result<Self> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return Self::from_key("xlsx");
        }
        Ok(Self::Csv)
    }

    pub fn read(&self, file_path: &Path) -> Result<RawTable> {
        match self {
            Self::Csv => read_csv(file_path),
            #[cfg(feature = "xlsx")]
            Self::Workbook => read_workbook(file_path),
        }
    }
}

/// Load a raw table from disk. `format_key` overrides extension detection.
pub fn load_table(file_path: &Path, format_key: Option<&str>) -> Result<RawTable> {
    let format = match format_key {
        Some(key) => SourceFormat::from_key(key)?,
        None => SourceFormat::detect(file_path)?,
    };
    let table = format.read(file_path)?;
    debug!(
        format = format.key(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "loaded {}",
        file_path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(file_path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let columns: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    let mut table = RawTable::new(columns);
    for result in rdr.byte_records() {
        let record = result?;
        // Rows of bare separators (`,,`) are spacing, not transactions.
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        table.push_row(
            record
                .iter()
                .map(|f| RawValue::text(String::from_utf8_lossy(f)))
                .collect(),
        );
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Spreadsheets (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
fn workbook_cell(cell: &calamine::Data) -> RawValue {
    use calamine::Data;
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::text(s.clone()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::text(b.to_string()),
        Data::DateTime(dt) => crate::normalizer::excel_serial_to_datetime(dt.as_f64())
            .map_or(RawValue::Empty, RawValue::DateTime),
    }
}

#[cfg(feature = "xlsx")]
fn read_workbook(file_path: &Path) -> Result<RawTable> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(file_path)
        .map_err(|e| RedflagError::Other(format!("Failed to open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RedflagError::Other("Workbook has no worksheets".to_string()))?
        .map_err(|e| RedflagError::Other(format!("Failed to read worksheet: {e}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|c| crate::normalizer::parse_text(&workbook_cell(c)))
                .collect()
        })
        .unwrap_or_default();
    let mut table = RawTable::new(columns);
    for row in rows {
        if row.iter().all(|c| matches!(c, calamine::Data::Empty)) {
            continue;
        }
        table.push_row(row.iter().map(workbook_cell).collect());
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "txns.csv",
            "TransactionID,Date,Amount,Vendor\n\
             T1,2025-01-15,\"1,200.00\",Acme\n\
             T2,2025-01-16,,\n",
        );
        let table = load_table(&path, None).unwrap();
        assert_eq!(table.columns, vec!["TransactionID", "Date", "Amount", "Vendor"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], RawValue::text("1,200.00"));
        assert_eq!(table.rows[1][2], RawValue::Empty);
    }

    #[test]
    fn test_read_csv_ragged_and_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "txns.csv",
            "TransactionID,Date,Amount\nT1,2025-01-15\n,,\nT2,2025-01-16,5,extra\n",
        );
        let table = load_table(&path, None).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_read_csv_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"TransactionID,Date,Amount,Vendor\nT1,2025-01-15,5,Caf\xe9\n").unwrap();
        let table = load_table(&path, Some("csv")).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(matches!(&table.rows[0][3], RawValue::Text(s) if s.starts_with("Caf")));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(SourceFormat::detect(Path::new("a.csv")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::detect(Path::new("a.txt")).unwrap(), SourceFormat::Csv);
        #[cfg(feature = "xlsx")]
        assert_eq!(SourceFormat::detect(Path::new("a.XLSX")).unwrap(), SourceFormat::Workbook);
    }

    #[test]
    fn test_unknown_format_key() {
        let err = SourceFormat::from_key("parquet").unwrap_err();
        assert!(matches!(err, RedflagError::UnknownFormat(_)));
    }

    #[test]
    fn test_compute_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Date,Amount\n");
        let b = write_file(dir.path(), "b.csv", "Date,Amount\n");
        let c = write_file(dir.path(), "c.csv", "Date,Amount,X\n");
        let sum = compute_checksum(&a).unwrap();
        assert_eq!(sum.len(), 64);
        assert_eq!(sum, compute_checksum(&b).unwrap());
        assert_ne!(sum, compute_checksum(&c).unwrap());
    }
}
