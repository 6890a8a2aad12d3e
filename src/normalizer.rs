use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};
use tracing::{info, warn};

use crate::error::{RedflagError, Result};
use crate::models::{RawTable, RawValue, Transaction};

pub const TRANSACTION_ID: &str = "TransactionID";
pub const DATE: &str = "Date";
pub const TIME: &str = "Time";
pub const VENDOR: &str = "Vendor";
pub const AMOUNT: &str = "Amount";
pub const ACCOUNT: &str = "Account";
pub const EMPLOYEE_ID: &str = "EmployeeID";
pub const INVOICE_NUMBER: &str = "InvoiceNumber";
pub const DESCRIPTION: &str = "Description";

pub const CANONICAL_COLUMNS: [&str; 9] = [
    TRANSACTION_ID,
    DATE,
    TIME,
    VENDOR,
    AMOUNT,
    ACCOUNT,
    EMPLOYEE_ID,
    INVOICE_NUMBER,
    DESCRIPTION,
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
];

// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

static EMPTY: RawValue = RawValue::Empty;

// ---------------------------------------------------------------------------
// Per-field parsing
// ---------------------------------------------------------------------------

/// Outcome of coercing one cell: either the parsed value, or the default that
/// replaced a missing or unparseable input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Defaulted(T),
}

impl<T> Parsed<T> {
    pub fn value(self) -> T {
        match self {
            Self::Value(v) | Self::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Excel date-time serial, including pure time-of-day values below 1.0.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL + 1.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    base.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let try_formats = |s: &str| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    };
    if let Some(d) = try_formats(raw) {
        return Some(d);
    }
    // Timestamps: keep only the date portion.
    let head = raw.split(|c: char| c == 'T' || c.is_whitespace()).next()?;
    if head.len() < raw.len() {
        return try_formats(head);
    }
    None
}

pub fn parse_date(raw: &RawValue) -> Parsed<Option<NaiveDate>> {
    let parsed = match raw {
        RawValue::Date(d) => Some(*d),
        RawValue::DateTime(dt) => Some(dt.date()),
        RawValue::Text(s) => parse_date_str(s),
        RawValue::Number(n) => excel_serial_to_date(*n),
        RawValue::Empty => None,
    };
    match parsed {
        Some(d) => Parsed::Value(Some(d)),
        None => Parsed::Defaulted(None),
    }
}

fn parse_amount_str(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

pub fn parse_amount(raw: &RawValue) -> Parsed<f64> {
    let parsed = match raw {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => parse_amount_str(s),
        RawValue::Empty | RawValue::Date(_) | RawValue::DateTime(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Parsed::Value(v),
        _ => Parsed::Defaulted(0.0),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

pub fn parse_text(raw: &RawValue) -> String {
    match raw {
        RawValue::Empty => String::new(),
        RawValue::Text(s) => s.clone(),
        RawValue::Number(n) => format_number(*n),
        RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Typed time cells become `HH:MM`. Everything else, plain numbers included,
/// is kept as text, so a bare `14` carries no `:` and is never read as an hour.
pub fn parse_time(raw: &RawValue) -> String {
    match raw {
        RawValue::DateTime(dt) => dt.format("%H:%M").to_string(),
        other => parse_text(other),
    }
}

// ---------------------------------------------------------------------------
// Table normalization
// ---------------------------------------------------------------------------

// Duplicate headers differing only in case resolve to the first occurrence.
fn find_column(columns: &[String], name: &str) -> Option<usize> {
    let wanted = name.to_lowercase();
    columns.iter().position(|c| c.to_lowercase() == wanted)
}

fn cell(row: &[RawValue], idx: Option<usize>) -> &RawValue {
    idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY)
}

/// Map an arbitrary raw table onto the canonical transaction schema.
///
/// Fails only when the table lacks a Date column, an Amount column, or both
/// TransactionID and InvoiceNumber. Row-level parse failures degrade to a
/// null date or a zero amount.
pub fn normalize(table: &RawTable) -> Result<Vec<Transaction>> {
    let idx = |name: &str| find_column(&table.columns, name);
    let (id_col, date_col, time_col) = (idx(TRANSACTION_ID), idx(DATE), idx(TIME));
    let (vendor_col, amount_col, account_col) = (idx(VENDOR), idx(AMOUNT), idx(ACCOUNT));
    let (employee_col, invoice_col, desc_col) =
        (idx(EMPLOYEE_ID), idx(INVOICE_NUMBER), idx(DESCRIPTION));

    let mut missing = Vec::new();
    if date_col.is_none() {
        missing.push(DATE);
    }
    if amount_col.is_none() {
        missing.push(AMOUNT);
    }
    if id_col.is_none() && invoice_col.is_none() {
        missing.push("TransactionID or InvoiceNumber");
    }
    if !missing.is_empty() {
        return Err(RedflagError::Validation(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut bad_dates = 0usize;
    let mut bad_amounts = 0usize;
    let rows: Vec<Transaction> = table
        .rows
        .iter()
        .map(|row| {
            let date = parse_date(cell(row, date_col));
            let amount = parse_amount(cell(row, amount_col));
            bad_dates += usize::from(date.is_defaulted());
            bad_amounts += usize::from(amount.is_defaulted());
            Transaction {
                transaction_id: parse_text(cell(row, id_col)),
                date: date.value(),
                time: parse_time(cell(row, time_col)),
                vendor: parse_text(cell(row, vendor_col)),
                amount: amount.value(),
                account: parse_text(cell(row, account_col)),
                employee_id: parse_text(cell(row, employee_col)),
                invoice_number: parse_text(cell(row, invoice_col)),
                description: parse_text(cell(row, desc_col)),
            }
        })
        .collect();

    if bad_dates > 0 {
        warn!(count = bad_dates, "dates missing or unparseable, treated as unknown");
    }
    if bad_amounts > 0 {
        warn!(count = bad_amounts, "amounts missing or unparseable, treated as 0.00");
    }
    info!(rows = rows.len(), "normalized transaction table");
    Ok(rows)
}

/// Render normalized transactions back into a raw table with canonical headers.
pub fn to_raw(transactions: &[Transaction]) -> RawTable {
    let mut table = RawTable::new(CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect());
    for t in transactions {
        table.push_row(vec![
            RawValue::text(t.transaction_id.clone()),
            t.date.map_or(RawValue::Empty, RawValue::Date),
            RawValue::text(t.time.clone()),
            RawValue::text(t.vendor.clone()),
            RawValue::Number(t.amount),
            RawValue::text(t.account.clone()),
            RawValue::text(t.employee_id.clone()),
            RawValue::text(t.invoice_number.clone()),
            RawValue::text(t.description.clone()),
        ]);
    }
    table
}
