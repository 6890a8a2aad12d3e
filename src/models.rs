use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single cell as supplied by an ingestion source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }
}

/// Rectangular table with string-labelled columns. Rows shorter than the
/// header are treated as having empty trailing cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<RawValue>) {
        self.rows.push(row);
    }
}

/// Canonical transaction record produced by the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub vendor: String,
    pub amount: f64,
    pub account: String,
    pub employee_id: String,
    pub invoice_number: String,
    pub description: String,
}

impl Transaction {
    /// Date as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateInvoice {
    pub invoice_number: String,
    pub count: usize,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountSpike {
    pub transaction: Transaction,
    pub zscore: f64,
    pub account_mean: f64,
    pub account_std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingReason {
    Weekend,
    OffHours,
}

impl TimingReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekend => "Weekend",
            Self::OffHours => "Off-hours",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimingAnomaly {
    pub transaction: Transaction,
    pub reason: TimingReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeActivity {
    pub employee_id: String,
    pub count: usize,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitInvoiceGroup {
    pub vendor: String,
    pub date_only: NaiveDate,
    pub count: usize,
    pub total_amount: f64,
}

/// The six findings tables of one run, one per rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub duplicate_invoices: Vec<DuplicateInvoice>,
    pub amount_spikes: Vec<AmountSpike>,
    pub timing_anomalies: Vec<TimingAnomaly>,
    pub employee_anomalies: Vec<EmployeeActivity>,
    pub split_invoices: Vec<SplitInvoiceGroup>,
    pub threshold_amounts: Vec<Transaction>,
}

impl Findings {
    pub fn total(&self) -> usize {
        self.duplicate_invoices.len()
            + self.amount_spikes.len()
            + self.timing_anomalies.len()
            + self.employee_anomalies.len()
            + self.split_invoices.len()
            + self.threshold_amounts.len()
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    DuplicateInvoice,
    AmountSpike,
    TimingAnomaly,
    EmployeePattern,
    ManySmallInvoices,
    ThresholdAmount,
}

impl AlertKind {
    /// Fixed concatenation order used to break score ties.
    pub const ALL: [AlertKind; 6] = [
        AlertKind::DuplicateInvoice,
        AlertKind::AmountSpike,
        AlertKind::TimingAnomaly,
        AlertKind::EmployeePattern,
        AlertKind::ManySmallInvoices,
        AlertKind::ThresholdAmount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DuplicateInvoice => "DuplicateInvoice",
            Self::AmountSpike => "AmountSpike",
            Self::TimingAnomaly => "TimingAnomaly",
            Self::EmployeePattern => "EmployeePattern",
            Self::ManySmallInvoices => "ManySmallInvoices",
            Self::ThresholdAmount => "ThresholdAmount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(rename = "Type")]
    pub kind: AlertKind,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Score")]
    pub score: f64,
}
