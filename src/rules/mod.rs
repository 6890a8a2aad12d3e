//! Independent fraud heuristics. Every rule reads the normalized table and
//! returns its own findings; none observes another rule's output.

pub mod duplicates;
pub mod employees;
pub mod spikes;
pub mod splitting;
pub mod thresholds;
pub mod timing;

use tracing::debug;

use crate::models::{Findings, Transaction};
use crate::settings::DetectionConfig;

pub use duplicates::detect_duplicate_invoices;
pub use employees::detect_employee_anomalies;
pub use spikes::detect_amount_spikes;
pub use splitting::detect_split_invoices;
pub use thresholds::detect_threshold_amounts;
pub use timing::detect_timing_anomalies;

/// Run all six rules over the same table.
pub fn run_all(transactions: &[Transaction], config: &DetectionConfig) -> Findings {
    let findings = Findings {
        duplicate_invoices: detect_duplicate_invoices(transactions),
        amount_spikes: detect_amount_spikes(transactions, config),
        timing_anomalies: detect_timing_anomalies(transactions, config),
        employee_anomalies: detect_employee_anomalies(transactions, config),
        split_invoices: detect_split_invoices(transactions, config),
        threshold_amounts: detect_threshold_amounts(transactions, config),
    };
    debug!(
        duplicate_invoices = findings.duplicate_invoices.len(),
        amount_spikes = findings.amount_spikes.len(),
        timing_anomalies = findings.timing_anomalies.len(),
        employee_anomalies = findings.employee_anomalies.len(),
        split_invoices = findings.split_invoices.len(),
        threshold_amounts = findings.threshold_amounts.len(),
        "rules evaluated"
    );
    findings
}
