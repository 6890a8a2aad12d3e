use tracing::info;

use crate::error::Result;
use crate::models::{Alert, Findings, RawTable, Transaction};
use crate::normalizer::normalize;
use crate::rules;
use crate::scorer::score_alerts;
use crate::settings::DetectionConfig;

pub struct Analysis {
    pub transactions: Vec<Transaction>,
    pub findings: Findings,
    pub alerts: Vec<Alert>,
}

/// Normalize, run every rule, then score. Only normalization can fail.
pub fn analyze(table: &RawTable, config: &DetectionConfig) -> Result<Analysis> {
    let transactions = normalize(table)?;
    let findings = rules::run_all(&transactions, config);
    let alerts = score_alerts(&findings);
    info!(
        transactions = transactions.len(),
        findings = findings.total(),
        alerts = alerts.len(),
        "analysis complete"
    );
    Ok(Analysis {
        transactions,
        findings,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedflagError;
    use crate::models::{AlertKind, RawValue};

    fn sample_table() -> RawTable {
        let mut table = RawTable::new(
            ["TransactionID", "Date", "Time", "Vendor", "Amount", "Account", "EmployeeID", "InvoiceNumber"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        let mut push = |cells: [&str; 8]| {
            table.push_row(cells.iter().map(|c| RawValue::text(*c)).collect());
        };
        // Weekday business-hours baseline for account OPS.
        for i in 0..20 {
            let id = format!("B{i:02}");
            let inv = format!("INV-B{i:02}");
            push([id.as_str(), "2025-01-15", "10:00", "Paper Co", "120.00", "OPS", "E1", inv.as_str()]);
        }
        push(["S1", "2025-01-15", "11:00", "Paper Co", "25000.00", "OPS", "E2", "INV-S1"]);
        push(["D1", "2025-01-16", "09:00", "Widgets", "1500.00", "AP", "E3", "INV-77"]);
        push(["D2", "2025-01-16", "09:05", "Widgets", "1500.00", "AP", "E3", "INV-77"]);
        push(["W1", "2025-01-18", "12:00", "Cafe", "40.00", "AP", "E3", ""]);
        push(["N1", "2025-01-16", "02:30", "Cafe", "9999", "AP", "E4", ""]);
        push(["X1", "garbage", "noon", "Cafe", "n/a", "AP", "E4", ""]);
        table
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let analysis = analyze(&sample_table(), &DetectionConfig::default()).unwrap();
        assert_eq!(analysis.transactions.len(), 26);

        let f = &analysis.findings;
        assert_eq!(f.duplicate_invoices.len(), 1);
        assert_eq!(f.duplicate_invoices[0].invoice_number, "INV-77");
        assert_eq!(f.amount_spikes.len(), 1);
        assert_eq!(f.amount_spikes[0].transaction.transaction_id, "S1");
        let timing: Vec<_> = f
            .timing_anomalies
            .iter()
            .map(|t| (t.transaction.transaction_id.as_str(), t.reason.label()))
            .collect();
        assert_eq!(timing, vec![("W1", "Weekend"), ("N1", "Off-hours")]);
        assert_eq!(f.threshold_amounts.len(), 1);
        assert_eq!(f.threshold_amounts[0].transaction_id, "N1");
        assert_eq!(f.split_invoices.len(), 1);
        assert_eq!(f.split_invoices[0].vendor, "Paper Co");
        assert_eq!(f.split_invoices[0].count, 21);
        // E1 by count, E2 by total (25000 >= 2 x mean of 10109.75)
        let employees: Vec<_> = f.employee_anomalies.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(employees, vec!["E1", "E2"]);

        let alerts = &analysis.alerts;
        assert_eq!(alerts.len(), f.total());
        assert!(alerts.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(alerts[0].kind, AlertKind::AmountSpike);
        assert_eq!(alerts.last().unwrap().kind, AlertKind::TimingAnomaly);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let table = sample_table();
        let config = DetectionConfig::default();
        let first = analyze(&table, &config).unwrap();
        let second = analyze(&table, &config).unwrap();
        assert_eq!(first.findings, second.findings);
        assert_eq!(first.alerts, second.alerts);
    }

    #[test]
    fn test_validation_failure_stops_pipeline() {
        let table = RawTable::new(vec!["Vendor".to_string(), "Amount".to_string()]);
        let err = analyze(&table, &DetectionConfig::default()).err().unwrap();
        assert!(matches!(err, RedflagError::Validation(_)));
    }
}
