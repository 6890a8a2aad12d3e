use crate::models::{
    Alert, AlertKind, AmountSpike, DuplicateInvoice, EmployeeActivity, Findings,
    SplitInvoiceGroup, TimingAnomaly, Transaction,
};

// ---------------------------------------------------------------------------
// Per-finding conversion
// ---------------------------------------------------------------------------

/// The size bonus is continuous (`total / 1000`, capped at 20), not whole thousands.
fn duplicate_alert(d: &DuplicateInvoice) -> Alert {
    Alert {
        kind: AlertKind::DuplicateInvoice,
        key: d.invoice_number.clone(),
        message: format!(
            "Invoice {} appears {} times, total {:.2}",
            d.invoice_number, d.count, d.total_amount
        ),
        score: 80.0 + (d.total_amount / 1000.0).min(20.0),
    }
}

fn spike_alert(s: &AmountSpike) -> Alert {
    let t = &s.transaction;
    Alert {
        kind: AlertKind::AmountSpike,
        key: t.transaction_id.clone(),
        message: format!(
            "Transaction {} amount {:.2} (z={:.2}) in account {}",
            t.transaction_id, t.amount, s.zscore, t.account
        ),
        score: 70.0 + (s.zscore.abs() * 5.0).min(30.0),
    }
}

fn timing_alert(a: &TimingAnomaly) -> Alert {
    let t = &a.transaction;
    Alert {
        kind: AlertKind::TimingAnomaly,
        key: t.transaction_id.clone(),
        message: format!(
            "Transaction {} on {} at {} ({})",
            t.transaction_id,
            t.date_label(),
            t.time,
            a.reason.label()
        ),
        score: 50.0,
    }
}

fn employee_alert(e: &EmployeeActivity) -> Alert {
    Alert {
        kind: AlertKind::EmployeePattern,
        key: e.employee_id.clone(),
        message: format!(
            "Employee {} made {} transactions, total {:.2}",
            e.employee_id, e.count, e.total_amount
        ),
        score: 60.0 + (e.count as f64).min(40.0),
    }
}

fn split_alert(g: &SplitInvoiceGroup) -> Alert {
    let day = g.date_only.format("%Y-%m-%d");
    Alert {
        kind: AlertKind::ManySmallInvoices,
        key: format!("{}|{day}", g.vendor),
        message: format!(
            "Vendor {} issued {} invoices on {day} including many small ones, total {:.2}",
            g.vendor, g.count, g.total_amount
        ),
        score: 65.0,
    }
}

fn threshold_alert(t: &Transaction) -> Alert {
    Alert {
        kind: AlertKind::ThresholdAmount,
        key: t.transaction_id.clone(),
        message: format!(
            "Transaction {} at threshold amount {:.2}",
            t.transaction_id, t.amount
        ),
        score: 55.0,
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Merge all findings into one alert list ordered by score, highest first.
///
/// Alerts are concatenated in `AlertKind::ALL` order before a stable sort, so
/// equal scores keep that rule order and each rule's own ordering.
pub fn score_alerts(findings: &Findings) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::with_capacity(findings.total());
    alerts.extend(findings.duplicate_invoices.iter().map(duplicate_alert));
    alerts.extend(findings.amount_spikes.iter().map(spike_alert));
    alerts.extend(findings.timing_anomalies.iter().map(timing_alert));
    alerts.extend(findings.employee_anomalies.iter().map(employee_alert));
    alerts.extend(findings.split_invoices.iter().map(split_alert));
    alerts.extend(findings.threshold_amounts.iter().map(threshold_alert));
    alerts.sort_by(|a, b| b.score.total_cmp(&a.score));
    alerts
}
