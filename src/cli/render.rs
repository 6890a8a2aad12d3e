use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::analyzer::Analysis;
use crate::error::{RedflagError, Result};
use crate::fmt::{money, score};
use crate::models::{Alert, AlertKind, Findings, RawTable};
use crate::normalizer::parse_text;

const ALERT_COLUMNS: [&str; 4] = ["Type", "Key", "Message", "Score"];

// ---------------------------------------------------------------------------
// Machine-readable output
// ---------------------------------------------------------------------------

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| RedflagError::Other(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| RedflagError::Other(e.to_string()))
}

pub fn alerts_csv(alerts: &[Alert]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if alerts.is_empty() {
        wtr.write_record(ALERT_COLUMNS)?;
    }
    for alert in alerts {
        wtr.serialize(alert)?;
    }
    finish_csv(wtr)
}

pub fn alerts_json(alerts: &[Alert]) -> Result<String> {
    Ok(serde_json::to_string_pretty(alerts)?)
}

pub fn table_csv(table: &RawTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(parse_text))?;
    }
    finish_csv(wtr)
}

// ---------------------------------------------------------------------------
// Terminal report
// ---------------------------------------------------------------------------

fn score_cell(val: f64) -> Cell {
    let s = score(val);
    if val >= 80.0 {
        Cell::new(s.red().bold())
    } else if val >= 60.0 {
        Cell::new(s.yellow())
    } else {
        Cell::new(s)
    }
}

pub fn format_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Score", "Type", "Key", "Message"]);
    for a in alerts {
        table.add_row(vec![
            score_cell(a.score),
            Cell::new(a.kind.name()),
            Cell::new(&a.key),
            Cell::new(&a.message),
        ]);
    }
    format!("Alerts ({})\n{table}", alerts.len())
}

pub fn format_summary(alerts: &[Alert]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Alerts"]);
    for kind in AlertKind::ALL {
        let n = alerts.iter().filter(|a| a.kind == kind).count();
        table.add_row(vec![Cell::new(kind.name()), Cell::new(n)]);
    }
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(alerts.len())]);
    format!("Summary\n{table}")
}

pub fn format_findings(f: &Findings) -> String {
    let mut sections = Vec::new();

    if !f.duplicate_invoices.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Invoice", "Count", "Total"]);
        for d in &f.duplicate_invoices {
            table.add_row(vec![
                Cell::new(&d.invoice_number),
                Cell::new(d.count),
                Cell::new(money(d.total_amount)),
            ]);
        }
        sections.push(format!("Duplicate Invoices\n{table}"));
    }

    if !f.amount_spikes.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Transaction", "Account", "Amount", "Z", "Mean", "Std"]);
        for s in &f.amount_spikes {
            table.add_row(vec![
                Cell::new(&s.transaction.transaction_id),
                Cell::new(&s.transaction.account),
                Cell::new(money(s.transaction.amount)),
                Cell::new(format!("{:.2}", s.zscore)),
                Cell::new(money(s.account_mean)),
                Cell::new(money(s.account_std)),
            ]);
        }
        sections.push(format!("Amount Spikes\n{table}"));
    }

    if !f.timing_anomalies.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Transaction", "Date", "Time", "Reason"]);
        for t in &f.timing_anomalies {
            table.add_row(vec![
                Cell::new(&t.transaction.transaction_id),
                Cell::new(t.transaction.date_label()),
                Cell::new(&t.transaction.time),
                Cell::new(t.reason.label()),
            ]);
        }
        sections.push(format!("Weekend / Off-hours\n{table}"));
    }

    if !f.employee_anomalies.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Employee", "Count", "Total"]);
        for e in &f.employee_anomalies {
            table.add_row(vec![
                Cell::new(&e.employee_id),
                Cell::new(e.count),
                Cell::new(money(e.total_amount)),
            ]);
        }
        sections.push(format!("Employee Activity\n{table}"));
    }

    if !f.split_invoices.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Vendor", "Date", "Count", "Total"]);
        for g in &f.split_invoices {
            table.add_row(vec![
                Cell::new(&g.vendor),
                Cell::new(g.date_only.format("%Y-%m-%d")),
                Cell::new(g.count),
                Cell::new(money(g.total_amount)),
            ]);
        }
        sections.push(format!("Possible Invoice Splitting\n{table}"));
    }

    if !f.threshold_amounts.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Transaction", "Date", "Vendor", "Amount"]);
        for t in &f.threshold_amounts {
            table.add_row(vec![
                Cell::new(&t.transaction_id),
                Cell::new(t.date_label()),
                Cell::new(&t.vendor),
                Cell::new(money(t.amount)),
            ]);
        }
        sections.push(format!("Threshold Amounts\n{table}"));
    }

    if sections.is_empty() {
        return "No findings.".to_string();
    }
    sections.join("\n\n")
}

/// Full terminal report: header, alerts, summary and optionally per-rule findings.
pub fn report(source: &str, checksum: &str, analysis: &Analysis, details: bool) -> String {
    let mut out = format!(
        "{}\nSource: {source} (sha256 {})\nTransactions: {}\n\n",
        "Fraud Screening Report".bold(),
        &checksum[..checksum.len().min(12)],
        analysis.transactions.len()
    );
    out.push_str(&format_alerts(&analysis.alerts));
    out.push_str("\n\n");
    out.push_str(&format_summary(&analysis.alerts));
    if details {
        out.push_str("\n\n");
        out.push_str(&format_findings(&analysis.findings));
    }
    out
}
