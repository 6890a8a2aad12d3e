use std::collections::BTreeMap;

use crate::models::{EmployeeActivity, Transaction};
use crate::settings::DetectionConfig;

/// Employees with many transactions, or whose total is a multiple of the
/// average employee total. Sorted by count, then total, both descending.
pub fn detect_employee_anomalies(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<EmployeeActivity> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for t in transactions {
        let entry = groups.entry(t.employee_id.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += t.amount;
    }
    if groups.is_empty() {
        return Vec::new();
    }

    let mean_total = groups.values().map(|(_, total)| total).sum::<f64>() / groups.len() as f64;
    let total_cutoff = mean_total * config.employee_total_multiplier;

    let mut suspects: Vec<EmployeeActivity> = groups
        .into_iter()
        .filter(|(_, (count, total))| {
            *count >= config.employee_min_transactions || *total >= total_cutoff
        })
        .map(|(employee, (count, total))| EmployeeActivity {
            employee_id: employee.to_string(),
            count,
            total_amount: total,
        })
        .collect();
    suspects.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.total_amount.total_cmp(&a.total_amount))
    });
    suspects
}
