use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{SplitInvoiceGroup, Transaction};
use crate::settings::DetectionConfig;

/// Vendor/day groups containing many small invoices, a sign that one
/// obligation was split to stay under an approval limit.
///
/// Records with an unknown date never form a group. Count and total cover
/// every record in a retained group, not just the small ones.
pub fn detect_split_invoices(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<SplitInvoiceGroup> {
    let mut groups: BTreeMap<(&str, NaiveDate), Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        if let Some(date) = t.date {
            groups.entry((t.vendor.as_str(), date)).or_default().push(t);
        }
    }

    let mut result: Vec<SplitInvoiceGroup> = groups
        .into_iter()
        .filter(|(_, members)| {
            let small = members
                .iter()
                .filter(|t| t.amount <= config.small_amount)
                .count();
            small >= config.same_day_count
        })
        .map(|((vendor, date_only), members)| SplitInvoiceGroup {
            vendor: vendor.to_string(),
            date_only,
            count: members.len(),
            total_amount: members.iter().map(|t| t.amount).sum(),
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(vendor: &str, day: Option<u32>, amount: f64) -> Transaction {
        Transaction {
            vendor: vendor.to_string(),
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2025, 3, d)),
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_flags_many_small_invoices_same_day() {
        let mut rows: Vec<_> = (0..4).map(|_| txn("Acme", Some(3), 150.0)).collect();
        rows.push(txn("Acme", Some(3), 5000.0));
        rows.push(txn("Acme", Some(4), 150.0));
        let result = detect_split_invoices(&rows, &DetectionConfig::default());
        assert_eq!(result.len(), 1);
        let g = &result[0];
        assert_eq!(g.vendor, "Acme");
        assert_eq!(g.date_only, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        // Totals include the large invoice in the same group.
        assert_eq!(g.count, 5);
        assert_eq!(g.total_amount, 5600.0);
    }

    #[test]
    fn test_amount_ceiling_is_inclusive() {
        let rows: Vec<_> = (0..4).map(|_| txn("Acme", Some(3), 200.0)).collect();
        assert_eq!(detect_split_invoices(&rows, &DetectionConfig::default()).len(), 1);

        let rows: Vec<_> = (0..4).map(|_| txn("Acme", Some(3), 200.01)).collect();
        assert!(detect_split_invoices(&rows, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_below_count_threshold() {
        let rows: Vec<_> = (0..3).map(|_| txn("Acme", Some(3), 10.0)).collect();
        assert!(detect_split_invoices(&rows, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_null_dates_never_group() {
        let rows: Vec<_> = (0..10).map(|_| txn("Acme", None, 10.0)).collect();
        assert!(detect_split_invoices(&rows, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let mut rows: Vec<_> = (0..4).map(|_| txn("Alpha", Some(1), 10.0)).collect();
        rows.extend((0..6).map(|_| txn("Beta", Some(1), 10.0)));
        let config = DetectionConfig::default();
        let vendors: Vec<_> = detect_split_invoices(&rows, &config)
            .into_iter()
            .map(|g| g.vendor)
            .collect();
        assert_eq!(vendors, vec!["Beta", "Alpha"]);
    }
}
