use chrono::{Datelike, Weekday};

use crate::models::{TimingAnomaly, TimingReason, Transaction};
use crate::settings::DetectionConfig;

/// Leading hour of an `HH:MM[...]` string. `None` when the value is empty,
/// has no `:` separator, or the hour segment is not an integer.
pub fn leading_hour(time: &str) -> Option<i64> {
    if time.is_empty() || !time.contains(':') {
        return None;
    }
    time.split(':').next()?.trim().parse().ok()
}

fn is_weekend(t: &Transaction) -> bool {
    t.date
        .is_some_and(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Weekend takes priority over off-hours, so a record is classified at most once.
pub fn classify(t: &Transaction, config: &DetectionConfig) -> Option<TimingReason> {
    if is_weekend(t) {
        return Some(TimingReason::Weekend);
    }
    let hour = leading_hour(&t.time)?;
    (hour < config.business_start_hour || hour > config.business_end_hour)
        .then_some(TimingReason::OffHours)
}

/// Weekend and off-hours records, in input order. Each input row yields at
/// most one finding, so rows sharing a TransactionID are kept apart.
pub fn detect_timing_anomalies(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<TimingAnomaly> {
    transactions
        .iter()
        .filter_map(|t| {
            classify(t, config).map(|reason| TimingAnomaly {
                transaction: t.clone(),
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2025-01-18 is a Saturday, 2025-01-15 a Wednesday.
    fn txn(id: &str, date: Option<(i32, u32, u32)>, time: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            time: time.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_leading_hour() {
        assert_eq!(leading_hour("23:00"), Some(23));
        assert_eq!(leading_hour("7:15:02"), Some(7));
        assert_eq!(leading_hour(" 09:30"), Some(9));
        assert_eq!(leading_hour(""), None);
        assert_eq!(leading_hour("2300"), None);
        assert_eq!(leading_hour("ab:cd"), None);
        assert_eq!(leading_hour(":30"), None);
    }

    #[test]
    fn test_weekend_wins_over_off_hours() {
        let rows = vec![txn("T1", Some((2025, 1, 18)), "23:00")];
        let hits = detect_timing_anomalies(&rows, &DetectionConfig::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reason, TimingReason::Weekend);
        assert_eq!(hits[0].reason.label(), "Weekend");
    }

    #[test]
    fn test_off_hours_boundaries() {
        let config = DetectionConfig::default();
        let weekday = Some((2025, 1, 15));
        assert_eq!(classify(&txn("a", weekday, "05:59"), &config), Some(TimingReason::OffHours));
        assert_eq!(classify(&txn("b", weekday, "06:00"), &config), None);
        assert_eq!(classify(&txn("c", weekday, "20:59"), &config), None);
        assert_eq!(classify(&txn("d", weekday, "21:00"), &config), Some(TimingReason::OffHours));
    }

    #[test]
    fn test_null_date_still_checks_time() {
        let config = DetectionConfig::default();
        assert_eq!(classify(&txn("a", None, "02:00"), &config), Some(TimingReason::OffHours));
        assert_eq!(classify(&txn("b", None, "12:00"), &config), None);
        assert_eq!(classify(&txn("c", None, ""), &config), None);
    }

    #[test]
    fn test_malformed_times_are_skipped() {
        let rows = vec![
            txn("a", Some((2025, 1, 15)), "late"),
            txn("b", Some((2025, 1, 15)), "xx:00"),
            txn("c", Some((2025, 1, 15)), ""),
        ];
        assert!(detect_timing_anomalies(&rows, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_rows_with_shared_ids_are_kept() {
        let rows = vec![
            txn("", Some((2025, 1, 18)), "10:00"),
            txn("", Some((2025, 1, 15)), "03:00"),
            txn("", Some((2025, 1, 15)), "12:00"),
        ];
        let hits = detect_timing_anomalies(&rows, &DetectionConfig::default());
        let reasons: Vec<_> = hits.iter().map(|h| h.reason).collect();
        assert_eq!(reasons, vec![TimingReason::Weekend, TimingReason::OffHours]);
    }
}
