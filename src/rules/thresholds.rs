use crate::models::Transaction;
use crate::settings::DetectionConfig;

/// Records whose amount exactly equals one of the configured round values.
pub fn detect_threshold_amounts(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| config.threshold_amounts.contains(&t.amount))
        .cloned()
        .collect()
}
