use std::collections::BTreeMap;

use crate::models::{AmountSpike, Transaction};
use crate::settings::DetectionConfig;

/// Returns `(mean, population standard deviation)`; `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Per-account z-score outliers.
///
/// Accounts with fewer than `min_account_size` records or with no variance are
/// skipped. Accounts are visited in key order and records keep input order.
pub fn detect_amount_spikes(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<AmountSpike> {
    let mut accounts: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        accounts.entry(t.account.as_str()).or_default().push(t);
    }

    let mut spikes = Vec::new();
    for members in accounts.into_values() {
        if members.len() < config.min_account_size {
            continue;
        }
        let amounts: Vec<f64> = members.iter().map(|t| t.amount).collect();
        let Some((mean, std)) = mean_and_std(&amounts) else {
            continue;
        };
        if std == 0.0 {
            continue;
        }
        for t in members {
            let zscore = (t.amount - mean) / std;
            if zscore.abs() >= config.z_threshold {
                spikes.push(AmountSpike {
                    transaction: t.clone(),
                    zscore,
                    account_mean: mean,
                    account_std: std,
                });
            }
        }
    }
    spikes
}
