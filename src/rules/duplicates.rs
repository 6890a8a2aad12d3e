use std::collections::BTreeMap;

use crate::models::{DuplicateInvoice, Transaction};

/// Invoice numbers that occur on more than one record, largest total first.
/// Records without an invoice number are ignored.
pub fn detect_duplicate_invoices(transactions: &[Transaction]) -> Vec<DuplicateInvoice> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for t in transactions.iter().filter(|t| !t.invoice_number.is_empty()) {
        let entry = groups.entry(t.invoice_number.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += t.amount;
    }

    let mut duplicates: Vec<DuplicateInvoice> = groups
        .into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(invoice, (count, total))| DuplicateInvoice {
            invoice_number: invoice.to_string(),
            count,
            total_amount: total,
        })
        .collect();
    duplicates.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(number: &str, amount: f64) -> Transaction {
        Transaction {
            invoice_number: number.to_string(),
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_summarizes_duplicated_invoice() {
        let rows = vec![
            invoice("INV1", 100.0),
            invoice("INV2", 50.0),
            invoice("INV1", 200.0),
            invoice("INV1", 300.0),
        ];
        let result = detect_duplicate_invoices(&rows);
        assert_eq!(
            result,
            vec![DuplicateInvoice {
                invoice_number: "INV1".to_string(),
                count: 3,
                total_amount: 600.0,
            }]
        );
    }

    #[test]
    fn test_sorted_by_total_descending() {
        let rows = vec![
            invoice("A", 10.0),
            invoice("A", 10.0),
            invoice("B", 500.0),
            invoice("B", 500.0),
            invoice("C", 100.0),
            invoice("C", 100.0),
        ];
        let keys: Vec<_> = detect_duplicate_invoices(&rows)
            .into_iter()
            .map(|d| d.invoice_number)
            .collect();
        assert_eq!(keys, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_empty_invoice_numbers_are_ignored() {
        let rows = vec![invoice("", 1.0), invoice("", 2.0), invoice("X", 3.0)];
        assert!(detect_duplicate_invoices(&rows).is_empty());
        assert!(detect_duplicate_invoices(&[]).is_empty());
    }
}
