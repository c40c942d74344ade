//! Search and filter predicates for the transactions table

use serde::{Deserialize, Serialize};

use crate::models::Transaction;
use crate::types::{AmountRange, Filter, PaymentMethod, TransactionStatus};

/// Everything the user can narrow the table by
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Free text matched against customer name and id
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub status_filter: Filter<TransactionStatus>,
    #[serde(default)]
    pub payment_method_filter: Filter<PaymentMethod>,
    #[serde(default)]
    pub amount_range_filter: Filter<AmountRange>,
}

impl FilterCriteria {
    /// True when no predicate narrows the source
    pub fn is_unfiltered(&self) -> bool {
        self.search_query.trim().is_empty()
            && self.status_filter.is_all()
            && self.payment_method_filter.is_all()
            && self.amount_range_filter.is_all()
    }

    /// Whether `tx` satisfies every predicate.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_search(tx)
            && self.status_filter.admits(Some(&tx.status))
            && self.payment_method_filter.admits(tx.payment_method.as_ref())
            && self.matches_amount(tx)
    }

    /// Case-insensitive substring match of the trimmed query against the
    /// customer name or the id. A blank query matches everything.
    pub fn matches_search(&self, tx: &Transaction) -> bool {
        let query = self.search_query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        tx.id.to_lowercase().contains(&query)
            || tx
                .customer_name
                .as_deref()
                .map_or(false, |name| name.to_lowercase().contains(&query))
    }

    fn matches_amount(&self, tx: &Transaction) -> bool {
        match &self.amount_range_filter {
            Filter::All => true,
            Filter::Only(range) => tx.amount.map_or(false, |amount| range.contains(amount)),
        }
    }
}

/// Stable filter: the result keeps source order and the source is untouched.
pub fn apply_filters<'a>(source: &'a [Transaction], criteria: &FilterCriteria) -> Vec<&'a Transaction> {
    if criteria.is_unfiltered() {
        return source.iter().collect();
    }
    source.iter().filter(|tx| criteria.matches(tx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn tx(id: &str, name: Option<&str>, amount: &str, method: PaymentMethod, status: TransactionStatus) -> Transaction {
        let mut tx = Transaction::new(id, status)
            .with_amount(Decimal::from_str(amount).unwrap())
            .with_payment_method(method);
        tx.customer_name = name.map(str::to_string);
        tx
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("A-100", Some("Ada Lovelace"), "49.99", PaymentMethod::CreditCard, TransactionStatus::Completed),
            tx("B-200", Some("Grace Hopper"), "50", PaymentMethod::Paypal, TransactionStatus::Pending),
            tx("C-300", None, "99.99", PaymentMethod::BankTransfer, TransactionStatus::Failed),
            tx("D-400", Some("Alan Turing"), "100", PaymentMethod::Crypto, TransactionStatus::Completed),
            tx("E-500", Some("Barbara Liskov"), "750", PaymentMethod::CreditCard, TransactionStatus::Refunded),
        ]
    }

    fn ids(result: &[&Transaction]) -> Vec<String> {
        result.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_default_criteria_returns_everything_in_order() {
        let source = sample();
        let result = apply_filters(&source, &FilterCriteria::default());
        assert_eq!(ids(&result), vec!["A-100", "B-200", "C-300", "D-400", "E-500"]);
    }

    #[test]
    fn test_search_matches_name_and_id_case_insensitively() {
        let source = sample();
        let criteria = FilterCriteria { search_query: "  GRACE ".to_string(), ..Default::default() };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["B-200"]);

        let criteria = FilterCriteria { search_query: "c-3".to_string(), ..Default::default() };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["C-300"]);
    }

    #[test]
    fn test_search_skips_missing_customer_name() {
        let source = sample();
        let criteria = FilterCriteria { search_query: "n/a".to_string(), ..Default::default() };
        assert!(apply_filters(&source, &criteria).is_empty());
    }

    #[test]
    fn test_amount_range_is_half_open() {
        let source = vec![
            tx("1", None, "49.99", PaymentMethod::Paypal, TransactionStatus::Pending),
            tx("2", None, "50", PaymentMethod::Paypal, TransactionStatus::Pending),
            tx("3", None, "99.99", PaymentMethod::Paypal, TransactionStatus::Pending),
            tx("4", None, "100", PaymentMethod::Paypal, TransactionStatus::Pending),
        ];
        let criteria = FilterCriteria {
            amount_range_filter: "50-100".parse().unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["2", "3"]);
    }

    #[test]
    fn test_missing_amount_never_matches_a_range() {
        let source = vec![Transaction::new("x", TransactionStatus::Pending)];
        let criteria = FilterCriteria {
            amount_range_filter: Filter::Only(AmountRange::UnderFifty),
            ..Default::default()
        };
        assert!(apply_filters(&source, &criteria).is_empty());

        // but it still lists when the amount filter is off
        assert_eq!(apply_filters(&source, &FilterCriteria::default()).len(), 1);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let source = sample();
        let criteria = FilterCriteria {
            search_query: "a".to_string(),
            status_filter: Filter::Only(TransactionStatus::Completed),
            payment_method_filter: Filter::Only(PaymentMethod::CreditCard),
            amount_range_filter: Filter::All,
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["A-100"]);
    }

    #[test]
    fn test_result_is_ordered_subset_and_idempotent() {
        let source = sample();
        let criteria = FilterCriteria {
            status_filter: Filter::Only(TransactionStatus::Completed),
            ..Default::default()
        };
        let first = apply_filters(&source, &criteria);
        let second = apply_filters(&source, &criteria);
        assert_eq!(first, second);

        let positions: Vec<usize> = first
            .iter()
            .map(|t| source.iter().position(|s| s.id == t.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn test_unknown_status_only_passes_all() {
        let source = vec![Transaction::new("u", TransactionStatus::Unknown)];
        for status in TransactionStatus::FILTERABLE {
            let criteria = FilterCriteria { status_filter: Filter::Only(status), ..Default::default() };
            assert!(apply_filters(&source, &criteria).is_empty());
        }
    }

    #[test]
    fn test_criteria_deserialize_from_camel_case() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{"searchQuery":"ada","statusFilter":"completed","paymentMethodFilter":"all","amountRangeFilter":"0-50"}"#,
        )
        .unwrap();
        assert_eq!(criteria.status_filter, Filter::Only(TransactionStatus::Completed));
        assert_eq!(criteria.amount_range_filter, Filter::Only(AmountRange::UnderFifty));
        assert!(criteria.payment_method_filter.is_all());
    }
}
