//! Data models exchanged with the backend

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::types::{PaymentMethod, TransactionStatus};

/// A payment transaction as reported by the backend.
///
/// Fields other than `id` are optional on the wire; a missing or malformed
/// value is kept as `None` so that the record still lists and simply fails
/// the filters that look at that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Stable unique identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Customer display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_name: Option<String>,
    /// Monetary amount, currency implicit
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Decimal>,
    /// Timestamp as sent by the backend (RFC 3339 or YYYY-MM-DD)
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_payment_method")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TransactionStatus,
}

impl Transaction {
    /// Create a transaction with the required fields; the rest start empty
    pub fn new(id: impl Into<String>, status: TransactionStatus) -> Self {
        Self {
            id: id.into(),
            customer_name: None,
            amount: None,
            date: String::new(),
            payment_method: None,
            status,
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Parse the date field
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Customer name or "N/A"
    pub fn customer_display(&self) -> &str {
        self.customer_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("N/A")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid transaction id: {}", other))),
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    };
    Ok(parsed)
}

/// Strings pass through; null or any other JSON type reads as absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_payment_method<'de, D>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.and_then(|s| s.parse().ok()))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<TransactionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Authenticated session returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<Account>,
}

/// Account returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_deserialize_full_record() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":"tx-1","customerName":"Ada","amount":49.99,"date":"2024-03-05T10:00:00Z",
                "paymentMethod":"credit_card","status":"completed"}"#,
        )
        .unwrap();
        assert_eq!(tx.id, "tx-1");
        assert_eq!(tx.amount, Some(Decimal::from_str("49.99").unwrap()));
        assert_eq!(tx.payment_method, Some(PaymentMethod::CreditCard));
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.timestamp().unwrap().day(), 5);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let tx: Transaction = serde_json::from_str(r#"{"id":42,"amount":"oops","status":"on_hold"}"#).unwrap();
        assert_eq!(tx.id, "42");
        assert_eq!(tx.amount, None);
        assert_eq!(tx.customer_name, None);
        assert_eq!(tx.payment_method, None);
        assert_eq!(tx.status, TransactionStatus::Unknown);
        assert!(tx.timestamp().is_none());
        assert_eq!(tx.customer_display(), "N/A");
    }

    #[test]
    fn test_null_and_mistyped_fields_are_absent() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":"a","date":null,"status":null,"paymentMethod":7,"customerName":5,"amount":null}"#,
        )
        .unwrap();
        assert_eq!(tx.date, "");
        assert_eq!(tx.status, TransactionStatus::Unknown);
        assert_eq!(tx.payment_method, None);
        assert_eq!(tx.customer_name, None);
        assert_eq!(tx.amount, None);

        let tx: Transaction = serde_json::from_str(r#"{"id":"b","status":["pending"],"date":20240305}"#).unwrap();
        assert_eq!(tx.status, TransactionStatus::Unknown);
        assert!(tx.timestamp().is_none());
    }

    #[test]
    fn test_mixed_list_decodes_whole() {
        let txs: Vec<Transaction> = serde_json::from_str(
            r#"[{"id":"a","date":null,"status":"pending"},
                {"id":"b","date":"2024-03-05","status":"Completed","paymentMethod":"paypal"}]"#,
        )
        .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].status, TransactionStatus::Pending);
        assert_eq!(txs[1].status, TransactionStatus::Completed);
        assert_eq!(txs[1].payment_method, Some(PaymentMethod::Paypal));
    }

    #[test]
    fn test_amount_as_string() {
        let tx: Transaction = serde_json::from_str(r#"{"id":"a","amount":" 100.50 "}"#).unwrap();
        assert_eq!(tx.amount, Some(Decimal::from_str("100.50").unwrap()));
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(serde_json::from_str::<Transaction>(r#"{"id":""}"#).is_err());
    }

    #[test]
    fn test_date_only_timestamp() {
        let tx = Transaction::new("a", TransactionStatus::Pending).with_date("2024-12-31");
        let ts = tx.timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 12, 31));
    }
}
