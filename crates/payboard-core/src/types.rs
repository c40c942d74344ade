//! Basic enumerations used by transactions and filters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    /// Any status the backend reports that this dashboard does not know
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Statuses a user can filter by
    pub const FILTERABLE: [TransactionStatus; 4] = [
        TransactionStatus::Completed,
        TransactionStatus::Failed,
        TransactionStatus::Pending,
        TransactionStatus::Refunded,
    ];
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Unknown
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "refunded" => Ok(TransactionStatus::Refunded),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Refunded => write!(f, "refunded"),
            TransactionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Payment method. The set is open: unrecognised methods are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    Crypto,
    Other(String),
}

impl PaymentMethod {
    /// Wire name, e.g. "credit_card"
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Crypto => "crypto",
            PaymentMethod::Other(name) => name,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "credit_card" => PaymentMethod::CreditCard,
            "paypal" => PaymentMethod::Paypal,
            "bank_transfer" => PaymentMethod::BankTransfer,
            "crypto" => PaymentMethod::Crypto,
            _ => PaymentMethod::Other(value),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.as_str().to_string()
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Payment method cannot be empty".to_string());
        }
        Ok(PaymentMethod::from(s.to_string()))
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Either "all" or one specific value.
///
/// Serialized as the string "all" or the value's own representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    /// Whether `value` passes the filter. An absent value only passes `All`.
    pub fn admits(&self, value: Option<&T>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(expected) => value == Some(expected),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl<T: std::str::FromStr<Err = String>> std::str::FromStr for Filter<T> {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<T: std::fmt::Display> Serialize for Filter<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: std::str::FromStr<Err = String>> Deserialize<'de> for Filter<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Amount buckets offered by the filter menu. Each is half-open: `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountRange {
    /// [0, 50)
    UnderFifty,
    /// [50, 100)
    FiftyToHundred,
    /// [100, 500)
    HundredToFiveHundred,
    /// [500, ∞)
    FiveHundredPlus,
}

impl AmountRange {
    pub const ALL: [AmountRange; 4] = [
        AmountRange::UnderFifty,
        AmountRange::FiftyToHundred,
        AmountRange::HundredToFiveHundred,
        AmountRange::FiveHundredPlus,
    ];

    /// Lower (inclusive) and upper (exclusive) bounds
    pub fn bounds(&self) -> (Decimal, Option<Decimal>) {
        match self {
            AmountRange::UnderFifty => (Decimal::ZERO, Some(Decimal::from(50))),
            AmountRange::FiftyToHundred => (Decimal::from(50), Some(Decimal::from(100))),
            AmountRange::HundredToFiveHundred => (Decimal::from(100), Some(Decimal::from(500))),
            AmountRange::FiveHundredPlus => (Decimal::from(500), None),
        }
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        let (lower, upper) = self.bounds();
        amount >= lower && upper.map_or(true, |upper| amount < upper)
    }
}

impl std::str::FromStr for AmountRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-50" => Ok(AmountRange::UnderFifty),
            "50-100" => Ok(AmountRange::FiftyToHundred),
            "100-500" => Ok(AmountRange::HundredToFiveHundred),
            "500+" => Ok(AmountRange::FiveHundredPlus),
            _ => Err(format!("Invalid amount range: {}", s)),
        }
    }
}

impl std::fmt::Display for AmountRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountRange::UnderFifty => write!(f, "0-50"),
            AmountRange::FiftyToHundred => write!(f, "50-100"),
            AmountRange::HundredToFiveHundred => write!(f, "100-500"),
            AmountRange::FiveHundredPlus => write!(f, "500+"),
        }
    }
}
