//! Utility functions and helpers

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Format a decimal string with thousands separators.
///
/// Accepts an optional leading sign and a fractional part, which is kept
/// as-is: "-1234567.5" becomes "-1,234,567.5".
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (count, c) in int_part.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, int_grouped, frac),
        None => format!("{}{}", sign, int_grouped),
    }
}

/// Turn a snake_case identifier into display words ("bank_transfer" -> "bank transfer")
pub fn humanize_identifier(identifier: &str) -> String {
    identifier.replace('_', " ")
}

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a request id for error reports: "<millis>-<sequence>"
pub fn generate_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = REQUEST_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", millis, seq)
}
