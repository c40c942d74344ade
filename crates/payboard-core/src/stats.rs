//! Figures for the dashboard stat cards

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;
use crate::types::TransactionStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_count: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    pub refunded_count: usize,
    /// Sum of the amounts of completed transactions, saturating at `Decimal::MAX`
    pub completed_volume: Decimal,
}

pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    summarize_iter(transactions.iter())
}

fn summarize_iter<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> TransactionSummary {
    transactions.fold(TransactionSummary::default(), |mut summary, tx| {
        summary.total_count += 1;
        match tx.status {
            TransactionStatus::Pending => summary.pending_count += 1,
            TransactionStatus::Completed => {
                summary.completed_count += 1;
                summary.completed_volume = add_volume(summary.completed_volume, tx.amount.unwrap_or_default());
            }
            TransactionStatus::Failed => summary.failed_count += 1,
            TransactionStatus::Refunded => summary.refunded_count += 1,
            TransactionStatus::Unknown => {}
        }
        summary
    })
}

fn add_volume(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        log::warn!(target: "payboard::stats", "completed volume overflowed, capping at the maximum");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Period-over-period change for a stat card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Change {
    /// Percentage, one decimal
    pub percent: f64,
    pub positive: bool,
}

impl Change {
    pub fn is_positive(&self) -> bool {
        self.positive
    }
}

/// `(current - previous) / previous * 100`, or `None` when there is no previous value.
///
/// A negative `previous` flips the sign of the result. `None` is also returned
/// when the arithmetic leaves the decimal range.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Change> {
    if previous.is_zero() {
        return None;
    }
    let ratio = current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    let percent = ratio.round_dp(1).to_f64()?;
    Some(Change {
        percent,
        positive: percent >= 0.0,
    })
}

/// Two adjacent windows of equal length ending at `end`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub period_days: i64,
    pub end: DateTime<Utc>,
    /// Transactions dated in `[end - period, end)`
    pub current: TransactionSummary,
    /// Transactions dated in `[end - 2 * period, end - period)`
    pub previous: TransactionSummary,
    pub volume_change: Option<Change>,
    pub count_change: Option<Change>,
}

pub const MAX_PERIOD_DAYS: i64 = 3660;

/// Compare the last `period_days` before `end` with the period before it.
/// Transactions without a readable date belong to neither window.
pub fn compare_periods(transactions: &[Transaction], end: DateTime<Utc>, period_days: i64) -> PeriodComparison {
    let period = Duration::days(period_days.clamp(1, MAX_PERIOD_DAYS));
    let current_start = end - period;
    let previous_start = current_start - period;

    let dated: Vec<(DateTime<Utc>, &Transaction)> = transactions
        .iter()
        .filter_map(|tx| tx.timestamp().map(|at| (at, tx)))
        .collect();
    let window = |from: DateTime<Utc>, to: DateTime<Utc>| {
        summarize_iter(dated.iter().filter(|(at, _)| *at >= from && *at < to).map(|(_, tx)| *tx))
    };
    let current = window(current_start, end);
    let previous = window(previous_start, current_start);

    PeriodComparison {
        period_days: period.num_days(),
        end,
        volume_change: percent_change(current.completed_volume, previous.completed_volume),
        count_change: percent_change(Decimal::from(current.total_count), Decimal::from(previous.total_count)),
        current,
        previous,
    }
}
