//! Table page projection - what the transactions table renders

use payboard_core::{
    ActionRegistry, FilterCriteria, MenuAction, PageRange, Transaction, TransactionStatus, ViewMode, ViewState,
};
use payboard_utils::{format_number, humanize_identifier};
use serde::Serialize;

const EMPTY_TITLE: &str = "No Transactions Found";

/// One table row, display-ready
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub id: String,
    pub display_id: String,
    pub customer: String,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub selected: bool,
    /// An action on this row is waiting for the backend
    pub busy: bool,
    pub menu: Vec<MenuAction>,
}

impl TransactionRow {
    pub fn project(tx: &Transaction, selected_id: Option<&str>, actions: &ActionRegistry) -> Self {
        Self {
            id: tx.id.clone(),
            display_id: format!("#{}", tx.id),
            customer: tx.customer_display().to_string(),
            amount: tx.amount.map(format_number),
            date: display_date(tx),
            payment_method: tx
                .payment_method
                .as_ref()
                .map(|m| humanize_identifier(m.as_str()))
                .unwrap_or_else(|| "N/A".to_string()),
            status: tx.status,
            selected: selected_id == Some(tx.id.as_str()),
            busy: actions.is_loading(&tx.id),
            menu: MenuAction::menu_for(tx.status),
        }
    }
}

/// "Mar 5, 2024"; unparseable dates are shown as they came
fn display_date(tx: &Transaction) -> Option<String> {
    match tx.timestamp() {
        Some(ts) => Some(ts.format("%b %-d, %Y").to_string()),
        None if tx.date.trim().is_empty() => None,
        None => Some(tx.date.clone()),
    }
}

/// The current page of the table plus everything around it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub rows: Vec<TransactionRow>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub range: PageRange,
    pub range_label: String,
    pub has_previous: bool,
    pub has_next: bool,
    pub criteria: FilterCriteria,
    pub mode: ViewMode,
    pub selected: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_title: Option<&'static str>,
}

impl TransactionPage {
    pub fn build(state: &ViewState, actions: &ActionRegistry) -> Self {
        let selected_id = state.selected_id();
        let rows: Vec<TransactionRow> = state
            .visible_page()
            .into_iter()
            .map(|tx| TransactionRow::project(tx, selected_id, actions))
            .collect();
        let range = state.page_range();

        Self {
            empty_title: rows.is_empty().then_some(EMPTY_TITLE),
            rows,
            page: state.page(),
            page_size: state.page_size(),
            page_count: state.page_count(),
            filtered_count: state.filtered_count(),
            total_count: state.source().len(),
            range_label: range.to_string(),
            range,
            has_previous: state.has_previous(),
            has_next: state.has_next(),
            criteria: state.criteria().clone(),
            mode: state.mode(),
            selected: state.selected().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payboard_core::{PaymentMethod, ViewAction, reduce};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_row_projection() {
        let tx = Transaction::new("77", TransactionStatus::Pending)
            .with_customer("Grace Hopper")
            .with_amount(Decimal::from_str("1234.50").unwrap())
            .with_payment_method(PaymentMethod::BankTransfer)
            .with_date("2024-03-05");
        let registry = ActionRegistry::new();
        let row = TransactionRow::project(&tx, Some("77"), &registry);
        assert_eq!(row.display_id, "#77");
        assert_eq!(row.customer, "Grace Hopper");
        assert_eq!(row.amount.as_deref(), Some("1,234.50"));
        assert_eq!(row.date.as_deref(), Some("Mar 5, 2024"));
        assert_eq!(row.payment_method, "bank transfer");
        assert!(row.selected);
        assert!(!row.busy);
        assert_eq!(row.menu, vec![MenuAction::ViewDetails, MenuAction::Perform(payboard_core::ActionKind::MarkPaid)]);
    }

    #[test]
    fn test_row_placeholders() {
        let tx = Transaction::new("1", TransactionStatus::Unknown).with_date("sometime");
        let row = TransactionRow::project(&tx, None, &ActionRegistry::new());
        assert_eq!(row.customer, "N/A");
        assert_eq!(row.payment_method, "N/A");
        assert_eq!(row.amount, None);
        assert_eq!(row.date.as_deref(), Some("sometime"));
        assert_eq!(row.menu, vec![MenuAction::ViewDetails]);
    }

    #[test]
    fn test_page_build() {
        let source: Vec<Transaction> = (1..=12)
            .map(|i| Transaction::new(i.to_string(), TransactionStatus::Pending))
            .collect();
        let state = reduce(ViewState::new(source, 10), ViewAction::NextPage);
        let page = TransactionPage::build(&state, &ActionRegistry::new());
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.range_label, "Showing 11-12 of 12 transactions");
        assert!(page.has_previous);
        assert!(!page.has_next);
        assert_eq!(page.empty_title, None);

        let state = reduce(state, ViewAction::SetSearch("nothing matches".to_string()));
        let page = TransactionPage::build(&state, &ActionRegistry::new());
        assert!(page.rows.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.empty_title, Some(EMPTY_TITLE));
    }
}
