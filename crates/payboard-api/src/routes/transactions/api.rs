//! Transactions API endpoints
//!
//! Endpoints:
//! - api_transactions: current table page
//! - api_set_filters: update search text and filters (back to page 1)
//! - api_set_page: jump to a page (clamped)
//! - api_refresh: refetch the source from the backend
//! - api_export: the full filtered set
//! - api_stats: stat card figures
//! - api_select / api_clear_selection: detail view selection

use crate::error::{ApiError, ResultExt};
use crate::routes::transactions::page::TransactionPage;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use payboard_core::{
    compare_periods, summarize, AmountRange, Filter, PaymentMethod, PeriodComparison, Transaction, TransactionStatus,
    TransactionSummary, ViewAction, MAX_PERIOD_DAYS,
};
use serde::{Deserialize, Serialize};

const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Partial criteria update; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersUpdate {
    pub search_query: Option<String>,
    pub status_filter: Option<Filter<TransactionStatus>>,
    pub payment_method_filter: Option<Filter<PaymentMethod>>,
    pub amount_range_filter: Option<Filter<AmountRange>>,
}

impl FiltersUpdate {
    fn into_actions(self) -> Vec<ViewAction> {
        let mut actions = Vec::new();
        if let Some(query) = self.search_query {
            actions.push(ViewAction::SetSearch(query));
        }
        if let Some(filter) = self.status_filter {
            actions.push(ViewAction::SetStatusFilter(filter));
        }
        if let Some(filter) = self.payment_method_filter {
            actions.push(ViewAction::SetPaymentMethodFilter(filter));
        }
        if let Some(filter) = self.amount_range_filter {
            actions.push(ViewAction::SetAmountRangeFilter(filter));
        }
        actions
    }
}

async fn current_page(state: &AppState) -> Json<TransactionPage> {
    let vm = state.view_model.read().await;
    Json(TransactionPage::build(vm.state(), &state.actions))
}

/// Get the current table page (JSON API)
pub async fn api_transactions(State(state): State<AppState>) -> Json<TransactionPage> {
    current_page(&state).await
}

/// Apply search text and filters, then return page 1
pub async fn api_set_filters(
    State(state): State<AppState>,
    Json(update): Json<FiltersUpdate>,
) -> Json<TransactionPage> {
    {
        let mut vm = state.view_model.write().await;
        for action in update.into_actions() {
            log::debug!(target: "payboard::api", "filters: {:?}", action);
            vm.dispatch(action);
        }
    }
    current_page(&state).await
}

/// Jump to a page; out-of-range numbers land on the nearest valid page
pub async fn api_set_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<TransactionPage>, ApiError> {
    let page: usize = page
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid page number: {}", page)))?;
    state.view_model.write().await.dispatch(ViewAction::SetPage(page));
    Ok(current_page(&state).await)
}

/// Refetch the source; on failure the current table stays as it was
pub async fn api_refresh(State(state): State<AppState>) -> Result<Json<TransactionPage>, ApiError> {
    state.refresh().await.during("refresh transactions")?;
    Ok(current_page(&state).await)
}

/// Every transaction matching the current criteria, in source order
pub async fn api_export(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    let vm = state.view_model.read().await;
    Json(vm.state().export_set())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Window length for the comparison, 30 days when absent
    pub period_days: Option<i64>,
    /// End of the current window (RFC 3339), now when absent
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub summary: TransactionSummary,
    pub comparison: PeriodComparison,
}

/// Status counts and completed volume over the whole source, plus the
/// current period compared with the one before it
pub async fn api_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let period_days = query.period_days.unwrap_or(DEFAULT_PERIOD_DAYS);
    if !(1..=MAX_PERIOD_DAYS).contains(&period_days) {
        return Err(ApiError::bad_request(format!(
            "periodDays must be between 1 and {}",
            MAX_PERIOD_DAYS
        )));
    }
    let end = match query.as_of.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| ApiError::bad_request(format!("asOf is not an RFC 3339 timestamp: {}", e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let vm = state.view_model.read().await;
    let source = vm.state().source();
    Ok(Json(StatsResponse {
        summary: summarize(source),
        comparison: compare_periods(source, end, period_days),
    }))
}

/// Select a transaction and switch to detail mode
pub async fn api_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionPage>, ApiError> {
    state
        .view_model
        .write()
        .await
        .select(&id)
        .map(|_| ())
        .map_err(|e| ApiError::new(e, "select transaction").for_transaction(&id))?;
    Ok(current_page(&state).await)
}

/// Back to list mode
pub async fn api_clear_selection(State(state): State<AppState>) -> Json<TransactionPage> {
    state.view_model.write().await.clear_selection();
    current_page(&state).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_page() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(25))).await;
        let (status, body) = call(&state, Method::GET, "/api/transactions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"].as_array().unwrap().len(), 10);
        assert_eq!(body["rows"][0]["displayId"], "#1001");
        assert_eq!(body["pageCount"], 3);
        assert_eq!(body["totalCount"], 25);
        assert_eq!(body["rangeLabel"], "Showing 1-10 of 25 transactions");
        assert_eq!(body["mode"], "list");
    }

    #[tokio::test]
    async fn test_filters_reset_page() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(25))).await;
        let (_, body) = call(&state, Method::POST, "/api/transactions/page/3", None).await;
        assert_eq!(body["page"], 3);

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/transactions/filters",
            Some(json!({"statusFilter": "completed", "amountRangeFilter": "100-500"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["criteria"]["statusFilter"], "completed");
        // completed rows are i % 3 == 1 with amount i * 25: 4, 7, 10, 13, 16, 19 fall in [100, 500)
        let ids: Vec<&str> = body["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1004", "1007", "1010", "1013", "1016", "1019"]);
    }

    #[tokio::test]
    async fn test_search_is_trimmed_and_case_insensitive() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(25))).await;
        let (_, body) = call(
            &state,
            Method::POST,
            "/api/transactions/filters",
            Some(json!({"searchQuery": "  customer 2 "})),
        )
        .await;
        // "customer 2" plus "customer 20".."customer 25"
        assert_eq!(body["filteredCount"], 7);
    }

    #[tokio::test]
    async fn test_set_page_clamps() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(25))).await;
        let (status, body) = call(&state, Method::POST, "/api/transactions/page/99", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 3);
        assert_eq!(body["rows"].as_array().unwrap().len(), 5);

        let (status, body) = call(&state, Method::POST, "/api/transactions/page/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_selection() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(5))).await;
        let (status, body) = call(&state, Method::POST, "/api/selection/1003", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "detail");
        assert_eq!(body["selected"]["id"], "1003");

        let (status, body) = call(&state, Method::POST, "/api/selection/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "TRANSACTION_NOT_FOUND");

        let (_, body) = call(&state, Method::GET, "/api/transactions", None).await;
        assert_eq!(body["mode"], "list");

        call(&state, Method::POST, "/api/selection/1001", None).await;
        let (_, body) = call(&state, Method::DELETE, "/api/selection", None).await;
        assert_eq!(body["mode"], "list");
        assert!(body["selected"].is_null());
    }

    #[tokio::test]
    async fn test_refresh_drops_missing_selection() {
        let backend = Arc::new(FakeBackend::seeded(5));
        let state = loaded_state(backend.clone()).await;
        call(&state, Method::POST, "/api/selection/1005", None).await;

        backend.transactions.lock().unwrap().retain(|t| t.id != "1005");
        let (status, body) = call(&state, Method::POST, "/api/transactions/refresh", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 4);
        assert_eq!(body["mode"], "list");
    }

    #[tokio::test]
    async fn test_export_and_stats() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(12))).await;
        call(&state, Method::POST, "/api/transactions/filters", Some(json!({"statusFilter": "failed"}))).await;

        let (status, body) = call(&state, Method::GET, "/api/transactions/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);

        let (status, body) = call(&state, Method::GET, "/api/transactions/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 12);
        assert_eq!(body["failedCount"], 4);
        assert_eq!(body["completedCount"], 4);
    }

    #[tokio::test]
    async fn test_stats_period_comparison() {
        // Seeded transactions are all dated 2024-03-05
        let state = loaded_state(Arc::new(FakeBackend::seeded(6))).await;

        let (status, body) = call(
            &state,
            Method::GET,
            "/api/transactions/stats?periodDays=7&asOf=2024-03-10T00:00:00Z",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 6);
        assert_eq!(body["comparison"]["periodDays"], 7);
        assert_eq!(body["comparison"]["current"]["totalCount"], 6);
        assert_eq!(body["comparison"]["previous"]["totalCount"], 0);
        assert!(body["comparison"]["volumeChange"].is_null());

        let (_, body) = call(
            &state,
            Method::GET,
            "/api/transactions/stats?periodDays=7&asOf=2024-03-17T00:00:00Z",
            None,
        )
        .await;
        assert_eq!(body["comparison"]["current"]["totalCount"], 0);
        assert_eq!(body["comparison"]["previous"]["totalCount"], 6);
        assert_eq!(body["comparison"]["countChange"]["percent"], -100.0);
        assert_eq!(body["comparison"]["countChange"]["positive"], false);
    }

    #[tokio::test]
    async fn test_stats_rejects_bad_query() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(3))).await;

        let (status, body) = call(&state, Method::GET, "/api/transactions/stats?periodDays=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FORMAT");

        let (status, _) = call(&state, Method::GET, "/api/transactions/stats?asOf=yesterday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
