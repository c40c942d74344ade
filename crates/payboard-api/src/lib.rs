//! JSON API hosting the transaction dashboard
//!
//! Routes are organized into modules:
//! - routes::transactions: table page, filters, pagination, selection, export, stats
//! - routes::actions: per-row action menu and confirmation dialog
//! - routes::auth: login, registration, password strength

pub mod error;
pub mod routes;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::Router;
use payboard_config::Config;
use payboard_core::{
    view_model_from_config, ActionRegistry, CoreResult, DashboardGateway, TransactionListViewModel, ViewAction,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub view_model: Arc<RwLock<TransactionListViewModel>>,
    pub actions: Arc<ActionRegistry>,
    pub gateway: Arc<dyn DashboardGateway>,
    pub config: Config,
}

impl AppState {
    /// Empty table sized by the configured page size
    pub fn new(config: Config, gateway: Arc<dyn DashboardGateway>) -> Self {
        Self {
            view_model: Arc::new(RwLock::new(view_model_from_config(&config))),
            actions: Arc::new(ActionRegistry::new()),
            gateway,
            config,
        }
    }

    /// Refetch the source collection. On failure the current table is kept.
    pub async fn refresh(&self) -> CoreResult<usize> {
        let transactions = self.gateway.fetch_transactions().await?;
        let count = transactions.len();
        self.view_model.write().await.dispatch(ViewAction::ReplaceSource(transactions));
        log::info!(target: "payboard::api", "source refreshed with {} transactions", count);
        Ok(count)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::actions::{api_action_cancel, api_action_confirm, api_action_open, api_actions};
    use routes::auth::{api_login, api_password_strength, api_register};
    use routes::transactions::{
        api_clear_selection, api_export, api_refresh, api_select, api_set_filters, api_set_page, api_stats,
        api_transactions,
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions/filters", post(api_set_filters))
        .route("/api/transactions/page/:page", post(api_set_page))
        .route("/api/transactions/refresh", post(api_refresh))
        .route("/api/transactions/export", get(api_export))
        .route("/api/transactions/stats", get(api_stats))
        .route("/api/selection/:id", post(api_select))
        .route("/api/selection", delete(api_clear_selection))
        .route("/api/transactions/:id/actions", get(api_actions))
        .route("/api/transactions/:id/actions/:kind/open", post(api_action_open))
        .route("/api/transactions/:id/actions/:kind/cancel", post(api_action_cancel))
        .route("/api/transactions/:id/actions/:kind/confirm", post(api_action_confirm))
        .route("/api/auth/login", post(api_login))
        .route("/api/auth/register", post(api_register))
        .route("/api/auth/password-strength", post(api_password_strength))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> String {
    let vm = state.view_model.read().await;
    format!("OK ({} transactions)", vm.state().source().len())
}

/// Bind the configured address and serve until the process stops
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!(target: "payboard::api", "Starting Payboard API on http://{}", addr);
    log::info!(target: "payboard::api", "  - /api/transactions (table page, filters, selection)");
    log::info!(target: "payboard::api", "  - /api/transactions/:id/actions (confirmation dialogs)");
    log::info!(target: "payboard::api", "  - /api/auth/* (login, registration)");

    axum::serve(listener, router).await?;
    log::info!(target: "payboard::api", "Server stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use payboard_core::{
        Account, AuthGateway, CoreError, Credentials, PaymentMethod, Registration, Session, Transaction,
        TransactionActionGateway, TransactionSource, TransactionStatus,
    };
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// In-memory backend; actions flip the status the way the real one does
    #[derive(Default)]
    pub struct FakeBackend {
        pub transactions: Mutex<Vec<Transaction>>,
        pub action_calls: AtomicUsize,
        pub fail_actions: bool,
    }

    impl FakeBackend {
        pub fn seeded(count: usize) -> Self {
            let methods = [PaymentMethod::CreditCard, PaymentMethod::Paypal, PaymentMethod::BankTransfer];
            let statuses = [TransactionStatus::Pending, TransactionStatus::Completed, TransactionStatus::Failed];
            let transactions = (1..=count)
                .map(|i| {
                    Transaction::new(format!("{}", 1000 + i), statuses[i % 3])
                        .with_customer(format!("Customer {}", i))
                        .with_amount(Decimal::from(i as i64 * 25))
                        .with_payment_method(methods[i % 3].clone())
                        .with_date("2024-03-05T10:00:00Z")
                })
                .collect();
            Self {
                transactions: Mutex::new(transactions),
                ..Self::default()
            }
        }

        fn transition(&self, id: &str, status: TransactionStatus) -> CoreResult<Transaction> {
            self.action_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_actions {
                return Err(CoreError::ActionFailed { message: "processor declined".to_string() });
            }
            let mut transactions = self.transactions.lock().unwrap();
            let tx = transactions
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })?;
            tx.status = status;
            Ok(tx.clone())
        }
    }

    #[async_trait]
    impl TransactionSource for FakeBackend {
        async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
            Ok(self.transactions.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl TransactionActionGateway for FakeBackend {
        async fn mark_as_paid(&self, id: &str) -> CoreResult<Transaction> {
            self.transition(id, TransactionStatus::Completed)
        }

        async fn retry_charge(&self, id: &str) -> CoreResult<Transaction> {
            self.transition(id, TransactionStatus::Completed)
        }

        async fn refund_transaction(&self, id: &str) -> CoreResult<Transaction> {
            self.transition(id, TransactionStatus::Refunded)
        }
    }

    #[async_trait]
    impl AuthGateway for FakeBackend {
        async fn login(&self, credentials: &Credentials) -> CoreResult<Session> {
            if credentials.password != "Abc12345" {
                return Err(CoreError::Unauthorized { message: "Invalid credentials".to_string() });
            }
            Ok(Session { token: "token-1".to_string(), user: None })
        }

        async fn register(&self, registration: &Registration) -> CoreResult<Account> {
            Ok(Account {
                id: "42".to_string(),
                name: registration.name.clone(),
                email: registration.email.clone(),
            })
        }
    }

    /// State over a seeded backend with the source already loaded
    pub async fn loaded_state(backend: Arc<FakeBackend>) -> AppState {
        let state = AppState::new(Config::default(), backend);
        state.refresh().await.unwrap();
        state
    }

    pub async fn call(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let state = loaded_state(Arc::new(FakeBackend::seeded(3))).await;
        let response = create_router(state)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK (3 transactions)");
    }

    #[tokio::test]
    async fn test_refresh_replaces_source() {
        let backend = Arc::new(FakeBackend::seeded(2));
        let state = AppState::new(Config::default(), backend.clone());
        assert!(state.view_model.read().await.state().source().is_empty());
        assert_eq!(state.refresh().await.unwrap(), 2);
        assert_eq!(state.view_model.read().await.state().source().len(), 2);
    }
}
