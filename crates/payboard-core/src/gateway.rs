//! Collaborator contracts implemented outside the core
//!
//! The view-model never talks to the network itself; the host wires in an
//! implementation of these traits (see `payboard-client`).

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::models::{Account, Credentials, Registration, Session, Transaction};

/// Supplies the source collection for the transactions table
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>>;
}

/// State-changing operations on a single transaction.
///
/// Each call returns the transaction as the backend now sees it. Any error
/// is treated by callers as "action failed" and is never retried automatically.
#[async_trait]
pub trait TransactionActionGateway: Send + Sync {
    async fn mark_as_paid(&self, id: &str) -> CoreResult<Transaction>;
    async fn retry_charge(&self, id: &str) -> CoreResult<Transaction>;
    async fn refund_transaction(&self, id: &str) -> CoreResult<Transaction>;
}

/// Account operations behind the login and registration forms
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> CoreResult<Session>;
    async fn register(&self, registration: &Registration) -> CoreResult<Account>;
}

/// Everything the dashboard host needs from the backend
pub trait DashboardGateway: TransactionSource + TransactionActionGateway + AuthGateway {}

impl<T> DashboardGateway for T where T: TransactionSource + TransactionActionGateway + AuthGateway {}
