//! HTTP gateway to the payments backend
//!
//! Endpoints, relative to `gateway.base_url`:
//! - GET  /transactions
//! - POST /transactions/{id}/mark-paid | retry | refund
//! - POST /auth/login
//! - POST /auth/register

pub mod error;

use async_trait::async_trait;
use payboard_config::GatewayConfig;
use payboard_core::{
    Account, AuthGateway, CoreResult, Credentials, Registration, Session, Transaction, TransactionActionGateway,
    TransactionSource,
};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::ClientError;

/// Error body the backend sends with non-2xx replies
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Lists come either bare or wrapped in an envelope. Records are decoded
/// one by one so a single unusable record does not sink the whole list.
#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionList {
    Bare(Vec<serde_json::Value>),
    Wrapped {
        #[serde(alias = "data")]
        transactions: Vec<serde_json::Value>,
    },
}

impl TransactionList {
    fn into_transactions(self) -> Vec<Transaction> {
        let records = match self {
            TransactionList::Bare(records) => records,
            TransactionList::Wrapped { transactions } => transactions,
        };
        records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Transaction>(record) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    log::warn!(target: "payboard::client", "skipping unreadable transaction record: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Single records likewise
#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionEnvelope {
    Bare(Transaction),
    Wrapped {
        #[serde(alias = "data")]
        transaction: Transaction,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccountEnvelope {
    Bare(Account),
    Wrapped {
        #[serde(alias = "data")]
        user: Account,
    },
}

/// Gateway implementation over reqwest
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http_client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        let raw = config.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(raw.to_string()));
        }
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let builder = self.http_client.request(method, self.url(segments)?);
        Ok(match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, segments)?.json(body)).await
    }

    async fn post_action(&self, id: &str, action: &str) -> Result<TransactionEnvelope, ClientError> {
        self.send_json(self.request(Method::POST, &["transactions", id, action])?).await
    }

    async fn transaction_action(&self, id: &str, action: &str) -> CoreResult<Transaction> {
        log::debug!(target: "payboard::client", "POST transactions/{}/{}", id, action);
        let envelope = self
            .post_action(id, action)
            .await
            .map_err(|e| e.into_core(Some(id)))?;
        Ok(match envelope {
            TransactionEnvelope::Bare(tx) => tx,
            TransactionEnvelope::Wrapped { transaction } => transaction,
        })
    }
}

#[async_trait]
impl TransactionSource for HttpGateway {
    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
        let list: TransactionList = self.send_json(self.request(Method::GET, &["transactions"])?).await?;
        let transactions = list.into_transactions();
        log::info!(target: "payboard::client", "fetched {} transactions", transactions.len());
        Ok(transactions)
    }
}

#[async_trait]
impl TransactionActionGateway for HttpGateway {
    async fn mark_as_paid(&self, id: &str) -> CoreResult<Transaction> {
        self.transaction_action(id, "mark-paid").await
    }

    async fn retry_charge(&self, id: &str) -> CoreResult<Transaction> {
        self.transaction_action(id, "retry").await
    }

    async fn refund_transaction(&self, id: &str) -> CoreResult<Transaction> {
        self.transaction_action(id, "refund").await
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> CoreResult<Session> {
        Ok(self.post_json(&["auth", "login"], credentials).await?)
    }

    async fn register(&self, registration: &Registration) -> CoreResult<Account> {
        let envelope: AccountEnvelope = self.post_json(&["auth", "register"], registration).await?;
        Ok(match envelope {
            AccountEnvelope::Bare(account) => account,
            AccountEnvelope::Wrapped { user } => user,
        })
    }
}
