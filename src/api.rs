//! HTTP collaborator for the transaction store.
//!
//! [`TransactionApi`] is the seam between the store and whatever backend holds
//! the records. [`HttpTransactionApi`] talks to a json-server style REST
//! backend; tests and embedders can plug in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config;
use crate::error::ApiError;
use crate::models::{CreateTransactionBody, Transaction};

// ---------------------------------------------------------------------------
// TransactionApi
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// List transactions newest-first, optionally filtered by free text.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Transaction>, ApiError>;

    /// Create a transaction and return it as stored by the backend.
    async fn create(&self, body: &CreateTransactionBody) -> Result<Transaction, ApiError>;
}

/// Query parameters for a list request.
///
/// `q` is only present when a query was given; an absent filter is never
/// serialized as an empty or placeholder value.
pub fn list_params(query: Option<&str>) -> Vec<(&'static str, &str)> {
    let mut params = vec![
        ("_sort", config::SORT_FIELD),
        ("_order", config::SORT_ORDER),
    ];
    if let Some(q) = query {
        params.push(("q", q));
    }
    params
}

// ---------------------------------------------------------------------------
// HttpTransactionApi
// ---------------------------------------------------------------------------

/// [`TransactionApi`] over HTTP using an async `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransactionApi {
    client: Client,
    endpoint: Url,
}

impl HttpTransactionApi {
    /// Create a client for `<base_url>/transactions`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let endpoint = resource_url(base_url, config::TRANSACTIONS_RESOURCE)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Full URL of the transactions resource.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TransactionApi for HttpTransactionApi {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Transaction>, ApiError> {
        tracing::debug!("GET {} q={:?}", self.endpoint, query);
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&list_params(query))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    async fn create(&self, body: &CreateTransactionBody) -> Result<Transaction, ApiError> {
        tracing::debug!("POST {} description={:?}", self.endpoint, body.description);
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

fn resource_url(base_url: &str, resource: &str) -> Result<Url, ApiError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), resource);
    let parsed =
        Url::parse(&url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{base_url}: expected an http(s) URL"
        )));
    }
    Ok(parsed)
}
