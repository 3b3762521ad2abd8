//! Client-side store for ledger transactions backed by a REST API.
//!
//! The store keeps an in-memory, newest-first list of transactions, loads it
//! when attached, re-fetches it with an optional search filter, and prepends
//! newly created records. UI code shares the store by cloning the handle and
//! watches it for changes through a subscription channel.
//!
//! # Quick start
//!
//! ```no_run
//! use transactions_store::{NewTransaction, TransactionStore, TransactionType};
//!
//! # async fn example() -> transactions_store::Result<()> {
//! let store = TransactionStore::builder()
//!     .base_url("http://localhost:3333")
//!     .build()?;
//!
//! // Initial load
//! store.attach().loaded().await?;
//!
//! // Search
//! store.fetch_transactions(Some("rent")).await?;
//!
//! // Create
//! let created = store
//!     .create_transaction(NewTransaction::new(
//!         "coffee",
//!         TransactionType::Outcome,
//!         5.0,
//!         "food",
//!     ))
//!     .await?;
//! assert_eq!(store.transactions()[0].id, created.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::{HttpTransactionApi, TransactionApi};
pub use error::{ApiError, Result, StoreError};
pub use models::{CreateTransactionBody, NewTransaction, Summary, Transaction, TransactionType};
pub use store::{Attachment, TransactionStore};

use std::time::Duration;

// ---------------------------------------------------------------------------
// TransactionStoreBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`TransactionStore`].
///
/// Use [`TransactionStore::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](TransactionStoreBuilder::build) for an HTTP
/// backed store or [`build_with_api()`](TransactionStoreBuilder::build_with_api)
/// for a custom collaborator.
pub struct TransactionStoreBuilder {
    base_url: String,
    timeout: Duration,
    discard_stale_fetches: bool,
}

impl Default for TransactionStoreBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            discard_stale_fetches: true,
        }
    }
}

impl TransactionStoreBuilder {
    /// Set the backend base URL. The store talks to `<base_url>/transactions`.
    ///
    /// Defaults to `http://localhost:3333`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drop fetch responses that were superseded by a newer fetch.
    ///
    /// Defaults to `true`. When disabled, overlapping fetches apply in the
    /// order their responses arrive, so a slow older response can overwrite
    /// a newer one.
    pub fn discard_stale_fetches(mut self, discard: bool) -> Self {
        self.discard_stale_fetches = discard;
        self
    }

    /// Build an HTTP backed store. The list starts empty; call
    /// [`TransactionStore::attach`] to load it.
    pub fn build(self) -> Result<TransactionStore<HttpTransactionApi>> {
        let api = HttpTransactionApi::new(&self.base_url, self.timeout)
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(self.build_with_api(api))
    }

    /// Build a store over any [`TransactionApi`]. `base_url` and `timeout`
    /// are ignored.
    pub fn build_with_api<A: TransactionApi>(self, api: A) -> TransactionStore<A> {
        TransactionStore::with_options(api, self.discard_stale_fetches)
    }
}

impl TransactionStore<HttpTransactionApi> {
    /// Create a new builder for configuring the store.
    pub fn builder() -> TransactionStoreBuilder {
        TransactionStoreBuilder::default()
    }
}
