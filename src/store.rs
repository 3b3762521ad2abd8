//! The transaction store: an observable, newest-first list of transactions
//! plus the two operations that change it.
//!
//! Consumers hold a cloneable [`TransactionStore`] handle. They read snapshots
//! with [`transactions()`](TransactionStore::transactions) and observe changes
//! through [`subscribe()`](TransactionStore::subscribe). Only the store mutates
//! the list.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{HttpTransactionApi, TransactionApi};
use crate::error::{Result, StoreError};
use crate::models::{NewTransaction, Summary, Transaction};

struct Inner<A> {
    api: A,
    state: watch::Sender<Vec<Transaction>>,
    /// Ticket of the most recently issued fetch.
    fetch_seq: AtomicU64,
    discard_stale_fetches: bool,
}

// ---------------------------------------------------------------------------
// TransactionStore
// ---------------------------------------------------------------------------

/// Shared handle to the transaction list and its fetch/create operations.
///
/// Cloning is cheap; all clones observe and mutate the same state. Built via
/// [`TransactionStore::builder()`](crate::TransactionStoreBuilder) for HTTP,
/// or [`TransactionStore::with_api`] for any other [`TransactionApi`].
pub struct TransactionStore<A = HttpTransactionApi> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for TransactionStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: TransactionApi> TransactionStore<A> {
    /// Create an empty store over `api` that discards stale fetch responses.
    pub fn with_api(api: A) -> Self {
        Self::with_options(api, true)
    }

    pub(crate) fn with_options(api: A, discard_stale_fetches: bool) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                fetch_seq: AtomicU64::new(0),
                discard_stale_fetches,
            }),
        }
    }

    // -- Read access -------------------------------------------------------

    /// Snapshot of the current list, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// The receiver is notified after every successful fetch or create. Failed
    /// operations and discarded stale fetches do not notify.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.inner.state.subscribe()
    }

    /// Income, outcome and balance over the current list.
    pub fn summary(&self) -> Summary {
        Summary::from_transactions(&self.inner.state.borrow())
    }

    /// Number of transactions currently held.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().len()
    }

    /// Whether the list is currently empty.
    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().is_empty()
    }

    /// The collaborator this store talks to.
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Whether superseded fetch responses are dropped.
    pub fn discards_stale_fetches(&self) -> bool {
        self.inner.discard_stale_fetches
    }

    // -- Operations --------------------------------------------------------

    /// Re-fetch the full list, optionally filtered by `query`.
    ///
    /// On success the list is replaced wholesale with the backend's response,
    /// in the order the backend returned it. On failure the list is left
    /// untouched and the error is returned as [`StoreError::Fetch`].
    ///
    /// If a newer fetch was issued while this one was in flight and stale
    /// discarding is enabled, this response is dropped and `Ok(())` is
    /// returned. With discarding disabled the last response to arrive wins,
    /// even when it answers an older request.
    pub async fn fetch_transactions(&self, query: Option<&str>) -> Result<()> {
        let ticket = self.inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let fetched = match self.inner.api.list(query).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("fetch #{ticket} (q={query:?}) failed: {e}");
                return Err(StoreError::Fetch(e));
            }
        };

        let discard = self.inner.discard_stale_fetches;
        let seq = &self.inner.fetch_seq;
        let count = fetched.len();
        let applied = self.inner.state.send_if_modified(move |list| {
            // Checked under the channel lock so two fetches cannot interleave here.
            if discard && seq.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *list = fetched;
            true
        });

        if applied {
            tracing::debug!("fetch #{ticket} applied {count} transactions");
        } else {
            tracing::debug!("fetch #{ticket} superseded by a newer fetch; response discarded");
        }
        Ok(())
    }

    /// Create a transaction and prepend the backend's copy to the list.
    ///
    /// `createdAt` is stamped with the current time. The returned transaction
    /// carries the backend-assigned `id` and `createdAt`.
    pub async fn create_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        let body = input.into_body(Utc::now());

        let created = match self.inner.api.create(&body).await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::warn!("create {:?} failed: {e}", body.description);
                return Err(StoreError::Create(e));
            }
        };

        let prepended = created.clone();
        self.inner
            .state
            .send_modify(move |list| list.insert(0, prepended));
        tracing::debug!("created transaction {}", created.id);
        Ok(created)
    }
}

impl<A: TransactionApi + 'static> TransactionStore<A> {
    /// Attach the store, scheduling exactly one unfiltered fetch.
    ///
    /// Every call schedules a new initial fetch; dropping the returned
    /// [`Attachment`] aborts it if it is still pending.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the initial fetch is
    /// spawned with [`tokio::spawn`].
    pub fn attach(&self) -> Attachment {
        let store = self.clone();
        let task = tokio::spawn(async move { store.fetch_transactions(None).await });
        Attachment { task }
    }
}

impl<A> fmt::Display for TransactionStore<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransactionStore(transactions={}, discard_stale_fetches={})",
            self.inner.state.borrow().len(),
            self.inner.discard_stale_fetches
        )
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// The initial load scheduled by [`TransactionStore::attach`].
///
/// Dropping it models tearing the store down: a still-pending initial fetch is
/// aborted.
pub struct Attachment {
    task: JoinHandle<Result<()>>,
}

impl Attachment {
    /// Wait for the initial fetch and return its outcome.
    pub async fn loaded(mut self) -> Result<()> {
        (&mut self.task)
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.task.abort();
    }
}
