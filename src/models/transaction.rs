use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TransactionType — Direction of money flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Outcome,
}

// ---------------------------------------------------------------------------
// Transaction — One ledger entry as stored by the backend
// ---------------------------------------------------------------------------

/// A ledger entry returned by the backend.
///
/// `id` and `created_at` are assigned by the backend. `created_at` is kept
/// verbatim as the backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub price: f64,
    pub category: String,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// NewTransaction — Caller-supplied fields for a create
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub price: f64,
    pub category: String,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        kind: TransactionType,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            kind,
            price,
            category: category.into(),
        }
    }

    /// Attach a creation timestamp, producing the body sent to the backend.
    pub fn into_body(self, created_at: DateTime<Utc>) -> CreateTransactionBody {
        CreateTransactionBody {
            description: self.description,
            category: self.category,
            price: self.price,
            kind: self.kind,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

// ---------------------------------------------------------------------------
// CreateTransactionBody — Wire body of `POST /transactions`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionBody {
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub created_at: String,
}
