//! Shared test fixtures for the transaction store integration tests.
//!
//! Provides two backends:
//! - [`FakeApi`], an in-memory [`TransactionApi`] with scripted responses and
//!   gates for ordering overlapping requests.
//! - [`spawn_mock_server`], a json-server style HTTP backend built with axum on
//!   an ephemeral port, for exercising the real wire format.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use transactions_store::{
    ApiError, CreateTransactionBody, Transaction, TransactionApi, TransactionType,
};

/// Build a transaction with sensible filler for the fields a test doesn't care about.
pub fn tx(
    id: i64,
    description: &str,
    kind: TransactionType,
    price: f64,
    created_at: &str,
) -> Transaction {
    Transaction {
        id,
        description: description.to_string(),
        kind,
        price,
        category: "misc".to_string(),
        created_at: created_at.to_string(),
    }
}

/// Two transactions, newest first.
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        tx(2, "Salary", TransactionType::Income, 4000.0, "2024-01-02"),
        tx(1, "Rent", TransactionType::Outcome, 1200.0, "2024-01-01"),
    ]
}

// ---------------------------------------------------------------------------
// FakeApi
// ---------------------------------------------------------------------------

struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<T, String>,
}

/// In-memory collaborator.
///
/// Without a script, `list` returns the current data set and `create` assigns
/// the next id, echoes the body, and stores it. Scripted responses are consumed
/// in FIFO order and may wait on a gate before resolving.
#[derive(Default)]
pub struct FakeApi {
    data: Mutex<Vec<Transaction>>,
    next_id: Mutex<i64>,
    list_script: Mutex<VecDeque<Scripted<Vec<Transaction>>>>,
    create_script: Mutex<VecDeque<Scripted<Transaction>>>,
    pub list_calls: Mutex<Vec<Option<String>>>,
    pub create_calls: Mutex<Vec<CreateTransactionBody>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Vec<Transaction>) -> Self {
        let next_id = data.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            data: Mutex::new(data),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    pub fn fail_next_list(&self, message: &str) {
        self.list_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Err(message.to_string()),
        });
    }

    pub fn fail_next_create(&self, message: &str) {
        self.create_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Err(message.to_string()),
        });
    }

    pub fn respond_next_create(&self, created: Transaction) {
        self.create_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Ok(created),
        });
    }

    pub fn respond_next_list(&self, list: Vec<Transaction>) {
        self.list_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Ok(list),
        });
    }

    /// Queue a list response that is held back until the returned sender fires.
    pub fn gate_next_list(&self, list: Vec<Transaction>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_script.lock().unwrap().push_back(Scripted {
            gate: Some(rx),
            result: Ok(list),
        });
        tx
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionApi for FakeApi {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Transaction>, ApiError> {
        self.list_calls
            .lock()
            .unwrap()
            .push(query.map(str::to_string));

        let scripted = self.list_script.lock().unwrap().pop_front();
        match scripted {
            Some(Scripted { gate, result }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result.map_err(ApiError::Backend)
            }
            None => Ok(self.data.lock().unwrap().clone()),
        }
    }

    async fn create(&self, body: &CreateTransactionBody) -> Result<Transaction, ApiError> {
        self.create_calls.lock().unwrap().push(body.clone());

        let scripted = self.create_script.lock().unwrap().pop_front();
        if let Some(Scripted { gate, result }) = scripted {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            return result.map_err(ApiError::Backend);
        }

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id = (*next_id).max(1);
            let id = *next_id;
            *next_id += 1;
            id
        };
        let created = Transaction {
            id,
            description: body.description.clone(),
            kind: body.kind,
            price: body.price,
            category: body.category.clone(),
            created_at: body.created_at.clone(),
        };
        self.data.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }
}

/// Yield until `cond` holds, so a spawned request is known to be in flight.
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

// ---------------------------------------------------------------------------
// Mock json-server backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub params: HashMap<String, String>,
    pub raw_query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockDb {
    pub rows: Vec<Value>,
    pub next_id: i64,
    pub fail_with: Option<StatusCode>,
    pub requests: Vec<RecordedRequest>,
}

pub type SharedDb = Arc<Mutex<MockDb>>;

/// Start a mock backend seeded with `rows` and return its base URL.
pub async fn spawn_mock_server(rows: Vec<Value>) -> (String, SharedDb) {
    let next_id = rows
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    let db: SharedDb = Arc::new(Mutex::new(MockDb {
        rows,
        next_id,
        ..MockDb::default()
    }));

    let app = Router::new()
        .route("/transactions", get(list_rows).post(create_row))
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), db)
}

pub fn row(id: i64, description: &str, kind: &str, price: f64, created_at: &str) -> Value {
    json!({
        "id": id,
        "description": description,
        "type": kind,
        "price": price,
        "category": "misc",
        "createdAt": created_at,
    })
}

async fn list_rows(
    State(db): State<SharedDb>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut db = db.lock().unwrap();
    db.requests.push(RecordedRequest {
        method: "GET",
        params: params.clone(),
        raw_query,
        body: None,
    });
    if let Some(status) = db.fail_with {
        return Err(status);
    }

    let mut rows: Vec<Value> = match params.get("q") {
        Some(q) => {
            let q = q.to_lowercase();
            db.rows
                .iter()
                .filter(|r| {
                    r.as_object()
                        .map(|o| o.values().any(|v| v.to_string().to_lowercase().contains(&q)))
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        }
        None => db.rows.clone(),
    };

    if let Some(field) = params.get("_sort") {
        rows.sort_by(|a, b| {
            let a = a[field.as_str()].as_str().unwrap_or("");
            let b = b[field.as_str()].as_str().unwrap_or("");
            a.cmp(b)
        });
        if params.get("_order").map(String::as_str) == Some("desc") {
            rows.reverse();
        }
    }

    Ok(Json(rows))
}

async fn create_row(
    State(db): State<SharedDb>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut db = db.lock().unwrap();
    db.requests.push(RecordedRequest {
        method: "POST",
        params: HashMap::new(),
        raw_query: None,
        body: Some(body.clone()),
    });
    if let Some(status) = db.fail_with {
        return Err(status);
    }

    let mut created = body;
    created["id"] = json!(db.next_id);
    db.next_id += 1;
    db.rows.push(created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}
