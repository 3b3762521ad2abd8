/// Failure reported by a [`TransactionApi`](crate::api::TransactionApi) collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to fetch transactions: {0}")]
    Fetch(#[source] ApiError),

    #[error("Failed to create transaction: {0}")]
    Create(#[source] ApiError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Task join error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
