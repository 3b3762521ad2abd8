use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

pub const TRANSACTIONS_RESOURCE: &str = "transactions";

// json-server style sorting parameters
pub const SORT_FIELD: &str = "createdAt";
pub const SORT_ORDER: &str = "desc";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
