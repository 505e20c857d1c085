// Poolsight - database-backed web service with health, pool and request metrics

pub mod api;
pub mod config;
pub mod db;
pub mod metrics;
pub mod utils;

// Re-export commonly used types
pub use utils::error::{PoolsightError, Result};
