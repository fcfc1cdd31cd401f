use thiserror::Error;

/// Rejected create request. Shared by the server and the browser views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name and comment required")]
    MissingField(&'static str),
}

/// Failure of a browser-side call to the review API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] gloo_net::Error),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}

#[cfg(feature = "ssr")]
mod server {
    use super::ValidationError;
    use thiserror::Error;

    /// Anything that goes wrong reaching or using the review database.
    #[derive(Debug, Error)]
    pub enum StorageError {
        #[error("no database connection string configured")]
        NotConfigured,
        #[error("database error: {0}")]
        Sqlite(#[from] rusqlite::Error),
        #[error("database directory error: {0}")]
        Io(#[from] std::io::Error),
        #[error("stored timestamp out of range: {0}")]
        InvalidTimestamp(i64),
    }

    #[derive(Debug, Error)]
    pub enum ReviewError {
        #[error(transparent)]
        Validation(#[from] ValidationError),
        #[error("review {0} not found")]
        NotFound(String),
        #[error(transparent)]
        Storage(#[from] StorageError),
    }

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("{key} must be one of {expected}, got {value:?}")]
        InvalidChoice {
            key: &'static str,
            expected: &'static str,
            value: String,
        },
        #[error("{key} must be a positive integer, got {value:?}")]
        InvalidNumber { key: &'static str, value: String },
    }
}

#[cfg(feature = "ssr")]
pub use server::{ConfigError, ReviewError, StorageError};
