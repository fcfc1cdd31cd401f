use crate::error::ConfigError;

pub const DEFAULT_DATABASE_NAME: &str = "morai";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DATABASE_URL: &str = "MORAI_DATABASE_URL";
const DATABASE_NAME: &str = "MORAI_DATABASE_NAME";
const STORAGE_FALLBACK: &str = "MORAI_STORAGE_FALLBACK";
const MAX_BODY_BYTES: &str = "MORAI_MAX_BODY_BYTES";

/// What the store does when the database fails during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Serve the call from the in-memory store.
    #[default]
    Memory,
    /// Report the failure to the caller.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the database file, or `:memory:`. `None` runs the
    /// application on the in-memory store only.
    pub connection_string: Option<String>,
    pub database_name: String,
    pub fallback: FallbackPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl StorageConfig {
    pub fn with_connection_string(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: Some(connection_string.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageConfig,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let fallback = match get(STORAGE_FALLBACK) {
            None => FallbackPolicy::default(),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "memory" => FallbackPolicy::Memory,
                "fail" => FallbackPolicy::Fail,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        key: STORAGE_FALLBACK,
                        expected: "memory, fail",
                        value,
                    })
                }
            },
        };

        let max_body_bytes = match get(MAX_BODY_BYTES) {
            None => DEFAULT_MAX_BODY_BYTES,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: MAX_BODY_BYTES,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            storage: StorageConfig {
                connection_string: get(DATABASE_URL),
                database_name: get(DATABASE_NAME)
                    .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
                fallback,
            },
            max_body_bytes,
        })
    }
}
