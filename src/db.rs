#[cfg(feature = "ssr")]
mod db_impl {
    use crate::config::StorageConfig;
    use crate::error::StorageError;
    use crate::models::review::Review;
    use chrono::{DateTime, Utc};
    use leptos::logging::log;
    use rusqlite::Connection;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::{Mutex, OnceCell};

    pub const IN_MEMORY: &str = ":memory:";

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::models::review::NewReview;
        use chrono::Duration;

        fn review(id: &str, created_at: DateTime<Utc>) -> Review {
            NewReview {
                name: Some(format!("name {id}")),
                comment: Some(format!("comment {id}")),
                audio: None,
            }
            .into_review(id.into(), Some(created_at))
            .unwrap()
        }

        #[tokio::test]
        async fn test_unconfigured_gateway_fails() {
            log!("[TEST] Starting test_unconfigured_gateway_fails");
            let gateway = StorageGateway::new(StorageConfig::default());
            assert!(matches!(
                gateway.database().await,
                Err(StorageError::NotConfigured)
            ));
            assert!(!gateway.is_connected());
        }

        #[tokio::test]
        async fn test_gateway_reuses_connection() {
            log!("[TEST] Starting test_gateway_reuses_connection");
            let gateway = StorageGateway::new(StorageConfig::with_connection_string(IN_MEMORY));
            let first = gateway.database().await.unwrap();
            let second = gateway.database().await.unwrap();
            assert!(Arc::ptr_eq(&first, &second));
            assert!(gateway.is_connected());

            // Data written through one handle is visible through the other
            first.insert_review(&review("a", Utc::now())).await.unwrap();
            assert_eq!(second.list_reviews().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_concurrent_first_calls_share_one_connection() {
            log!("[TEST] Starting test_concurrent_first_calls_share_one_connection");
            let gateway = Arc::new(StorageGateway::new(StorageConfig::with_connection_string(
                IN_MEMORY,
            )));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let gateway = Arc::clone(&gateway);
                    tokio::spawn(async move { gateway.database().await.unwrap() })
                })
                .collect();

            let mut databases = Vec::new();
            for handle in handles {
                databases.push(handle.await.unwrap());
            }
            assert!(databases.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        }

        #[tokio::test]
        async fn test_schema_creation() {
            log!("[TEST] Starting test_schema_creation");
            let db = Database::open(IN_MEMORY, "morai").unwrap();
            db.create_schema().await.unwrap();
            // Idempotent
            db.create_schema().await.unwrap();

            let conn = db.conn.lock().await;
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table'")
                .unwrap();
            let tables: Vec<String> = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
            assert!(tables.contains(&"reviews".to_string()));
        }

        #[tokio::test]
        async fn test_list_orders_newest_first() {
            log!("[TEST] Starting test_list_orders_newest_first");
            let db = Database::open(IN_MEMORY, "morai").unwrap();
            db.create_schema().await.unwrap();

            let now = Utc::now();
            db.insert_review(&review("old", now - Duration::minutes(5))).await.unwrap();
            db.insert_review(&review("new", now)).await.unwrap();
            db.insert_review(&review("middle", now - Duration::minutes(1))).await.unwrap();
            // Same timestamp as "new" but inserted later
            db.insert_review(&review("tie", now)).await.unwrap();

            let ids: Vec<String> = db
                .list_reviews()
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.id)
                .collect();
            assert_eq!(ids, vec!["tie", "new", "middle", "old"]);
        }

        #[tokio::test]
        async fn test_round_trip_keeps_fields() {
            log!("[TEST] Starting test_round_trip_keeps_fields");
            let db = Database::open(IN_MEMORY, "morai").unwrap();
            db.create_schema().await.unwrap();

            let mut stored = review("clip", Utc::now());
            stored.audio = Some("data:audio/webm;base64,GkXfo59ChoEBQveBAULygQRC".into());
            db.insert_review(&stored).await.unwrap();

            let listed = db.list_reviews().await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].audio, stored.audio);
            assert_eq!(listed[0].name, stored.name);
            // Microsecond precision survives the round trip
            assert_eq!(
                listed[0].created_at.map(|t| t.timestamp_micros()),
                stored.created_at.map(|t| t.timestamp_micros())
            );
        }

        #[tokio::test]
        async fn test_delete_reports_removed_count() {
            log!("[TEST] Starting test_delete_reports_removed_count");
            let db = Database::open(IN_MEMORY, "morai").unwrap();
            db.create_schema().await.unwrap();
            db.insert_review(&review("a", Utc::now())).await.unwrap();
            db.insert_review(&review("b", Utc::now())).await.unwrap();

            assert_eq!(db.delete_review("a").await.unwrap(), 1);
            assert_eq!(db.delete_review("a").await.unwrap(), 0);
            let remaining = db.list_reviews().await.unwrap();
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].id, "b");
        }
    }

    /// Connection to the review database.
    #[derive(Debug)]
    pub struct Database {
        conn: Arc<Mutex<Connection>>,
    }

    impl Database {
        /// Opens `<location>/<name>.db`, or a private in-memory database when
        /// `location` is `:memory:`.
        pub fn open(location: &str, name: &str) -> Result<Self, StorageError> {
            let conn = if location == IN_MEMORY {
                Connection::open_in_memory()?
            } else {
                std::fs::create_dir_all(location)?;
                let path = Path::new(location).join(format!("{name}.db"));
                Connection::open(&path)?
            };
            log!("[DB] Database connection established at: {}/{}", location, name);
            Ok(Database {
                conn: Arc::new(Mutex::new(conn)),
            })
        }

        pub async fn create_schema(&self) -> Result<(), StorageError> {
            let conn = self.conn.lock().await;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS reviews (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    comment TEXT NOT NULL,
                    audio TEXT,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS reviews_created_at ON reviews (created_at);",
            )
            .map_err(|e| {
                log!("[DB] Failed creating reviews table: {}", e);
                e
            })?;
            Ok(())
        }

        pub async fn insert_review(&self, review: &Review) -> Result<(), StorageError> {
            let created_at = review.created_at.unwrap_or_else(Utc::now);
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO reviews (id, name, comment, audio, created_at)
                VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    &review.id,
                    &review.name,
                    &review.comment,
                    &review.audio,
                    created_at.timestamp_micros()
                ],
            )?;
            log!("[DB] Review inserted: {}", review.id);
            Ok(())
        }

        // Newest first; rowid breaks ties between equal timestamps
        pub async fn list_reviews(&self) -> Result<Vec<Review>, StorageError> {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(
                "SELECT id, name, comment, audio, created_at
                FROM reviews
                ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?;

            let mut reviews = Vec::new();
            for row in rows {
                let (id, name, comment, audio, micros) = row?;
                let created_at = DateTime::<Utc>::from_timestamp_micros(micros)
                    .ok_or(StorageError::InvalidTimestamp(micros))?;
                reviews.push(Review {
                    id,
                    name,
                    comment,
                    audio,
                    created_at: Some(created_at),
                });
            }
            log!("[DB] Fetched {} reviews from the database", reviews.len());
            Ok(reviews)
        }

        /// Returns how many reviews were removed (0 or 1).
        pub async fn delete_review(&self, id: &str) -> Result<usize, StorageError> {
            let conn = self.conn.lock().await;
            let removed = conn.execute("DELETE FROM reviews WHERE id = ?", [id])?;
            log!("[DB] Delete {} removed {} review(s)", id, removed);
            Ok(removed)
        }
    }

    /// Lazily established, shared handle to the review database.
    #[derive(Debug)]
    pub struct StorageGateway {
        config: StorageConfig,
        database: OnceCell<Arc<Database>>,
    }

    impl StorageGateway {
        pub fn new(config: StorageConfig) -> Self {
            Self {
                config,
                database: OnceCell::new(),
            }
        }

        pub fn is_connected(&self) -> bool {
            self.database.initialized()
        }

        /// Returns the shared database, connecting on first use. Concurrent
        /// first callers wait on the same establishment. A failed attempt is not
        /// remembered, so the next call tries again.
        pub async fn database(&self) -> Result<Arc<Database>, StorageError> {
            let location = self
                .config
                .connection_string
                .as_deref()
                .ok_or(StorageError::NotConfigured)?;

            let database = self
                .database
                .get_or_try_init(|| async {
                    log!("[DB] Connecting to review database");
                    let database = Database::open(location, &self.config.database_name)?;
                    database.create_schema().await?;
                    Ok::<_, StorageError>(Arc::new(database))
                })
                .await?;
            Ok(Arc::clone(database))
        }
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::{Database, StorageGateway, IN_MEMORY};
