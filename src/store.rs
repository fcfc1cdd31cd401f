//! Review persistence.
//!
//! [`ReviewStore`] is implemented by the database-backed store, the in-memory
//! store, and [`FallbackReviewStore`], which tries the database first and
//! serves a call from memory when the database fails. [`from_config`] picks one
//! at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use leptos::logging::{log, warn};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{FallbackPolicy, StorageConfig};
use crate::db::StorageGateway;
use crate::error::ReviewError;
use crate::models::review::{NewReview, Review};

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// All reviews, newest first.
    async fn list(&self) -> Result<Vec<Review>, ReviewError>;

    /// Validates and stores a new review, returning it with its assigned id.
    async fn create(&self, new_review: NewReview) -> Result<Review, ReviewError>;

    async fn delete(&self, id: &str) -> Result<(), ReviewError>;

    /// Short label for logs.
    fn backend(&self) -> &'static str;
}

/// Builds the store the application runs on.
pub fn from_config(config: &StorageConfig) -> Arc<dyn ReviewStore> {
    let store: Arc<dyn ReviewStore> = match (&config.connection_string, config.fallback) {
        (None, _) => Arc::new(MemoryReviewStore::new()),
        (Some(_), FallbackPolicy::Memory) => Arc::new(FallbackReviewStore::new(
            Arc::new(DatabaseReviewStore::new(StorageGateway::new(config.clone()))),
            Arc::new(MemoryReviewStore::new()),
        )),
        (Some(_), FallbackPolicy::Fail) => Arc::new(DatabaseReviewStore::new(
            StorageGateway::new(config.clone()),
        )),
    };
    log!("[STORE] Using {} review store", store.backend());
    store
}

/// Reviews kept in the database reached through a [`StorageGateway`].
#[derive(Debug)]
pub struct DatabaseReviewStore {
    gateway: StorageGateway,
}

impl DatabaseReviewStore {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ReviewStore for DatabaseReviewStore {
    async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        let db = self.gateway.database().await?;
        Ok(db.list_reviews().await?)
    }

    async fn create(&self, new_review: NewReview) -> Result<Review, ReviewError> {
        new_review.validate()?;
        let db = self.gateway.database().await?;
        let review = new_review.into_review(Uuid::new_v4().to_string(), Some(Utc::now()))?;
        db.insert_review(&review).await?;
        Ok(review)
    }

    async fn delete(&self, id: &str) -> Result<(), ReviewError> {
        let db = self.gateway.database().await?;
        match db.delete_review(id).await? {
            0 => Err(ReviewError::NotFound(id.to_string())),
            _ => Ok(()),
        }
    }

    fn backend(&self) -> &'static str {
        "database"
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    // `None` until first used; a first `list` seeds the examples
    reviews: Option<Vec<Review>>,
    last_id: i64,
}

impl MemoryState {
    // Millisecond timestamp, bumped when the clock has not moved on
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }
}

/// Non-durable store held by the running process.
#[derive(Debug)]
pub struct MemoryReviewStore {
    state: Mutex<MemoryState>,
    seeded: bool,
}

impl Default for MemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReviewStore {
    /// A store that shows the two example reviews until something is created.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            seeded: true,
        }
    }

    /// A store that starts empty.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            seeded: false,
        }
    }

    fn seed(&self) -> Vec<Review> {
        if !self.seeded {
            return Vec::new();
        }
        vec![
            example_review(
                "1",
                "Alex Rivera",
                "The API latency is incredibly low. MORAI is the future!",
            ),
            example_review(
                "2",
                "Sarah Chen",
                "Amazing design and very easy to integrate.",
            ),
        ]
    }
}

fn example_review(id: &str, name: &str, comment: &str) -> Review {
    Review {
        id: id.to_string(),
        name: name.to_string(),
        comment: comment.to_string(),
        audio: None,
        created_at: None,
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        let mut state = self.state.lock().await;
        let reviews = state.reviews.get_or_insert_with(|| self.seed());
        Ok(reviews.clone())
    }

    async fn create(&self, new_review: NewReview) -> Result<Review, ReviewError> {
        new_review.validate()?;
        let mut state = self.state.lock().await;
        let review = new_review.into_review(state.next_id(), None)?;
        state
            .reviews
            .get_or_insert_with(Vec::new)
            .insert(0, review.clone());
        Ok(review)
    }

    // Unknown ids are not an error here
    async fn delete(&self, id: &str) -> Result<(), ReviewError> {
        let mut state = self.state.lock().await;
        if let Some(reviews) = state.reviews.as_mut() {
            reviews.retain(|review| review.id != id);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Tries `primary` on every call and answers from `fallback` when the primary
/// reports a storage failure. Nothing is remembered between calls.
pub struct FallbackReviewStore {
    primary: Arc<dyn ReviewStore>,
    fallback: Arc<MemoryReviewStore>,
}

impl FallbackReviewStore {
    pub fn new(primary: Arc<dyn ReviewStore>, fallback: Arc<MemoryReviewStore>) -> Self {
        Self { primary, fallback }
    }
}

fn storage_failed<T>(operation: &str, result: &Result<T, ReviewError>) -> bool {
    match result {
        Err(ReviewError::Storage(err)) => {
            warn!("[STORE] {} failed on primary store, using memory: {}", operation, err);
            true
        }
        _ => false,
    }
}

#[async_trait]
impl ReviewStore for FallbackReviewStore {
    async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        let result = self.primary.list().await;
        if storage_failed("list", &result) {
            return self.fallback.list().await;
        }
        result
    }

    async fn create(&self, new_review: NewReview) -> Result<Review, ReviewError> {
        new_review.validate()?;
        let result = self.primary.create(new_review.clone()).await;
        if storage_failed("create", &result) {
            return self.fallback.create(new_review).await;
        }
        result
    }

    async fn delete(&self, id: &str) -> Result<(), ReviewError> {
        let result = self.primary.delete(id).await;
        if storage_failed("delete", &result) {
            return self.fallback.delete(id).await;
        }
        result
    }

    fn backend(&self) -> &'static str {
        "database with memory fallback"
    }
}
