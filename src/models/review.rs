// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A stored review as returned by the create endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub audio: Option<String>, // opaque encoded clip, usually a data URL
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>, // only set by the database backend
}

/// The list/display shape. The timestamp is never exposed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub audio: Option<String>,
}

impl From<Review> for ReviewSummary {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            name: review.name,
            comment: review.comment,
            audio: review.audio,
        }
    }
}

/// Create request body. Every field is optional on the wire so a missing
/// field surfaces as a validation error rather than a decoding error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReview {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_missing(&self.name) {
            return Err(ValidationError::MissingField("name"));
        }
        if is_missing(&self.comment) {
            return Err(ValidationError::MissingField("comment"));
        }
        Ok(())
    }

    /// Builds the stored review once validation passed.
    pub fn into_review(
        self,
        id: String,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Review, ValidationError> {
        self.validate()?;
        Ok(Review {
            id,
            name: self.name.unwrap_or_default(),
            comment: self.comment.unwrap_or_default(),
            audio: self.audio,
            created_at,
        })
    }
}

fn is_missing(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// In-progress form state of the submission view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub name: String,
    pub comment: String,
    pub audio: Option<String>,
}

impl ReviewDraft {
    pub fn to_new_review(&self) -> NewReview {
        NewReview {
            name: Some(self.name.clone()),
            comment: Some(self.comment.clone()),
            audio: self.audio.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_review(name: Option<&str>, comment: Option<&str>) -> NewReview {
        NewReview {
            name: name.map(String::from),
            comment: comment.map(String::from),
            audio: None,
        }
    }

    #[test]
    fn test_validation_requires_name_and_comment() {
        assert!(new_review(Some("Alex"), Some("Great!")).validate().is_ok());
        assert_eq!(
            new_review(None, Some("no name")).validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            new_review(Some("Alex"), Some("")).validate(),
            Err(ValidationError::MissingField("comment"))
        );
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        assert!(new_review(Some("   "), Some("text")).validate().is_ok());
        assert!(new_review(Some("Alex"), Some(" ")).validate().is_ok());
    }

    #[test]
    fn test_validation_message_matches_api_contract() {
        let err = new_review(None, None).validate().unwrap_err();
        assert_eq!(err.to_string(), "name and comment required");
    }

    #[test]
    fn test_missing_fields_decode_as_none() {
        let parsed: NewReview = serde_json::from_str(r#"{"comment":"no name"}"#).unwrap();
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.comment.as_deref(), Some("no name"));
        assert_eq!(parsed.audio, None);
    }

    #[test]
    fn test_review_serializes_created_at_in_camel_case() {
        let review = Review {
            id: "abc".into(),
            name: "Alex".into(),
            comment: "Great!".into(),
            audio: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["createdAt"], "2026-01-02T03:04:05Z");
        assert!(value["audio"].is_null());

        let without_timestamp = Review {
            created_at: None,
            ..review
        };
        let value = serde_json::to_value(&without_timestamp).unwrap();
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_summary_drops_timestamp() {
        let review = new_review(Some("Alex"), Some("Great!"))
            .into_review("1".into(), Some(Utc::now()))
            .unwrap();
        let summary = ReviewSummary::from(review);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "1", "name": "Alex", "comment": "Great!", "audio": null})
        );
    }

    #[test]
    fn test_draft_clear_resets_everything() {
        let mut draft = ReviewDraft {
            name: "Alex".into(),
            comment: "Great!".into(),
            audio: Some("data:audio/webm;base64,AAAA".into()),
        };
        let request = draft.to_new_review();
        assert_eq!(request.audio.as_deref(), Some("data:audio/webm;base64,AAAA"));
        draft.clear();
        assert_eq!(draft, ReviewDraft::default());
    }
}
