use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use leptos::logging::log;
use serde::Serialize;
use serde_json::json;

use crate::error::ReviewError;
use crate::models::review::{NewReview, ReviewSummary};
use crate::store::ReviewStore;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(message: impl ToString) -> ErrorBody {
    ErrorBody {
        error: message.to_string(),
    }
}

/// Registers the review endpoints. Expects a `web::Data<dyn ReviewStore>` and
/// the [`json_config`] in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reviews", web::get().to(list_reviews))
        .route("/reviews", web::post().to(create_review))
        .route("/reviews/{id}", web::delete().to(delete_review));
}

/// JSON extractor settings: a body limit large enough for inline audio, and
/// errors reported in the same `{error}` shape as the handlers use.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            log!("[API] Rejected request body: {}", err);
            let response = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    HttpResponse::PayloadTooLarge().json(error_body(&err))
                }
                _ => HttpResponse::BadRequest().json(error_body(&err)),
            };
            InternalError::from_response(err, response).into()
        })
}

pub async fn list_reviews(store: web::Data<dyn ReviewStore>) -> HttpResponse {
    match store.list().await {
        Ok(reviews) => {
            log!("[API] Returning {} reviews", reviews.len());
            let body: Vec<ReviewSummary> = reviews.into_iter().map(ReviewSummary::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(err) => {
            log!("[API ERROR] Failed to fetch reviews: {:?}", err);
            HttpResponse::InternalServerError().json(error_body(err))
        }
    }
}

pub async fn create_review(
    store: web::Data<dyn ReviewStore>,
    request: web::Json<NewReview>,
) -> HttpResponse {
    let new_review = request.into_inner();
    if let Err(err) = new_review.validate() {
        log!("[API] Rejected review: {}", err);
        return HttpResponse::BadRequest().json(error_body(err));
    }

    match store.create(new_review).await {
        Ok(review) => {
            log!("[API] Saved review ID: {}", review.id);
            HttpResponse::Created().json(review)
        }
        Err(ReviewError::Validation(err)) => HttpResponse::BadRequest().json(error_body(err)),
        Err(err) => {
            log!("[API ERROR] Failed to save review: {:?}", err);
            HttpResponse::InternalServerError().json(error_body(err))
        }
    }
}

pub async fn delete_review(
    store: web::Data<dyn ReviewStore>,
    id: web::Path<String>,
) -> HttpResponse {
    let id = id.into_inner();
    match store.delete(&id).await {
        Ok(()) => {
            log!("[API] Deleted review ID: {}", id);
            HttpResponse::Ok().json(json!({ "ok": true }))
        }
        Err(ReviewError::NotFound(_)) => HttpResponse::NotFound().json(error_body("not found")),
        Err(err) => {
            log!("[API ERROR] Failed to delete review {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body(err))
        }
    }
}
