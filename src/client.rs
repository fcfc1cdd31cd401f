//! Browser-side calls to the review API.
use gloo_net::http::{Request, Response};
use leptos::logging::log;
use serde::Deserialize;

use crate::error::ClientError;
use crate::models::review::{NewReview, Review, ReviewSummary};

const REVIEWS_ENDPOINT: &str = "/api/reviews";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn check(response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => response.status_text(),
    };
    log!("[CLIENT] Request failed with {}: {}", status, message);
    Err(ClientError::Status { status, message })
}

pub async fn fetch_reviews() -> Result<Vec<ReviewSummary>, ClientError> {
    let response = check(Request::get(REVIEWS_ENDPOINT).send().await?).await?;
    Ok(response.json().await?)
}

pub async fn submit_review(new_review: &NewReview) -> Result<Review, ClientError> {
    let response = check(Request::post(REVIEWS_ENDPOINT).json(new_review)?.send().await?).await?;
    Ok(response.json().await?)
}

pub async fn remove_review(id: &str) -> Result<(), ClientError> {
    let url = format!("{}/{}", REVIEWS_ENDPOINT, urlencoding::encode(id));
    check(Request::delete(&url).send().await?).await?;
    Ok(())
}
