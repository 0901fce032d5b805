//! Course reviews and the derived course rating

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{NewReview, Rating, Review, ReviewText};

/// Review write request; one review per user and course
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub user_id: String,
    pub rating: i32,
    pub description: Option<String>,
}

impl ReviewRequest {
    fn into_review(self) -> Result<NewReview, ApiError> {
        Ok(NewReview {
            user_id: parse_uuid("user_id", &self.user_id)?,
            rating: Rating::new(self.rating)?,
            description: match self.description.as_deref() {
                Some(text) => ReviewText::new(text)?,
                None => ReviewText::default(),
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub description: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            rating: r.rating,
            description: r.description,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Stored review together with the recomputed course rating
#[derive(Debug, Serialize)]
pub struct ReviewWriteResponse {
    pub review: ReviewResponse,
    pub course_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct ReviewDeleteResponse {
    pub message: String,
    pub course_rating: f64,
}

/// GET /courses/{id}/review
async fn list_reviews(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = state.store.list_reviews(course_id).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// POST /courses/{id}/review - 201 for a new review, 200 when the
/// user's previous review was overwritten
async fn upsert_review(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
    ValidJson(req): ValidJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewWriteResponse>), ApiError> {
    let review = req.into_review()?;
    let outcome = state.store.upsert_review(course_id, review).await?;

    tracing::info!(
        course_id = %course_id,
        user_id = %outcome.review.user_id,
        created = outcome.created,
        course_rating = outcome.course_rating,
        "review stored"
    );

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(ReviewWriteResponse {
            review: ReviewResponse::from(outcome.review),
            course_rating: outcome.course_rating,
        }),
    ))
}

/// DELETE /courses/{id}/review/{user_id}
async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path((course_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ReviewDeleteResponse>), ApiError> {
    let course_id = parse_uuid("id", &course_id)?;
    let user_id = parse_uuid("user_id", &user_id)?;
    let course_rating = state.store.delete_review(course_id, user_id).await?;

    tracing::info!(course_id = %course_id, user_id = %user_id, course_rating, "review deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(ReviewDeleteResponse {
            message: format!("review by {user_id} removed from course {course_id}"),
            course_rating,
        }),
    ))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses/{id}/review", get(list_reviews).post(upsert_review))
        .route("/courses/{id}/review/{user_id}", delete(delete_review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    fn request(rating: i32, description: Option<&str>) -> ReviewRequest {
        ReviewRequest {
            user_id: Uuid::new_v4().to_string(),
            rating,
            description: description.map(str::to_owned),
        }
    }

    #[test]
    fn missing_description_is_empty() {
        let review = request(4, None).into_review().unwrap();
        assert_eq!(review.rating.get(), 4);
        assert_eq!(review.description.as_str(), "");
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        for rating in [0, 6] {
            let err = request(rating, Some("meh")).into_review().unwrap_err();
            assert!(matches!(
                err,
                ApiError::Validation(ValidationError::OutOfRange { field: "rating", .. })
            ));
        }
    }

    #[test]
    fn long_description_is_rejected() {
        let text = "x".repeat(501);
        assert!(request(5, Some(&text)).into_review().is_err());
    }
}
