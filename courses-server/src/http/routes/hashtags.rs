//! Hashtags attached to a course

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StatusMessage;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::HashtagTag;

#[derive(Debug, Deserialize)]
pub struct AddHashtagRequest {
    pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct HashtagResponse {
    pub course_id: Uuid,
    pub tag: String,
}

/// GET /courses/{id}/hashtags
async fn list_hashtags(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
) -> Result<Json<Vec<String>>, ApiError> {
    let tags = state.store.list_hashtags(course_id).await?;
    Ok(Json(tags))
}

/// POST /courses/{id}/hashtags
async fn add_hashtag(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
    ValidJson(req): ValidJson<AddHashtagRequest>,
) -> Result<(StatusCode, Json<HashtagResponse>), ApiError> {
    let tag = HashtagTag::new(&req.tag)?;
    state.store.add_hashtag(course_id, &tag).await?;

    tracing::info!(course_id = %course_id, tag = tag.as_str(), "hashtag added");
    Ok((
        StatusCode::CREATED,
        Json(HashtagResponse {
            course_id,
            tag: tag.into_string(),
        }),
    ))
}

/// DELETE /courses/{id}/hashtags/{tag}
async fn remove_hashtag(
    State(state): State<Arc<AppState>>,
    Path((course_id, tag)): Path<(String, String)>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let course_id = parse_uuid("id", &course_id)?;
    let tag = HashtagTag::new(&tag)?;
    state.store.remove_hashtag(course_id, &tag).await?;

    tracing::info!(course_id = %course_id, tag = tag.as_str(), "hashtag removed");
    Ok((
        StatusCode::ACCEPTED,
        Json(StatusMessage::new(format!(
            "hashtag #{} removed from course {course_id}",
            tag.as_str()
        ))),
    ))
}

/// Hashtag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/courses/{id}/hashtags",
            get(list_hashtags).post(add_hashtag),
        )
        .route("/courses/{id}/hashtags/{tag}", delete(remove_hashtag))
}
