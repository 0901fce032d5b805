//! Content items of a course

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use super::StatusMessage;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Content, NewContent, ValidationError};

#[derive(Debug, Deserialize)]
pub struct AddContentRequest {
    pub name: String,
    pub link: String,
}

/// GET /courses/{id}/content
async fn list_content(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
) -> Result<Json<Vec<Content>>, ApiError> {
    let items = state.store.list_content(course_id).await?;
    Ok(Json(items))
}

/// POST /courses/{id}/content
async fn add_content(
    State(state): State<Arc<AppState>>,
    ValidUuid(course_id): ValidUuid,
    ValidJson(req): ValidJson<AddContentRequest>,
) -> Result<(StatusCode, Json<Content>), ApiError> {
    let content = NewContent::new(&req.name, &req.link)?;
    let created = state.store.add_content(course_id, content).await?;

    tracing::info!(course_id = %course_id, content_id = created.id, "content added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /courses/{id}/content/{content_id}
async fn remove_content(
    State(state): State<Arc<AppState>>,
    Path((course_id, content_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let course_id = parse_uuid("id", &course_id)?;
    let content_id: i64 = content_id.trim().parse().map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "content_id",
            reason: "expected an integer",
        })
    })?;
    state.store.remove_content(course_id, content_id).await?;

    tracing::info!(course_id = %course_id, content_id, "content removed");
    Ok((
        StatusCode::ACCEPTED,
        Json(StatusMessage::new(format!(
            "content {content_id} removed from course {course_id}"
        ))),
    ))
}

/// Content routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses/{id}/content", get(list_content).post(add_content))
        .route("/courses/{id}/content/{content_id}", delete(remove_content))
}
