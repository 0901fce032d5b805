//! Student, collaborator and favorite collections under a course
//!
//! The three collections share handlers; each gets its own router with
//! the [`MemberKind`] attached as a request extension.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StatusMessage;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::MemberKind;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

/// Created link
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub kind: MemberKind,
}

/// GET /courses/{id}/{collection}
async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<MemberKind>,
    ValidUuid(course_id): ValidUuid,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let members = state.store.list_members(course_id, kind).await?;
    Ok(Json(members))
}

/// POST /courses/{id}/{collection}
async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<MemberKind>,
    ValidUuid(course_id): ValidUuid,
    ValidJson(req): ValidJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let user_id = parse_uuid("user_id", &req.user_id)?;
    state.store.add_member(course_id, kind, user_id).await?;

    tracing::info!(
        course_id = %course_id,
        user_id = %user_id,
        kind = kind.as_str(),
        "member added"
    );
    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            course_id,
            user_id,
            kind,
        }),
    ))
}

/// DELETE /courses/{id}/{collection}/{user_id}
async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<MemberKind>,
    Path((course_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let course_id = parse_uuid("id", &course_id)?;
    let user_id = parse_uuid("user_id", &user_id)?;
    state.store.remove_member(course_id, kind, user_id).await?;

    tracing::info!(
        course_id = %course_id,
        user_id = %user_id,
        kind = kind.as_str(),
        "member removed"
    );
    Ok((
        StatusCode::ACCEPTED,
        Json(StatusMessage::new(format!(
            "{} {user_id} removed from course {course_id}",
            kind.as_str()
        ))),
    ))
}

fn kind_router(kind: MemberKind) -> Router<Arc<AppState>> {
    let collection = format!("/courses/{{id}}/{}", kind.collection());
    let item = format!("{collection}/{{user_id}}");

    Router::new()
        .route(&collection, get(list_members).post(add_member))
        .route(&item, delete(remove_member))
        .layer(Extension(kind))
}

/// Member routes for every [`MemberKind`]
pub fn router() -> Router<Arc<AppState>> {
    MemberKind::all()
        .iter()
        .fold(Router::new(), |router, kind| router.merge(kind_router(*kind)))
}
