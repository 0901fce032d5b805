//! Courses seen from a user's side

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::courses::CourseResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidQuery};
use crate::http::server::AppState;
use crate::models::MemberKind;

/// `?as=student|collaborator|favorite`, student when absent
#[derive(Debug, Default, Deserialize)]
pub struct UserCoursesParams {
    #[serde(rename = "as", default)]
    pub kind: MemberKind,
}

/// GET /users/{user_id}/courses
async fn user_courses(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidQuery(params): ValidQuery<UserCoursesParams>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let user_id = parse_uuid("user_id", &user_id)?;
    let courses = state.store.courses_for_user(user_id, params.kind).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{user_id}/courses", get(user_courses))
}
