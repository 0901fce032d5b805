//! Course endpoints: CRUD and the filtered listing

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reviews::ReviewResponse;
use super::StatusMessage;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_uuid, ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{
    validate_latitude, validate_longitude, validate_sub_level, Content, Course, CourseDetail,
    CourseFilter, CourseName, CoursePatch, HashtagTag, MemberKind, NewCourse, Pagination,
    ValidationError,
};

fn default_true() -> bool {
    true
}

/// Editable course fields, as sent on create and full replace
#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: Uuid,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default = "default_true")]
    pub in_edition: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub sub_level: i32,
    pub category: Option<String>,
}

impl CourseRequest {
    pub fn into_new_course(self) -> Result<NewCourse, ValidationError> {
        let mut course = NewCourse::new(CourseName::new(&self.name)?, self.owner_id);
        course.description = self.description;
        course.blocked = self.blocked;
        course.in_edition = self.in_edition;
        course.latitude = self.latitude.map(validate_latitude).transpose()?;
        course.longitude = self.longitude.map(validate_longitude).transpose()?;
        course.sub_level = validate_sub_level(self.sub_level)?;
        course.category = non_empty(self.category);
        Ok(course)
    }
}

/// Create request: course fields plus initial associations
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(flatten)]
    pub course: CourseRequest,
    #[serde(default)]
    pub students: Vec<Uuid>,
    #[serde(default)]
    pub collaborators: Vec<Uuid>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Partial update; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
pub struct PatchCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub blocked: Option<bool>,
    pub in_edition: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sub_level: Option<i32>,
    pub category: Option<String>,
}

impl TryFrom<PatchCourseRequest> for CoursePatch {
    type Error = ValidationError;

    fn try_from(req: PatchCourseRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name.as_deref().map(CourseName::new).transpose()?,
            description: req.description,
            owner_id: req.owner_id,
            blocked: req.blocked,
            in_edition: req.in_edition,
            latitude: req.latitude.map(validate_latitude).transpose()?,
            longitude: req.longitude.map(validate_longitude).transpose()?,
            sub_level: req.sub_level.map(validate_sub_level).transpose()?,
            category: non_empty(req.category),
        })
    }
}

/// Course summary response
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: String,
    pub blocked: bool,
    pub in_edition: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sub_level: i32,
    pub category: Option<String>,
    pub rating: f64,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            owner_id: c.owner_id,
            created_at: c.created_at.to_rfc3339(),
            blocked: c.blocked,
            in_edition: c.in_edition,
            latitude: c.latitude,
            longitude: c.longitude,
            sub_level: c.sub_level,
            category: c.category,
            rating: c.rating,
        }
    }
}

/// Course with every association
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub students: Vec<Uuid>,
    pub collaborators: Vec<Uuid>,
    pub favorited_by: Vec<Uuid>,
    pub hashtags: Vec<String>,
    pub content: Vec<Content>,
    pub reviews: Vec<ReviewResponse>,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(d: CourseDetail) -> Self {
        Self {
            course: CourseResponse::from(d.course),
            students: d.students,
            collaborators: d.collaborators,
            favorited_by: d.favorited_by,
            hashtags: d.hashtags,
            content: d.content,
            reviews: d.reviews.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}

/// One page of the listing
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
    pub num_pages: u32,
    pub page: u32,
    pub total: i64,
}

/// Listing query string, kept as raw strings so that empty values count
/// as absent and parse failures carry the parameter name.
#[derive(Debug, Default, Deserialize)]
pub struct CourseListParams {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub sub_level: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub student: Option<String>,
    pub collaborator: Option<String>,
    #[serde(alias = "hashtags")]
    pub hashtag: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
    pub category: Option<String>,
    pub page_num: Option<String>,
}

impl CourseListParams {
    pub fn into_query(self) -> Result<(CourseFilter, Pagination), ApiError> {
        let uuid = |field: &'static str, value: Option<String>| {
            non_empty(value)
                .map(|v| parse_uuid(field, &v))
                .transpose()
        };

        let filter = CourseFilter {
            name: non_empty(self.name),
            owner: uuid("owner", self.owner)?,
            sub_level: parse_number("sub_level", self.sub_level)?,
            latitude: parse_number("latitude", self.latitude)?,
            longitude: parse_number("longitude", self.longitude)?,
            student: uuid("student", self.student)?,
            collaborator: uuid("collaborator", self.collaborator)?,
            hashtag: non_empty(self.hashtag)
                .map(|t| HashtagTag::new(&t))
                .transpose()?,
            min_rating: parse_number("minRating", self.min_rating)?,
            category: non_empty(self.category),
        };

        // Pages start at 1; anything lower is clamped
        let page = parse_number::<i64>("page_num", self.page_num)?
            .unwrap_or(1)
            .clamp(1, i64::from(u32::MAX)) as u32;

        Ok((filter, Pagination::new(page)))
    }
}

fn parse_number<T: FromStr>(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ApiError> {
    non_empty(value)
        .map(|v| {
            v.parse::<T>().map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field,
                    reason: "expected a number",
                })
            })
        })
        .transpose()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// GET /courses - filtered, paginated listing
async fn list_courses(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<CourseListParams>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let (filter, page) = params.into_query()?;
    let result = state.store.list_courses(&filter, page).await?;

    Ok(Json(CourseListResponse {
        num_pages: result.num_pages(),
        page: result.page,
        total: result.total,
        courses: result.items.into_iter().map(CourseResponse::from).collect(),
    }))
}

/// POST /courses - create a course with its initial students,
/// collaborators and hashtags
async fn create_course(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseDetailResponse>), ApiError> {
    let CreateCourseRequest {
        course,
        students,
        collaborators,
        hashtags,
    } = req;

    // Validate everything before the first write
    let new = course.into_new_course()?;
    let tags = hashtags
        .iter()
        .map(|t| HashtagTag::new(t))
        .collect::<Result<BTreeSet<_>, _>>()?;

    let created = state.store.create_course(new).await?;
    let id = created.id;

    let members = [
        (MemberKind::Student, students),
        (MemberKind::Collaborator, collaborators),
    ];
    for (kind, users) in members {
        for user_id in users.into_iter().collect::<BTreeSet<_>>() {
            state.store.add_member(id, kind, user_id).await?;
        }
    }
    for tag in &tags {
        state.store.add_hashtag(id, tag).await?;
    }

    tracing::info!(course_id = %id, "course created");
    let detail = state.store.get_course(id).await?;
    Ok((StatusCode::CREATED, Json(CourseDetailResponse::from(detail))))
}

/// GET /courses/{id}
async fn get_course(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = state.store.get_course(id).await?;
    Ok(Json(CourseDetailResponse::from(detail)))
}

/// PUT /courses/{id} - overwrite every editable field
async fn replace_course(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<CourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = req.into_new_course()?;
    let updated = state.store.replace_course(id, course).await?;

    tracing::info!(course_id = %id, "course replaced");
    Ok(Json(CourseResponse::from(updated)))
}

/// PATCH /courses/{id}
async fn patch_course(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<PatchCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let patch = CoursePatch::try_from(req)?;
    let updated = state.store.patch_course(id, patch).await?;

    tracing::info!(course_id = %id, "course patched");
    Ok(Json(CourseResponse::from(updated)))
}

/// DELETE /courses/{id}
async fn delete_course(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    state.store.delete_course(id).await?;

    tracing::info!(course_id = %id, "course deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(StatusMessage::new(format!("course {id} deleted"))),
    ))
}

/// Course routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course)
                .put(replace_course)
                .patch(patch_course)
                .delete(delete_course),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CourseRequest {
        CourseRequest {
            name: name.into(),
            description: String::new(),
            owner_id: Uuid::nil(),
            blocked: false,
            in_edition: true,
            latitude: None,
            longitude: None,
            sub_level: 0,
            category: None,
        }
    }

    #[test]
    fn create_request_defaults() {
        let json = r#"{"name": "Guitar", "owner_id": "00000000-0000-0000-0000-000000000000"}"#;
        let req: CreateCourseRequest = serde_json::from_str(json).unwrap();
        assert!(req.course.in_edition);
        assert!(!req.course.blocked);
        assert_eq!(req.course.sub_level, 0);
        assert!(req.students.is_empty());
        assert!(req.hashtags.is_empty());
    }

    #[test]
    fn course_request_validates_fields() {
        assert!(request("  ").into_new_course().is_err());

        let mut bad_lat = request("ok");
        bad_lat.latitude = Some(91.0);
        assert!(matches!(
            bad_lat.into_new_course().unwrap_err(),
            ValidationError::OutOfRange { field: "latitude", .. }
        ));

        let mut negative = request("ok");
        negative.sub_level = -1;
        assert!(negative.into_new_course().is_err());

        let mut blank_category = request("ok");
        blank_category.category = Some("  ".into());
        assert_eq!(blank_category.into_new_course().unwrap().category, None);
    }

    #[test]
    fn patch_request_validates_present_fields() {
        let patch = CoursePatch::try_from(PatchCourseRequest {
            sub_level: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.sub_level, Some(2));
        assert!(patch.name.is_none());

        let bad = CoursePatch::try_from(PatchCourseRequest {
            name: Some(String::new()),
            ..Default::default()
        });
        assert!(bad.is_err());
    }

    #[test]
    fn list_params_build_filter() {
        let student = Uuid::new_v4();
        let params = CourseListParams {
            name: Some("guitar".into()),
            student: Some(student.to_string()),
            hashtag: Some("#Music".into()),
            category: Some(String::new()),
            page_num: Some("0".into()),
            ..Default::default()
        };
        let (filter, page) = params.into_query().unwrap();

        assert_eq!(filter.name.as_deref(), Some("guitar"));
        assert_eq!(filter.student, Some(student));
        assert_eq!(filter.hashtag.unwrap().as_str(), "music");
        assert_eq!(filter.category, None);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn list_params_reject_bad_uuid() {
        let params = CourseListParams {
            owner: Some("not-a-uuid".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn list_params_accept_camel_case_rating_and_alias() {
        let params: CourseListParams =
            serde_json::from_str(r#"{"minRating": "3.5", "hashtags": "rust"}"#).unwrap();
        let (filter, _) = params.into_query().unwrap();
        assert_eq!(filter.min_rating, Some(3.5));
        assert_eq!(filter.hashtag.unwrap().as_str(), "rust");
    }

    #[test]
    fn negative_page_is_clamped() {
        let params = CourseListParams {
            page_num: Some("-1".into()),
            ..Default::default()
        };
        let (_, page) = params.into_query().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn empty_numbers_are_absent() {
        let params = CourseListParams {
            sub_level: Some(String::new()),
            latitude: Some(" ".into()),
            min_rating: Some(String::new()),
            page_num: Some(String::new()),
            ..Default::default()
        };
        let (filter, page) = params.into_query().unwrap();
        assert_eq!(filter, CourseFilter::default());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn non_numeric_values_name_the_parameter() {
        let params = CourseListParams {
            sub_level: Some("two".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query().unwrap_err(),
            ApiError::Validation(ValidationError::InvalidFormat { field: "sub_level", .. })
        ));
    }

    #[test]
    fn patch_blank_category_is_none() {
        let patch = CoursePatch::try_from(PatchCourseRequest {
            category: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.category, None);
    }
}
