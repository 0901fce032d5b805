//! Storage seam between the HTTP layer and persistence
//!
//! Handlers receive an `Arc<dyn CourseStore>` through application state.
//! [`crate::db::PgStore`] is the PostgreSQL implementation and
//! [`MemoryStore`] keeps everything in process.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Content, Course, CourseDetail, CourseFilter, CoursePatch, HashtagTag, MemberKind, NewContent,
    NewCourse, NewReview, Paginated, Pagination, Review, ReviewOutcome,
};

pub use memory::MemoryStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(resource: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            resource,
            id: id.to_string(),
        }
    }
}

/// Course persistence operations
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Backend name reported by the health check
    fn backend(&self) -> &'static str;

    /// Round trip to the backing storage.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_course(&self, course: NewCourse) -> Result<Course, StoreError>;

    /// Course with students, collaborators, favorites, hashtags, content and reviews.
    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, StoreError>;

    /// Filtered listing in insertion order.
    async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: Pagination,
    ) -> Result<Paginated<Course>, StoreError>;

    /// Overwrite every editable field; id, creation time, associations
    /// and rating are kept.
    async fn replace_course(&self, id: Uuid, course: NewCourse) -> Result<Course, StoreError>;

    async fn patch_course(&self, id: Uuid, patch: CoursePatch) -> Result<Course, StoreError>;

    /// Delete a course together with its links, content and reviews.
    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_members(&self, course_id: Uuid, kind: MemberKind)
        -> Result<Vec<Uuid>, StoreError>;

    /// Link a user to a course, creating the user record on first use.
    /// Linking twice is a conflict.
    async fn add_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError>;

    async fn remove_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError>;

    /// Courses a user is linked to under `kind`.
    async fn courses_for_user(
        &self,
        user_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Course>, StoreError>;

    async fn list_hashtags(&self, course_id: Uuid) -> Result<Vec<String>, StoreError>;

    async fn add_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError>;

    async fn remove_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError>;

    async fn list_content(&self, course_id: Uuid) -> Result<Vec<Content>, StoreError>;

    async fn add_content(&self, course_id: Uuid, content: NewContent)
        -> Result<Content, StoreError>;

    async fn remove_content(&self, course_id: Uuid, content_id: i64) -> Result<(), StoreError>;

    async fn list_reviews(&self, course_id: Uuid) -> Result<Vec<Review>, StoreError>;

    /// Insert or overwrite the user's review, then recompute the course rating.
    async fn upsert_review(
        &self,
        course_id: Uuid,
        review: NewReview,
    ) -> Result<ReviewOutcome, StoreError>;

    /// Remove the user's review and return the recomputed course rating.
    async fn delete_review(&self, course_id: Uuid, user_id: Uuid) -> Result<f64, StoreError>;
}
