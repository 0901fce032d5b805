//! PostgreSQL-backed [`CourseStore`]

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repos::{ContentRepo, CourseRepo, HashtagRepo, MemberRepo, ReviewRepo};
use super::{create_pool_with_options, migrations};
use crate::models::{
    Content, Course, CourseDetail, CourseFilter, CoursePatch, HashtagTag, MemberKind, NewContent,
    NewCourse, NewReview, Paginated, Pagination, Review, ReviewOutcome,
};
use crate::store::{CourseStore, StoreError};

/// Course store over a connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = create_pool_with_options(database_url, max_connections).await?;
        migrations::run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CourseStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course, StoreError> {
        let created = CourseRepo::new(&self.pool).create(&course).await?;
        tracing::debug!(course_id = %created.id, "course inserted");
        Ok(created)
    }

    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, StoreError> {
        CourseRepo::new(&self.pool).get(id).await
    }

    async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: Pagination,
    ) -> Result<Paginated<Course>, StoreError> {
        CourseRepo::new(&self.pool).list(filter, page).await
    }

    async fn replace_course(&self, id: Uuid, course: NewCourse) -> Result<Course, StoreError> {
        CourseRepo::new(&self.pool).replace(id, &course).await
    }

    async fn patch_course(&self, id: Uuid, patch: CoursePatch) -> Result<Course, StoreError> {
        CourseRepo::new(&self.pool).patch(id, &patch).await
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError> {
        CourseRepo::new(&self.pool).delete(id).await
    }

    async fn list_members(
        &self,
        course_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Uuid>, StoreError> {
        MemberRepo::new(&self.pool).list(course_id, kind).await
    }

    async fn add_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        MemberRepo::new(&self.pool).add(course_id, kind, user_id).await
    }

    async fn remove_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        MemberRepo::new(&self.pool)
            .remove(course_id, kind, user_id)
            .await
    }

    async fn courses_for_user(
        &self,
        user_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Course>, StoreError> {
        MemberRepo::new(&self.pool)
            .courses_for_user(user_id, kind)
            .await
    }

    async fn list_hashtags(&self, course_id: Uuid) -> Result<Vec<String>, StoreError> {
        HashtagRepo::new(&self.pool).list(course_id).await
    }

    async fn add_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        HashtagRepo::new(&self.pool).add(course_id, tag).await
    }

    async fn remove_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        HashtagRepo::new(&self.pool).remove(course_id, tag).await
    }

    async fn list_content(&self, course_id: Uuid) -> Result<Vec<Content>, StoreError> {
        super::repos::ensure_course(&self.pool, course_id).await?;
        ContentRepo::new(&self.pool).list(course_id).await
    }

    async fn add_content(
        &self,
        course_id: Uuid,
        content: NewContent,
    ) -> Result<Content, StoreError> {
        ContentRepo::new(&self.pool).add(course_id, &content).await
    }

    async fn remove_content(&self, course_id: Uuid, content_id: i64) -> Result<(), StoreError> {
        ContentRepo::new(&self.pool)
            .remove(course_id, content_id)
            .await
    }

    async fn list_reviews(&self, course_id: Uuid) -> Result<Vec<Review>, StoreError> {
        super::repos::ensure_course(&self.pool, course_id).await?;
        ReviewRepo::new(&self.pool).list(course_id).await
    }

    async fn upsert_review(
        &self,
        course_id: Uuid,
        review: NewReview,
    ) -> Result<ReviewOutcome, StoreError> {
        ReviewRepo::new(&self.pool).upsert(course_id, &review).await
    }

    async fn delete_review(&self, course_id: Uuid, user_id: Uuid) -> Result<f64, StoreError> {
        ReviewRepo::new(&self.pool).delete(course_id, user_id).await
    }
}
