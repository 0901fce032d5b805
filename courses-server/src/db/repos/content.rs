//! Course content repository

use sqlx::PgPool;
use uuid::Uuid;

use super::ensure_course;
use crate::models::{Content, NewContent};
use crate::store::StoreError;

/// Content repository
pub struct ContentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Content of a course in creation order (empty for unknown courses).
    pub async fn list(&self, course_id: Uuid) -> Result<Vec<Content>, StoreError> {
        let items = sqlx::query_as::<_, Content>(
            "SELECT id, name, link FROM content WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    pub async fn add(&self, course_id: Uuid, content: &NewContent) -> Result<Content, StoreError> {
        ensure_course(self.pool, course_id).await?;

        let created = sqlx::query_as::<_, Content>(
            r#"
            INSERT INTO content (course_id, name, link)
            VALUES ($1, $2, $3)
            RETURNING id, name, link
            "#,
        )
        .bind(course_id)
        .bind(content.name())
        .bind(content.link())
        .fetch_one(self.pool)
        .await?;
        Ok(created)
    }

    pub async fn remove(&self, course_id: Uuid, content_id: i64) -> Result<(), StoreError> {
        ensure_course(self.pool, course_id).await?;

        let removed = sqlx::query("DELETE FROM content WHERE id = $1 AND course_id = $2")
            .bind(content_id)
            .bind(course_id)
            .execute(self.pool)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(StoreError::not_found("content", content_id));
        }
        Ok(())
    }
}
