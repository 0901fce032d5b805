//! Course hashtag repository
//!
//! Tags are unique by value; a tag row is created on first use and shared
//! by every course that carries it.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::ensure_course;
use crate::models::HashtagTag;
use crate::store::StoreError;

/// Hashtag repository
pub struct HashtagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> HashtagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, course_id: Uuid) -> Result<Vec<String>, StoreError> {
        ensure_course(self.pool, course_id).await?;

        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT h.tag::TEXT
            FROM course_hashtags ch
            JOIN hashtags h ON h.id = ch.hashtag_id
            WHERE ch.course_id = $1
            ORDER BY h.tag
            "#,
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn add(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        ensure_course(&mut *tx, course_id).await?;

        // Upsert so RETURNING yields the id for new and existing tags
        let row = sqlx::query(
            r#"
            INSERT INTO hashtags (tag) VALUES ($1)
            ON CONFLICT (tag) DO UPDATE SET tag = EXCLUDED.tag
            RETURNING id
            "#,
        )
        .bind(tag.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let hashtag_id: Uuid = row.try_get("id")?;

        let linked = sqlx::query(
            r#"
            INSERT INTO course_hashtags (course_id, hashtag_id) VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(course_id)
        .bind(hashtag_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if linked == 0 {
            return Err(StoreError::conflict("hashtag", tag.as_str()));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn remove(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        ensure_course(self.pool, course_id).await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM course_hashtags ch
            USING hashtags h
            WHERE h.id = ch.hashtag_id AND ch.course_id = $1 AND h.tag = $2
            "#,
        )
        .bind(course_id)
        .bind(tag.as_str())
        .execute(self.pool)
        .await?
        .rows_affected();

        if removed == 0 {
            return Err(StoreError::not_found("hashtag", tag.as_str()));
        }
        Ok(())
    }
}
