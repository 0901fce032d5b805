//! Course membership repository (students, collaborators, favorites)
//!
//! Each kind has its own entity table keyed by the user id and its own
//! link table. Adding a member upserts the entity, then links it; a link
//! that already exists is a conflict.

use sqlx::PgPool;
use uuid::Uuid;

use super::{ensure_course, COURSE_COLUMNS};
use crate::models::{Course, MemberKind};
use crate::store::StoreError;

/// Table names for one membership kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemberTables {
    /// Entity table with a `user_id` primary key
    pub entity: &'static str,
    /// Link table with `course_id` and `column`
    pub link: &'static str,
    pub column: &'static str,
}

impl MemberTables {
    // Safe to interpolate: names come from this enum, never from input
    pub(crate) fn of(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Student => Self {
                entity: "students",
                link: "course_students",
                column: "student_id",
            },
            MemberKind::Collaborator => Self {
                entity: "teachers",
                link: "course_teachers",
                column: "teacher_id",
            },
            MemberKind::Favorite => Self {
                entity: "users",
                link: "course_favorites",
                column: "user_id",
            },
        }
    }
}

/// Membership repository
pub struct MemberRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, course_id: Uuid, kind: MemberKind) -> Result<Vec<Uuid>, StoreError> {
        ensure_course(self.pool, course_id).await?;

        let t = MemberTables::of(kind);
        let sql = format!(
            "SELECT {col} FROM {link} WHERE course_id = $1 ORDER BY {col}",
            col = t.column,
            link = t.link
        );

        let ids: Vec<Uuid> = sqlx::query_scalar(&sql)
            .bind(course_id)
            .fetch_all(self.pool)
            .await?;
        Ok(ids)
    }

    /// Create the user entity if needed and link it (atomic).
    pub async fn add(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let t = MemberTables::of(kind);
        let mut tx = self.pool.begin().await?;

        ensure_course(&mut *tx, course_id).await?;

        sqlx::query(&format!(
            "INSERT INTO {} (user_id) VALUES ($1) ON CONFLICT DO NOTHING",
            t.entity
        ))
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let linked = sqlx::query(&format!(
            "INSERT INTO {} (course_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            t.link, t.column
        ))
        .bind(course_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if linked == 0 {
            // Dropping the transaction rolls back
            return Err(StoreError::conflict(kind.as_str(), user_id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Unlink a user; the user entity is kept.
    pub async fn remove(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        ensure_course(self.pool, course_id).await?;

        let t = MemberTables::of(kind);
        let removed = sqlx::query(&format!(
            "DELETE FROM {} WHERE course_id = $1 AND {} = $2",
            t.link, t.column
        ))
        .bind(course_id)
        .bind(user_id)
        .execute(self.pool)
        .await?
        .rows_affected();

        if removed == 0 {
            return Err(StoreError::not_found(kind.as_str(), user_id));
        }
        Ok(())
    }

    /// Courses linked to a user, in insertion order.
    pub async fn courses_for_user(
        &self,
        user_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Course>, StoreError> {
        let t = MemberTables::of(kind);
        let sql = format!(
            r#"
            SELECT {COURSE_COLUMNS}
            FROM courses c
            JOIN {link} l ON l.course_id = c.id
            WHERE l.{col} = $1
            ORDER BY c.created_at, c.id
            "#,
            link = t.link,
            col = t.column
        );

        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(courses)
    }
}
