//! Review repository
//!
//! One review per (course, user), enforced by a unique constraint. Every
//! write recomputes `courses.rating` in the same transaction.

use sqlx::{FromRow, PgConnection, PgPool, Row};
use uuid::Uuid;

use super::ensure_course;
use crate::models::{NewReview, Review, ReviewOutcome};
use crate::store::StoreError;

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a course, oldest first (empty for unknown courses).
    pub async fn list(&self, course_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, rating, description, created_at
            FROM reviews
            WHERE course_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }

    /// Insert the user's review or overwrite it in place (same id).
    pub async fn upsert(
        &self,
        course_id: Uuid,
        review: &NewReview,
    ) -> Result<ReviewOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        ensure_course(&mut *tx, course_id).await?;

        // xmax = 0 only for freshly inserted tuples
        let row = sqlx::query(
            r#"
            INSERT INTO reviews (course_id, user_id, rating, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (course_id, user_id) DO UPDATE
                SET rating = EXCLUDED.rating,
                    description = EXCLUDED.description
            RETURNING id, user_id, rating, description, created_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(course_id)
        .bind(review.user_id)
        .bind(review.rating.get())
        .bind(review.description.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let stored = Review::from_row(&row)?;
        let created: bool = row.try_get("inserted")?;
        let course_rating = recompute_rating(&mut tx, course_id).await?;

        tx.commit().await?;

        Ok(ReviewOutcome {
            review: stored,
            created,
            course_rating,
        })
    }

    /// Delete the user's review and return the new course rating.
    pub async fn delete(&self, course_id: Uuid, user_id: Uuid) -> Result<f64, StoreError> {
        let mut tx = self.pool.begin().await?;

        ensure_course(&mut *tx, course_id).await?;

        let removed = sqlx::query("DELETE FROM reviews WHERE course_id = $1 AND user_id = $2")
            .bind(course_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(StoreError::not_found("review", user_id));
        }

        let course_rating = recompute_rating(&mut tx, course_id).await?;
        tx.commit().await?;
        Ok(course_rating)
    }
}

/// Mean over the stored rows (one per user), 0 without reviews.
async fn recompute_rating(conn: &mut PgConnection, course_id: Uuid) -> Result<f64, StoreError> {
    let rating: f64 = sqlx::query_scalar(
        r#"
        UPDATE courses SET rating = COALESCE(
            (SELECT AVG(rating)::DOUBLE PRECISION FROM reviews WHERE course_id = $1),
            0
        )
        WHERE id = $1
        RETURNING rating
        "#,
    )
    .bind(course_id)
    .fetch_one(conn)
    .await?;
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::CourseRepo;
    use crate::models::{CourseName, NewCourse, Rating, ReviewText};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn same_user_updates_in_place() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("schema");

        let course = CourseRepo::new(&pool)
            .create(&NewCourse::new(CourseName::new("reviews").unwrap(), Uuid::new_v4()))
            .await
            .expect("create");
        let repo = ReviewRepo::new(&pool);
        let user = Uuid::new_v4();
        let write = |rating| NewReview {
            user_id: user,
            rating: Rating::new(rating).unwrap(),
            description: ReviewText::new("ok").unwrap(),
        };

        let first = repo.upsert(course.id, &write(2)).await.expect("insert");
        assert!(first.created);
        let second = repo.upsert(course.id, &write(4)).await.expect("update");
        assert!(!second.created);
        assert_eq!(second.review.id, first.review.id);
        assert_eq!(second.course_rating, 4.0);
        assert_eq!(repo.list(course.id).await.expect("list").len(), 1);

        assert_eq!(repo.delete(course.id, user).await.expect("delete"), 0.0);
        CourseRepo::new(&pool).delete(course.id).await.expect("cleanup");
    }
}
