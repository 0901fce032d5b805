//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod courses;
pub mod members;
pub mod hashtags;
pub mod content;
pub mod reviews;

pub use courses::CourseRepo;
pub use members::MemberRepo;
pub use hashtags::HashtagRepo;
pub use content::ContentRepo;
pub use reviews::ReviewRepo;

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::store::StoreError;

/// Course columns, qualified with the `c` alias every query uses
pub(crate) const COURSE_COLUMNS: &str = "c.id, c.name, c.description, c.owner_id, c.created_at, \
     c.blocked, c.in_edition, c.latitude, c.longitude, c.sub_level, c.category, c.rating";

/// Fail with NotFound unless the course exists.
pub(crate) async fn ensure_course<'e, E>(executor: E, course_id: Uuid) -> Result<(), StoreError>
where
    E: PgExecutor<'e>,
{
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
        .bind(course_id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(StoreError::not_found("course", course_id));
    }
    Ok(())
}
