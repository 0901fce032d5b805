//! Course repository
//!
//! Handles course CRUD and the filtered listing:
//! - get: one query, associations aggregated with ARRAY sub-selects
//! - list: dynamic WHERE built with QueryBuilder, collection filters as EXISTS

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{ContentRepo, ReviewRepo, COURSE_COLUMNS};
use crate::models::{
    Course, CourseDetail, CourseFilter, CoursePatch, NewCourse, Paginated, Pagination,
};
use crate::store::StoreError;

/// Course repository
pub struct CourseRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, course: &NewCourse) -> Result<Course, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO courses AS c
                (name, description, owner_id, blocked, in_edition,
                 latitude, longitude, sub_level, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COURSE_COLUMNS}
            "#
        );

        let created: Course = sqlx::query_as(&sql)
            .bind(course.name.as_str())
            .bind(&course.description)
            .bind(course.owner_id)
            .bind(course.blocked)
            .bind(course.in_edition)
            .bind(course.latitude)
            .bind(course.longitude)
            .bind(course.sub_level)
            .bind(course.category.as_deref())
            .fetch_one(self.pool)
            .await?;

        Ok(created)
    }

    /// Course with all associations: one query for the row and member
    /// arrays, one each for content and reviews.
    pub async fn get(&self, id: Uuid) -> Result<CourseDetail, StoreError> {
        let sql = format!(
            r#"
            SELECT
                {COURSE_COLUMNS},
                ARRAY(SELECT student_id FROM course_students
                      WHERE course_id = c.id ORDER BY student_id) AS students,
                ARRAY(SELECT teacher_id FROM course_teachers
                      WHERE course_id = c.id ORDER BY teacher_id) AS collaborators,
                ARRAY(SELECT user_id FROM course_favorites
                      WHERE course_id = c.id ORDER BY user_id) AS favorited_by,
                ARRAY(SELECT h.tag::TEXT FROM course_hashtags ch
                      JOIN hashtags h ON h.id = ch.hashtag_id
                      WHERE ch.course_id = c.id ORDER BY h.tag) AS hashtags
            FROM courses c
            WHERE c.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("course", id))?;

        let course = Course::from_row(&row)?;
        let content = ContentRepo::new(self.pool).list(id).await?;
        let reviews = ReviewRepo::new(self.pool).list(id).await?;

        Ok(CourseDetail {
            course,
            students: row.try_get("students")?,
            collaborators: row.try_get("collaborators")?,
            favorited_by: row.try_get("favorited_by")?,
            hashtags: row.try_get("hashtags")?,
            content,
            reviews,
        })
    }

    /// Filtered page of courses in insertion order.
    ///
    /// The total comes from a separate COUNT so `num_pages` stays right
    /// for pages past the end.
    pub async fn list(
        &self,
        filter: &CourseFilter,
        page: Pagination,
    ) -> Result<Paginated<Course>, StoreError> {
        let mut count = count_query(filter);
        let (total,): (i64,) = count.build_query_as().fetch_one(self.pool).await?;

        let mut select = page_query(filter, page);
        let items: Vec<Course> = select.build_query_as().fetch_all(self.pool).await?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn replace(&self, id: Uuid, course: &NewCourse) -> Result<Course, StoreError> {
        let sql = format!(
            r#"
            UPDATE courses AS c SET
                name = $2,
                description = $3,
                owner_id = $4,
                blocked = $5,
                in_edition = $6,
                latitude = $7,
                longitude = $8,
                sub_level = $9,
                category = $10
            WHERE c.id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(course.name.as_str())
            .bind(&course.description)
            .bind(course.owner_id)
            .bind(course.blocked)
            .bind(course.in_edition)
            .bind(course.latitude)
            .bind(course.longitude)
            .bind(course.sub_level)
            .bind(course.category.as_deref())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("course", id))
    }

    /// Assign only the fields present in the patch (NULL binds keep the column).
    pub async fn patch(&self, id: Uuid, patch: &CoursePatch) -> Result<Course, StoreError> {
        let sql = format!(
            r#"
            UPDATE courses AS c SET
                name = COALESCE($2, c.name),
                description = COALESCE($3, c.description),
                owner_id = COALESCE($4, c.owner_id),
                blocked = COALESCE($5, c.blocked),
                in_edition = COALESCE($6, c.in_edition),
                latitude = COALESCE($7, c.latitude),
                longitude = COALESCE($8, c.longitude),
                sub_level = COALESCE($9, c.sub_level),
                category = COALESCE($10, c.category)
            WHERE c.id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(patch.name.as_ref().map(|n| n.as_str()))
            .bind(patch.description.as_deref())
            .bind(patch.owner_id)
            .bind(patch.blocked)
            .bind(patch.in_edition)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .bind(patch.sub_level)
            .bind(patch.category.as_deref())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("course", id))
    }

    /// Links, content and reviews go with the course (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("course", id));
        }
        Ok(())
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Append one predicate per present filter field.
fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &CourseFilter) {
    qb.push(" WHERE TRUE");

    if let Some(name) = &filter.name {
        qb.push(" AND c.name ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(owner) = filter.owner {
        qb.push(" AND c.owner_id = ").push_bind(owner);
    }
    if let Some(sub_level) = filter.sub_level {
        qb.push(" AND c.sub_level = ").push_bind(sub_level);
    }
    if let Some(latitude) = filter.latitude {
        qb.push(" AND c.latitude = ").push_bind(latitude);
    }
    if let Some(longitude) = filter.longitude {
        qb.push(" AND c.longitude = ").push_bind(longitude);
    }
    if let Some(student) = filter.student {
        qb.push(
            " AND EXISTS (SELECT 1 FROM course_students cs \
             WHERE cs.course_id = c.id AND cs.student_id = ",
        )
        .push_bind(student)
        .push(")");
    }
    if let Some(collaborator) = filter.collaborator {
        qb.push(
            " AND EXISTS (SELECT 1 FROM course_teachers ct \
             WHERE ct.course_id = c.id AND ct.teacher_id = ",
        )
        .push_bind(collaborator)
        .push(")");
    }
    if let Some(tag) = &filter.hashtag {
        qb.push(
            " AND EXISTS (SELECT 1 FROM course_hashtags ch \
             JOIN hashtags h ON h.id = ch.hashtag_id \
             WHERE ch.course_id = c.id AND h.tag = ",
        )
        .push_bind(tag.as_str().to_owned())
        .push(")");
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND c.rating >= ").push_bind(min_rating);
    }
    if let Some(category) = &filter.category {
        qb.push(" AND c.category = ").push_bind(category.clone());
    }
}

pub(crate) fn count_query(filter: &CourseFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses c");
    push_filters(&mut qb, filter);
    qb
}

pub(crate) fn page_query(
    filter: &CourseFilter,
    page: Pagination,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COURSE_COLUMNS} FROM courses c"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY c.created_at, c.id LIMIT ")
        .push_bind(page.limit() as i64)
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
    qb
}
