//! Schema creation
//!
//! Every statement is idempotent so the schema can be (re)applied on each
//! start. Requires PostgreSQL 13+ for `gen_random_uuid()`.

use sqlx::PgPool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        owner_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        blocked BOOLEAN NOT NULL DEFAULT FALSE,
        in_edition BOOLEAN NOT NULL DEFAULT TRUE,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        sub_level INTEGER NOT NULL DEFAULT 0 CHECK (sub_level >= 0),
        category TEXT,
        rating DOUBLE PRECISION NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_courses_created_at ON courses (created_at, id)",
    "CREATE INDEX IF NOT EXISTS idx_courses_owner ON courses (owner_id)",
    "CREATE TABLE IF NOT EXISTS students (user_id UUID PRIMARY KEY)",
    "CREATE TABLE IF NOT EXISTS teachers (user_id UUID PRIMARY KEY)",
    "CREATE TABLE IF NOT EXISTS users (user_id UUID PRIMARY KEY)",
    r#"
    CREATE TABLE IF NOT EXISTS hashtags (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tag VARCHAR(140) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_students (
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        student_id UUID NOT NULL REFERENCES students(user_id) ON DELETE CASCADE,
        PRIMARY KEY (course_id, student_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_teachers (
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        teacher_id UUID NOT NULL REFERENCES teachers(user_id) ON DELETE CASCADE,
        PRIMARY KEY (course_id, teacher_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_favorites (
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
        PRIMARY KEY (course_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_hashtags (
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        hashtag_id UUID NOT NULL REFERENCES hashtags(id) ON DELETE CASCADE,
        PRIMARY KEY (course_id, hashtag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS content (
        id BIGSERIAL PRIMARY KEY,
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        link TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_content_course ON content (course_id)",
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        user_id UUID NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        description VARCHAR(500) NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (course_id, user_id)
    )
    "#,
];

/// Create all tables and indexes that don't exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Applying course schema...");

    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(statements = SCHEMA.len(), "Course schema ready");
    Ok(())
}
