//! Reviews: one rating (1-5) and optional text per user and course

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

/// Maximum length for review text
const MAX_REVIEW_LEN: usize = 500;

/// Review row as stored
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Rating in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: MIN_RATING as f64,
                max: MAX_RATING as f64,
            });
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Review text, at most 500 characters (may be empty)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewText(String);

impl ReviewText {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.chars().count() > MAX_REVIEW_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_REVIEW_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated review write
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub rating: Rating,
    pub description: ReviewText,
}

/// Result of an upsert
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review: Review,
    /// False when an existing review from the same user was overwritten
    pub created: bool,
    pub course_rating: f64,
}

/// Arithmetic mean of the ratings, 0.0 for a course without reviews.
pub fn mean_rating<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), r| (sum + r as i64, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().get(), 1);
        assert_eq!(Rating::new(5).unwrap().get(), 5);
        assert!(matches!(
            Rating::new(6).unwrap_err(),
            ValidationError::OutOfRange { field: "rating", .. }
        ));
    }

    #[test]
    fn review_text_limit() {
        assert!(ReviewText::new(&"x".repeat(500)).is_ok());
        assert!(ReviewText::new(&"x".repeat(501)).is_err());
        assert_eq!(ReviewText::new("").unwrap().as_str(), "");
    }

    #[test]
    fn mean_of_no_reviews_is_zero() {
        assert_eq!(mean_rating(Vec::<i32>::new()), 0.0);
    }

    #[test]
    fn mean_of_ratings() {
        assert_eq!(mean_rating([5, 4]), 4.5);
        assert_eq!(mean_rating([1, 2, 3]), 2.0);
    }
}
