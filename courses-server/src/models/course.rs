//! Course records and validated course input

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::{Content, Review, ValidationError};

/// Maximum length for course names
const MAX_NAME_LEN: usize = 256;

/// Course row as stored
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub blocked: bool,
    pub in_edition: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sub_level: i32,
    pub category: Option<String>,
    pub rating: f64,
}

/// Course with every association loaded
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub students: Vec<Uuid>,
    pub collaborators: Vec<Uuid>,
    pub favorited_by: Vec<Uuid>,
    pub hashtags: Vec<String>,
    pub content: Vec<Content>,
    pub reviews: Vec<Review>,
}

/// Validated course name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseName(String);

impl CourseName {
    /// Create a new course name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    ///
    /// # Example
    /// ```
    /// use courses_server::models::CourseName;
    ///
    /// assert!(CourseName::new("Rust 101").is_ok());
    /// assert!(CourseName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscription level must not be negative.
pub fn validate_sub_level(level: i32) -> Result<i32, ValidationError> {
    if level < 0 {
        return Err(ValidationError::OutOfRange {
            field: "sub_level",
            min: 0.0,
            max: i32::MAX as f64,
        });
    }
    Ok(level)
}

pub fn validate_latitude(value: f64) -> Result<f64, ValidationError> {
    validate_coordinate("latitude", value, 90.0)
}

pub fn validate_longitude(value: f64) -> Result<f64, ValidationError> {
    validate_coordinate("longitude", value, 180.0)
}

fn validate_coordinate(
    field: &'static str,
    value: f64,
    bound: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < -bound || value > bound {
        return Err(ValidationError::OutOfRange {
            field,
            min: -bound,
            max: bound,
        });
    }
    Ok(value)
}

/// Every editable course field, used for create and full replace.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: CourseName,
    pub description: String,
    pub owner_id: Uuid,
    pub blocked: bool,
    pub in_edition: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sub_level: i32,
    pub category: Option<String>,
}

impl NewCourse {
    /// Course with defaults for everything but name and owner.
    pub fn new(name: CourseName, owner_id: Uuid) -> Self {
        Self {
            name,
            description: String::new(),
            owner_id,
            blocked: false,
            in_edition: true,
            latitude: None,
            longitude: None,
            sub_level: 0,
            category: None,
        }
    }

    /// Overwrite the editable fields of `course`.
    pub fn apply_to(&self, course: &mut Course) {
        course.name = self.name.as_str().to_owned();
        course.description = self.description.clone();
        course.owner_id = self.owner_id;
        course.blocked = self.blocked;
        course.in_edition = self.in_edition;
        course.latitude = self.latitude;
        course.longitude = self.longitude;
        course.sub_level = self.sub_level;
        course.category = self.category.clone();
    }
}

/// Partial update: only present fields are assigned.
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub name: Option<CourseName>,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub blocked: Option<bool>,
    pub in_edition: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sub_level: Option<i32>,
    pub category: Option<String>,
}

impl CoursePatch {
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(name) = &self.name {
            course.name = name.as_str().to_owned();
        }
        if let Some(description) = &self.description {
            course.description = description.clone();
        }
        if let Some(owner_id) = self.owner_id {
            course.owner_id = owner_id;
        }
        if let Some(blocked) = self.blocked {
            course.blocked = blocked;
        }
        if let Some(in_edition) = self.in_edition {
            course.in_edition = in_edition;
        }
        if self.latitude.is_some() {
            course.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            course.longitude = self.longitude;
        }
        if let Some(sub_level) = self.sub_level {
            course.sub_level = sub_level;
        }
        if self.category.is_some() {
            course.category = self.category.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course {
            id: Uuid::new_v4(),
            name: "old".into(),
            description: "desc".into(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            blocked: false,
            in_edition: true,
            latitude: Some(1.0),
            longitude: Some(2.0),
            sub_level: 0,
            category: Some("math".into()),
            rating: 4.5,
        }
    }

    #[test]
    fn name_is_trimmed() {
        let name = CourseName::new("  Algebra  ").unwrap();
        assert_eq!(name.as_str(), "Algebra");
    }

    #[test]
    fn name_rejects_empty() {
        let err = CourseName::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));
    }

    #[test]
    fn name_max_length() {
        assert!(CourseName::new(&"a".repeat(256)).is_ok());
        let err = CourseName::new(&"a".repeat(257)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 256, .. }));
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(validate_latitude(-34.6).is_ok());
        assert!(validate_latitude(91.0).is_err());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(f64::NAN).is_err());
    }

    #[test]
    fn sub_level_not_negative() {
        assert_eq!(validate_sub_level(2), Ok(2));
        assert!(validate_sub_level(-1).is_err());
    }

    #[test]
    fn patch_assigns_only_present_fields() {
        let mut course = sample_course();
        let before = course.clone();
        let patch = CoursePatch {
            name: Some(CourseName::new("new").unwrap()),
            blocked: Some(true),
            ..Default::default()
        };
        patch.apply_to(&mut course);

        assert_eq!(course.name, "new");
        assert!(course.blocked);
        assert_eq!(course.description, before.description);
        assert_eq!(course.latitude, before.latitude);
        assert_eq!(course.category, before.category);
        assert_eq!(course.rating, before.rating);
    }

    #[test]
    fn replace_keeps_identity_and_rating() {
        let mut course = sample_course();
        let before = course.clone();
        let owner = Uuid::new_v4();
        NewCourse::new(CourseName::new("replaced").unwrap(), owner).apply_to(&mut course);

        assert_eq!(course.id, before.id);
        assert_eq!(course.created_at, before.created_at);
        assert_eq!(course.rating, before.rating);
        assert_eq!(course.owner_id, owner);
        assert_eq!(course.description, "");
        assert_eq!(course.latitude, None);
        assert_eq!(course.category, None);
    }
}
