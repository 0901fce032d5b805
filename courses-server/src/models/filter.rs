//! Course listing filter
//!
//! Every present field narrows the result (AND semantics); an empty
//! filter matches every course.

use uuid::Uuid;

use super::{Course, HashtagTag};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    /// Case-insensitive substring of the course name
    pub name: Option<String>,
    pub owner: Option<Uuid>,
    pub sub_level: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Any student of the course matches
    pub student: Option<Uuid>,
    /// Any collaborator of the course matches
    pub collaborator: Option<Uuid>,
    /// Any hashtag of the course matches
    pub hashtag: Option<HashtagTag>,
    pub min_rating: Option<f64>,
    pub category: Option<String>,
}

impl CourseFilter {
    /// Predicates on the course row itself. Collection predicates
    /// (student, collaborator, hashtag) are checked by the store.
    pub fn matches_row(&self, course: &Course) -> bool {
        if let Some(name) = &self.name {
            if !course.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.owner.is_some_and(|owner| owner != course.owner_id) {
            return false;
        }
        if self.sub_level.is_some_and(|level| level != course.sub_level) {
            return false;
        }
        if self.latitude.is_some() && self.latitude != course.latitude {
            return false;
        }
        if self.longitude.is_some() && self.longitude != course.longitude {
            return false;
        }
        if self.min_rating.is_some_and(|min| course.rating < min) {
            return false;
        }
        if self.category.is_some() && self.category != course.category {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course(name: &str, rating: f64) -> Course {
        Course {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            owner_id: Uuid::nil(),
            created_at: Utc::now(),
            blocked: false,
            in_edition: true,
            latitude: Some(-34.6),
            longitude: Some(-58.4),
            sub_level: 1,
            category: Some("music".into()),
            rating,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = CourseFilter::default();
        assert!(filter.matches_row(&course("anything", 0.0)));
    }

    #[test]
    fn name_is_case_insensitive_substring() {
        let filter = CourseFilter {
            name: Some("GUITAR".into()),
            ..Default::default()
        };
        assert!(filter.matches_row(&course("Intro to guitar", 0.0)));
        assert!(!filter.matches_row(&course("Piano", 0.0)));
    }

    #[test]
    fn fields_are_conjunctive() {
        let filter = CourseFilter {
            sub_level: Some(1),
            min_rating: Some(4.0),
            category: Some("music".into()),
            ..Default::default()
        };
        assert!(filter.matches_row(&course("a", 4.0)));
        assert!(!filter.matches_row(&course("a", 3.9)));

        let other_category = CourseFilter {
            category: Some("art".into()),
            ..filter
        };
        assert!(!other_category.matches_row(&course("a", 5.0)));
    }

    #[test]
    fn coordinates_are_equality() {
        let filter = CourseFilter {
            latitude: Some(-34.6),
            longitude: Some(-58.4),
            ..Default::default()
        };
        assert!(filter.matches_row(&course("a", 0.0)));

        let elsewhere = CourseFilter {
            latitude: Some(10.0),
            ..Default::default()
        };
        assert!(!elsewhere.matches_row(&course("a", 0.0)));
    }
}
