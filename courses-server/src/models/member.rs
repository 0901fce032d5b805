//! Kinds of user membership a course can have

use serde::{Deserialize, Serialize};

/// Many-to-many relation between a course and a bare user identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Student,
    Collaborator,
    Favorite,
}

impl MemberKind {
    /// Singular name, used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Collaborator => "collaborator",
            Self::Favorite => "favorite",
        }
    }

    /// Path segment of the nested collection under `/courses/{id}`
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Collaborator => "collaborators",
            Self::Favorite => "favorites",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Student, Self::Collaborator, Self::Favorite]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_lowercase() {
        let kind: MemberKind = serde_json::from_str("\"collaborator\"").unwrap();
        assert_eq!(kind, MemberKind::Collaborator);
    }

    #[test]
    fn collections_are_plural() {
        for kind in MemberKind::all() {
            assert!(kind.collection().starts_with(kind.as_str()));
        }
    }

    #[test]
    fn defaults_to_student() {
        assert_eq!(MemberKind::default(), MemberKind::Student);
    }
}
