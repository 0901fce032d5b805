//! Course content items (name + link)

use serde::Serialize;
use sqlx::FromRow;

use super::ValidationError;

const MAX_CONTENT_NAME_LEN: usize = 256;
const MAX_LINK_LEN: usize = 2048;

/// Content row as stored
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Content {
    pub id: i64,
    pub name: String,
    pub link: String,
}

/// Validated content to attach to a course
#[derive(Debug, Clone)]
pub struct NewContent {
    name: String,
    link: String,
}

impl NewContent {
    pub fn new(name: &str, link: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let link = link.trim();

        if name.is_empty() {
            return Err(ValidationError::Empty { field: "content name" });
        }
        if name.chars().count() > MAX_CONTENT_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "content name",
                max: MAX_CONTENT_NAME_LEN,
            });
        }
        if link.is_empty() {
            return Err(ValidationError::Empty { field: "link" });
        }
        if link.len() > MAX_LINK_LEN {
            return Err(ValidationError::TooLong {
                field: "link",
                max: MAX_LINK_LEN,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            link: link.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_fields() {
        let c = NewContent::new(" Lesson 1 ", " https://example.com/1 ").unwrap();
        assert_eq!(c.name(), "Lesson 1");
        assert_eq!(c.link(), "https://example.com/1");
    }

    #[test]
    fn requires_name_and_link() {
        assert!(matches!(
            NewContent::new("", "x").unwrap_err(),
            ValidationError::Empty { field: "content name" }
        ));
        assert!(matches!(
            NewContent::new("x", " ").unwrap_err(),
            ValidationError::Empty { field: "link" }
        ));
    }
}
