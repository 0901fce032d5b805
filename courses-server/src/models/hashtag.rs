//! Hashtag validation
//!
//! Tags are unique by value. A leading `#` is dropped and the tag is
//! lowercased so `#Rust` and `rust` name the same hashtag.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for a tag, matching the `hashtags.tag` column
const MAX_TAG_LEN: usize = 140;

/// Letters, digits, underscores and hyphens
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}_-]+$").expect("invalid hashtag regex"));

/// Validated, normalised hashtag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashtagTag(String);

impl HashtagTag {
    /// # Example
    /// ```
    /// use courses_server::models::HashtagTag;
    ///
    /// assert_eq!(HashtagTag::new("#Rust").unwrap().as_str(), "rust");
    /// assert!(HashtagTag::new("two words").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let tag = trimmed.strip_prefix('#').unwrap_or(trimmed).to_lowercase();

        if tag.is_empty() {
            return Err(ValidationError::Empty { field: "hashtag" });
        }

        if tag.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "hashtag",
                max: MAX_TAG_LEN,
            });
        }

        if !TAG_RE.is_match(&tag) {
            return Err(ValidationError::InvalidFormat {
                field: "hashtag",
                reason: "must contain only letters, digits, hyphens and underscores",
            });
        }

        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hash_and_lowercases() {
        assert_eq!(HashtagTag::new("#Backend").unwrap().as_str(), "backend");
        assert_eq!(HashtagTag::new("  data_science ").unwrap().as_str(), "data_science");
    }

    #[test]
    fn accepts_unicode_letters() {
        assert_eq!(HashtagTag::new("#Programación").unwrap().as_str(), "programación");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            HashtagTag::new("#").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn rejects_spaces_and_punctuation() {
        assert!(matches!(
            HashtagTag::new("two words").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(HashtagTag::new("a/b").is_err());
    }

    #[test]
    fn max_length() {
        assert!(HashtagTag::new(&"t".repeat(140)).is_ok());
        let err = HashtagTag::new(&"t".repeat(141)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 140, .. }));
    }
}
