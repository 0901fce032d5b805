//! Route handlers organized by resource

pub mod health;
pub mod courses;
pub mod members;
pub mod hashtags;
pub mod content;
pub mod reviews;
pub mod users;

use serde::Serialize;

/// Plain acknowledgement body for accepted deletions
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
