//! courses-server: HTTP service for courses
//!
//! Manages courses together with their students, collaborators,
//! hashtags, content items, reviews and favoriting users. Handlers talk
//! to an injected [`store::CourseStore`]; PostgreSQL backs production and
//! an in-memory store backs tests and throwaway instances.

pub mod db;
pub mod http;
pub mod models;
pub mod store;

pub use db::PgStore;
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use store::{CourseStore, MemoryStore, StoreError};
