//! Liveness plus a storage round trip
//!
//! 200 while the store answers, 503 otherwise.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub backend: &'static str,
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let backend = state.store.backend();
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend, "store ping failed: {}", e);
            false
        }
    };

    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store: StoreHealth { backend, reachable },
        }),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;

    use crate::db::PgStore;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn memory_store_is_healthy() {
        let state = Arc::new(AppState::new(Arc::new(MemoryStore::new())));
        let (code, Json(body)) = health(State(state)).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.store.backend, "memory");
        assert!(body.store.reachable);
    }

    #[tokio::test]
    async fn unreachable_database_is_503() {
        // Nothing listens on port 1; the pool gives up after the timeout
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy("postgres://courses@127.0.0.1:1/courses")
            .unwrap();
        let state = Arc::new(AppState::new(Arc::new(PgStore::new(pool))));
        let (code, Json(body)) = health(State(state)).await;

        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "unavailable");
        assert_eq!(body.store.backend, "postgres");
        assert!(!body.store.reachable);
    }
}
