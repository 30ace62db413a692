//! Service health endpoints
//!
//! `/health` and `/health/live` report on the process itself;
//! `/health/ready` also round-trips the recipe store and answers 503 when
//! it is unreachable, so traffic is only routed once recipes can actually
//! be served.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Process-level health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response, including the recipe store check
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub recipe_store: StoreCheck,
}

/// Outcome of probing the recipe store
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe; 503 until the recipe store answers a query
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let recipe_store = match db::health_check(state.db()).await {
        Ok(()) => StoreCheck {
            reachable: true,
            error: None,
        },
        Err(e) => StoreCheck {
            reachable: false,
            error: Some(e.to_string()),
        },
    };

    let response = ReadinessResponse {
        status: if recipe_store.reachable {
            "ready"
        } else {
            "not_ready"
        },
        version: env!("CARGO_PKG_VERSION"),
        recipe_store,
    };

    if response.recipe_store.reachable {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe; succeeds whenever the process can answer at all
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    #[tokio::test]
    async fn health_reports_process_version() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn liveness_never_touches_the_store() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[tokio::test]
    async fn readiness_is_503_when_the_store_is_unreachable() {
        // Port 1 refuses connections; the short acquire timeout keeps the
        // failure prompt either way
        let options = "postgres://nobody@127.0.0.1:1/void".parse().unwrap();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy_with(options);
        let state = AppState::new(pool, AppConfig::default());

        let (status, Json(body)) = readiness_check(State(state))
            .await
            .expect_err("store is unreachable");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "not_ready");
        assert!(!body.recipe_store.reachable);
        assert!(body.recipe_store.error.is_some());
    }
}
