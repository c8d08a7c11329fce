//! Liveness and readiness probes.

use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct Health {
    status: String,
}

impl Health {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET /health - liveness, always ok while the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Service is alive", body = Health))
)]
pub(crate) async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// GET /ready - readiness, checks the backing store round-trips
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = Health),
        (status = 503, description = "Backing store is unavailable")
    )
)]
pub(crate) async fn ready(State(state): State<AppState>) -> Response {
    if state.health_check().await {
        Json(Health::ok()).into_response()
    } else {
        error!("Readiness check failed: backing store is unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "unavailable" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use http::StatusCode;

    #[tokio::test]
    async fn test_health_is_public() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/health").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_with_healthy_store() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/ready").await;
        response.assert_status(StatusCode::OK);
    }
}
