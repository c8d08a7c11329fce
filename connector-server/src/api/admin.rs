//! Administrative JSON surface, protected by the static service API key.
//!
//! These endpoints configure the connector (settings and template items) and
//! are separate from the bearer-token flow the content endpoints use.

use crate::errors::ApiError;
use crate::models::{NewTemplateItem, TemplateItem};
use crate::openapi::ADMIN_TAG;
use crate::state::AppState;
use crate::store::StoreBackend;
use axum::{
    body::Body,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use http::{Request, StatusCode};
use log::{error, info, warn};
use std::collections::HashMap;

pub(super) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/settings", put(put_settings))
        .route("/admin/templates", post(create_template))
        .route("/admin/templates/{template_id}", get(get_template))
        .layer(middleware::from_fn_with_state(state, require_admin_key))
}

/// Admin key middleware. Compares the bearer token against the configured
/// service API key; an empty configured key rejects every request.
async fn require_admin_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: middleware::Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| {
            if value.to_lowercase().starts_with("bearer ") {
                Some(value[7..].to_string())
            } else {
                None
            }
        });

    let token = match token {
        Some(token) => token,
        None => {
            warn!("Admin request without an Authorization bearer header");
            return Err(ApiError::unauthorized("Missing API key"));
        }
    };

    if state.config.api_key.is_empty() || token != state.config.api_key {
        warn!("Admin request with an invalid API key");
        return Err(ApiError::unauthorized("Invalid API key"));
    }

    Ok(next.run(req).await)
}

/// PUT /admin/settings - upsert a batch of raw string settings
#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = ADMIN_TAG,
    request_body = HashMap<String, String>,
    params(
        ("Authorization" = String, Header, description = "Bearer service API key"),
    ),
    responses(
        (status = 204, description = "Settings stored"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<HashMap<String, String>>,
) -> Result<StatusCode, ApiError> {
    let count = settings.len();
    for (key, value) in settings {
        state.store.upsert_setting(&key, &value).await.map_err(|e| {
            error!("Failed to store setting '{key}': {e}");
            ApiError::internal("Error storing settings")
        })?;
    }
    info!("Stored {count} settings");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/templates - register a template item
#[utoipa::path(
    post,
    path = "/admin/templates",
    tag = ADMIN_TAG,
    request_body = NewTemplateItem,
    params(
        ("Authorization" = String, Header, description = "Bearer service API key"),
    ),
    responses(
        (status = 201, description = "Template item created", body = TemplateItem),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn create_template(
    State(state): State<AppState>,
    Json(new_item): Json<NewTemplateItem>,
) -> Result<Response, ApiError> {
    let item = state.store.insert_template(new_item).await.map_err(|e| {
        error!("Failed to store template item: {e}");
        ApiError::internal("Error storing template item")
    })?;
    info!("Registered template item {} ('{}')", item.id, item.name);
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// GET /admin/templates/{template_id} - fetch a single template item
#[utoipa::path(
    get,
    path = "/admin/templates/{template_id}",
    tag = ADMIN_TAG,
    params(
        ("template_id" = i64, Path, description = "Template item identifier"),
        ("Authorization" = String, Header, description = "Bearer service API key"),
    ),
    responses(
        (status = 200, description = "The template item", body = TemplateItem),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Unknown template item"),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
) -> Result<Json<TemplateItem>, ApiError> {
    let item = state
        .store
        .get_template(template_id)
        .await
        .map_err(|e| {
            error!("Failed to look up template {template_id}: {e}");
            ApiError::internal("Error retrieving template item")
        })?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;
    use crate::test_utils::TestFixture;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_settings_requires_api_key() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .put_json("/admin/settings", None, json!({ "a": "1" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = fixture
            .put_json("/admin/settings", Some("wrong-key"), json!({ "a": "1" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_put_settings_upserts() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .put_json(
                "/admin/settings",
                Some(&fixture.config.api_key),
                json!({ "connector.defaultLimit": "50", "custom.flag": "true" }),
            )
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let stored = fixture
            .state
            .store
            .get_setting("connector.defaultLimit")
            .await
            .unwrap();
        assert_eq!(stored.as_deref(), Some("50"));
    }

    #[tokio::test]
    async fn test_create_and_fetch_template() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .post_json(
                "/admin/templates",
                Some(&fixture.config.api_key),
                json!({
                    "name": "Quarterly Report",
                    "description": "finance",
                    "spaceId": "space-1",
                    "assetId": "asset-9",
                    "documentType": "document",
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: TemplateItem = response.json_as();
        assert_eq!(created.name, "Quarterly Report");
        assert_eq!(created.document_type, DocumentType::Document);

        let response = fixture
            .get_with_headers(
                &format!("/admin/templates/{}", created.id),
                &[(
                    "Authorization",
                    &format!("Bearer {}", fixture.config.api_key),
                )],
            )
            .await;
        response.assert_status(StatusCode::OK);
        let fetched: TemplateItem = response.json_as();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_template_unknown_id() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .get_with_headers(
                "/admin/templates/123",
                &[(
                    "Authorization",
                    &format!("Bearer {}", fixture.config.api_key),
                )],
            )
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oauth_bearer_token_does_not_grant_admin_access() {
        let fixture = TestFixture::new().await;
        let token = fixture.issue_token().await;

        let response = fixture
            .put_json("/admin/settings", Some(&token), json!({ "a": "1" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
