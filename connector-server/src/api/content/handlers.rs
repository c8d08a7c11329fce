//! Content listing and on-demand PDF generation handlers.
//!
//! Both run behind the bearer token gate. The response shapes follow the
//! Templafy content-connector API contract.

use crate::api::authn::AuthContext;
use crate::errors::ApiError;
use crate::models::TemplateItem;
use crate::openapi::CONTENT_TAG;
use crate::settings::{
    self, SettingsError, TemplafySettings, DOC_GEN_TEST_EMAIL, DOC_GEN_USE_TEST_EMAIL,
};
use crate::state::AppState;
use crate::store::StoreBackend;
use crate::templafy;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use http::HeaderMap;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hard ceiling on the page size regardless of request input
const MAX_PAGE_LIMIT: usize = 100;

/// Request header carrying the end-user email of the generation request
const TEMPLAFY_USER_HEADER: &str = "x-templafyuser";

/// Query parameters of the content listing
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ListContentQuery {
    /// Page size, defaults to the configured default limit
    limit: Option<usize>,
    /// Offset into the filtered set, defaults to 0
    skip: Option<usize>,
    /// Case-insensitive substring match against name or description
    search: Option<String>,
}

/// One listed item in the Templafy content picker shape
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentEntry {
    /// Identifier as a string, per the content-API contract
    id: String,
    name: String,
    description: String,
    /// Always application/pdf since generation always produces a PDF
    mime_type: String,
}

impl From<TemplateItem> for ContentEntry {
    fn from(item: TemplateItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            mime_type: "application/pdf".to_string(),
        }
    }
}

/// Response type of the content listing
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentListResponse {
    content: Vec<ContentEntry>,
    /// Total count of items matching the filter, ignoring pagination
    content_count: usize,
    /// The offset actually applied
    offset: usize,
}

/// Response type of the download-url endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadUrlResponse {
    download_url: String,
}

fn effective_limit(requested: Option<usize>, default_limit: usize) -> usize {
    requested.unwrap_or(default_limit).min(MAX_PAGE_LIMIT)
}

/// GET /content - list template items with pagination and search
#[utoipa::path(
    get,
    path = "/content",
    tag = CONTENT_TAG,
    params(
        ("limit" = Option<usize>, Query, description = "Page size, clamped to 100"),
        ("skip" = Option<usize>, Query, description = "Offset into the filtered set"),
        ("search" = Option<String>, Query, description = "Substring filter on name or description"),
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "One page of content items", body = ContentListResponse),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<ListContentQuery>,
) -> Response {
    let default_limit = match settings::default_page_limit(&state.store).await {
        Ok(limit) => limit,
        Err(e) => {
            error!("Failed to read default page limit: {e}");
            return ApiError::internal("Error retrieving content items").into_response();
        }
    };

    let limit = effective_limit(query.limit, default_limit);
    let skip = query.skip.unwrap_or(0);

    let page = match state
        .store
        .list_templates(query.search.as_deref(), limit, skip)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            error!("Failed to list template items: {e}");
            return ApiError::internal("Error retrieving content items").into_response();
        }
    };

    debug!(
        "Listed {} content items (total: {}, limit: {limit}, skip: {skip})",
        page.items.len(),
        page.total
    );

    Json(ContentListResponse {
        content: page.items.into_iter().map(ContentEntry::from).collect(),
        content_count: page.total,
        offset: skip,
    })
    .into_response()
}

/// GET /content/{content_id}/download-url - generate a PDF via Templafy and
/// relay the download URL
#[utoipa::path(
    get,
    path = "/content/{content_id}/download-url",
    tag = CONTENT_TAG,
    params(
        ("content_id" = i64, Path, description = "Template item identifier"),
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("X-TemplafyUser" = Option<String>, Header, description = "End-user email for generation"),
    ),
    responses(
        (status = 200, description = "PDF generated", body = DownloadUrlResponse),
        (status = 400, description = "End-user email missing"),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 404, description = "Unknown template item"),
        (status = 500, description = "Configuration or internal error"),
        (status = 502, description = "Templafy API rejected the generation call"),
        (status = 504, description = "No response from the Templafy API")
    )
)]
pub(crate) async fn download_url(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
) -> Response {
    match generate_download_url(&state, content_id, &headers).await {
        Ok(download_url) => {
            info!(
                "Returning download URL for template {content_id} to {:?}",
                auth.principal
            );
            Json(DownloadUrlResponse { download_url }).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn generate_download_url(
    state: &AppState,
    content_id: i64,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let email = resolve_generation_email(state, headers).await?;

    let template = state
        .store
        .get_template(content_id)
        .await
        .map_err(|e| {
            error!("Failed to look up template {content_id}: {e}");
            ApiError::internal("Error retrieving template item")
        })?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    // Resolve the remote API configuration before any remote call; a
    // missing setting is a configuration failure, not a remote one.
    let api = TemplafySettings::resolve(&state.store).await.map_err(|e| {
        error!("Templafy configuration incomplete: {e}");
        ApiError::internal(format!("Configuration error: {e}"))
    })?;

    debug!(
        "Generating document for template {content_id} ({:?}) as {email}",
        template.document_type
    );

    let download_url = templafy::generate_document(
        &state.templafy_client,
        &state.config.templafy,
        &api,
        &template,
        &email,
    )
    .await?;
    Ok(download_url)
}

/// Determine which email generation runs as: the configured test email when
/// the override is on, the X-TemplafyUser header otherwise.
async fn resolve_generation_email(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let map_settings_err = |e: SettingsError| {
        error!("Failed to read doc-gen settings: {e}");
        ApiError::internal("Error reading generation settings")
    };

    let use_test_email = settings::get_decoded(&state.store, DOC_GEN_USE_TEST_EMAIL)
        .await
        .map_err(|e| map_settings_err(e.into()))?
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if use_test_email {
        let test_email = state
            .store
            .get_setting(DOC_GEN_TEST_EMAIL)
            .await
            .map_err(|e| map_settings_err(e.into()))?
            .filter(|email| !email.is_empty());
        return test_email.ok_or_else(|| {
            ApiError::internal("Configuration error: test email is enabled but not set")
        });
    }

    headers
        .get(TEMPLAFY_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|email| !email.is_empty())
        .map(|email| email.to_string())
        .ok_or_else(|| {
            ApiError::bad_request(
                "User email missing in request header (X-TemplafyUser) and test email is disabled",
            )
        })
}
