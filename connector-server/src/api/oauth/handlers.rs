//! OAuth 2.0 token endpoint handler

use crate::api::oauth::{
    models::{OAuthError, TokenRequest, TokenResponse},
    token_manager::TokenManager,
};
use crate::openapi::OAUTH_TAG;
use crate::settings::{ClientCredentials, SettingsError};
use crate::state::AppState;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use http::{header::AUTHORIZATION, HeaderMap};
use log::{error, info, warn};

/// OAuth 2.0 Token endpoint (RFC 6749 Section 4.4, client credentials only)
#[utoipa::path(
    post,
    path = "/oauth/token",
    tag = OAUTH_TAG,
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Access token issued successfully", body = TokenResponse),
        (status = 400, description = "Invalid request or unsupported grant type", body = OAuthError),
        (status = 401, description = "Invalid client credentials", body = OAuthError),
        (status = 500, description = "Internal server error", body = OAuthError)
    )
)]
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    // Client credentials arrive either via HTTP Basic or as body parameters
    let presented = match basic_credentials(&headers) {
        Some(credentials) => Some(credentials),
        None => match (request.client_id, request.client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        },
    };

    let (client_id, client_secret) = match presented {
        Some(credentials) => credentials,
        None => {
            warn!("Missing client credentials in token request");
            return error_response(
                StatusCode::BAD_REQUEST,
                OAuthError::invalid_request("client_id and client_secret are required"),
            );
        }
    };

    info!(
        "OAuth token request from client_id: {} with grant_type: {}",
        client_id, request.grant_type
    );

    if request.grant_type != "client_credentials" {
        warn!(
            "Unsupported grant type '{}' from client '{}'",
            request.grant_type, client_id
        );
        return error_response(StatusCode::BAD_REQUEST, OAuthError::unsupported_grant_type());
    }

    // Validate against the persisted connector credentials; an unconfigured
    // pair means no credentials can match.
    let configured = match ClientCredentials::resolve(&state.store).await {
        Ok(configured) => configured,
        Err(SettingsError::Missing(key)) => {
            warn!("Connector client credentials are not configured ('{key}' missing)");
            return error_response(
                StatusCode::UNAUTHORIZED,
                OAuthError::invalid_client("Invalid client credentials"),
            );
        }
        Err(SettingsError::Store(e)) => {
            error!("Error reading connector credentials: {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                OAuthError::server_error("Failed to validate client credentials"),
            );
        }
    };

    if client_id != configured.client_id || client_secret != configured.client_secret {
        warn!("Invalid client credentials for client_id: {client_id}");
        return error_response(
            StatusCode::UNAUTHORIZED,
            OAuthError::invalid_client("Invalid client credentials"),
        );
    }

    let token_manager = TokenManager::new(state.store.clone(), state.config.oauth.token_ttl);
    let record = match token_manager.issue(&client_id, request.scope).await {
        Ok(record) => record,
        Err(e) => {
            // The grant fails entirely; a minted-but-unsaved token is never
            // returned to the caller.
            error!("Error issuing access token for client '{client_id}': {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                OAuthError::server_error("Failed to issue access token"),
            );
        }
    };

    info!("Successfully issued access token to client '{client_id}'");

    Json(TokenResponse {
        access_token: record.token,
        token_type: "bearer".to_string(),
        expires_in: token_manager.token_ttl(),
        scope: record.scope,
    })
    .into_response()
}

/// Extract client credentials from an HTTP Basic authorization header
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = if header.len() > 6 && header[..6].eq_ignore_ascii_case("basic ") {
        &header[6..]
    } else {
        return None;
    };
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (client_id, client_secret) = decoded.split_once(':')?;
    Some((client_id.to_string(), client_secret.to_string()))
}

/// Helper function to create error responses
fn error_response(status: StatusCode, error: OAuthError) -> Response {
    (status, Json(error)).into_response()
}
