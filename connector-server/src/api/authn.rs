//! Bearer token verification middleware for the content API.
//!
//! A pure gate: one store lookup plus a time comparison, no mutation. Runs
//! in front of every protected content operation so configuration changes
//! and expiry take effect immediately.

use crate::api::oauth::token_manager::{TokenError, TokenManager};
use crate::models::Principal;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde_json::json;

/// Identity context attached to the request once the bearer token has been
/// verified
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub scope: Option<String>,
    pub expires_at: u64,
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Unauthorized: no token provided"),
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Unauthorized: invalid or expired token")
            }
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error during token verification",
            ),
        };
        let body = axum::Json(json!({
            "message": message,
        }));
        (status, body).into_response()
    }
}

/// Bearer token authentication middleware
pub(super) async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Extract the token from the authorization header
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_value| {
            if auth_value.len() > 7 && auth_value[..7].eq_ignore_ascii_case("bearer ") {
                Some(auth_value[7..].to_string())
            } else {
                None
            }
        });

    let token = match token {
        Some(token) => token,
        None => {
            warn!("Attempt to access protected resource without a bearer token");
            return Err(AuthError::MissingToken);
        }
    };

    let token_manager = TokenManager::new(state.store.clone(), state.config.oauth.token_ttl);
    let record = match token_manager.verify(&token).await {
        Ok(record) => record,
        Err(TokenError::NotFound) => {
            warn!("Invalid or expired token presented");
            return Err(AuthError::InvalidToken);
        }
        Err(e) => {
            error!("Error verifying access token: {e}");
            return Err(AuthError::Internal);
        }
    };

    // Attach identity context for downstream handlers
    request.extensions_mut().insert(AuthContext {
        principal: record.principal(),
        scope: record.scope,
        expires_at: record.expires_at,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use http::StatusCode;

    #[tokio::test]
    async fn test_valid_token_passes_the_gate() {
        let fixture = TestFixture::new().await;
        let token = fixture.issue_token().await;

        let response = fixture.get_with_token("/content", &token).await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/content").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let fixture = TestFixture::new().await;
        let response = fixture
            .get_with_headers("/content", &[("Authorization", "Basic dXNlcjpwYXNz")])
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let fixture = TestFixture::new().await;
        let response = fixture.get_with_token("/content", "deadbeef").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let fixture = TestFixture::new().await;
        let token = fixture.insert_expired_token().await;

        let response = fixture.get_with_token("/content", &token).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
