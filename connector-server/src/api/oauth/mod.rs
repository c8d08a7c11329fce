//! OAuth 2.0 Authorization Server for the Templafy content connector
//!
//! Only the Client Credentials Grant (RFC 6749 Section 4.4) is supported;
//! Templafy authenticates as a service against the connector's persisted
//! client id/secret pair. Issued tokens are stored in the record store with
//! a fixed TTL and invalidated purely by expiry.

pub mod handlers;
pub mod models;
pub mod token_manager;

use crate::state::AppState;
use axum::{routing::post, Router};

/// Creates OAuth 2.0 routes
pub fn router() -> Router<AppState> {
    Router::new().route("/oauth/token", post(handlers::token))
}
