pub(crate) mod admin;
pub(crate) mod authn;
pub(crate) mod content;
pub(crate) mod health;
pub(crate) mod oauth;

use crate::state::AppState;
use axum::{middleware, routing::get, Router};

/// Combines all API routes into a single router. The content routes sit
/// behind the bearer-token gate, the admin routes behind the service API
/// key, the rest is public.
pub(crate) fn router(state: &AppState) -> Router<AppState> {
    let protected = content::router().layer(middleware::from_fn_with_state(
        state.clone(),
        authn::require_bearer_token,
    ));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .merge(oauth::router())
        .merge(admin::router(state.clone()))
        .merge(protected)
}
