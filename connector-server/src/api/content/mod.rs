pub mod handlers;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;

/// Combines the content-API routes consumed by Templafy into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/content", get(handlers::list_content))
        .route(
            "/content/{content_id}/download-url",
            get(handlers::download_url),
        )
}
