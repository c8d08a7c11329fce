use utoipa::OpenApi;

pub const OAUTH_TAG: &str = "OAuth 2.0";
pub const CONTENT_TAG: &str = "Content API";
pub const ADMIN_TAG: &str = "Administration";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Templafy Content Connector",
        description = "Custom content connector exposing registered document \
                       templates to Templafy and generating PDFs on demand",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::api::oauth::handlers::token,
        crate::api::content::handlers::list_content,
        crate::api::content::handlers::download_url,
        crate::api::admin::put_settings,
        crate::api::admin::create_template,
        crate::api::admin::get_template,
        crate::api::health::health,
        crate::api::health::ready,
    ),
    tags(
        (name = OAUTH_TAG, description = "Client-credentials token issuance"),
        (name = CONTENT_TAG, description = "Content listing and PDF generation"),
        (name = ADMIN_TAG, description = "Connector configuration"),
        (name = HEALTH_TAG, description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;
