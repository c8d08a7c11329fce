//! Outbound client for the Templafy document-generation API.
//!
//! One generation call per invocation, no retries. Failures are translated
//! into a typed error so the HTTP layer can distinguish remote-side errors
//! (bad gateway), unreachable-remote errors (gateway timeout) and malformed
//! remote responses.

use crate::config::templafy::TemplafyConfig;
use crate::errors::ApiError;
use crate::models::TemplateItem;
use crate::settings::TemplafySettings;
use http::StatusCode;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling the remote generation endpoint
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Templafy API responded with status {status}: {body}")]
    RemoteStatus { status: StatusCode, body: String },
    #[error("No response received from the Templafy API: {0}")]
    NoResponse(reqwest::Error),
    #[error("Failed to send request to the Templafy API: {0}")]
    Request(reqwest::Error),
    #[error("Failed to parse Templafy API response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Templafy API response did not contain a PDF download URL")]
    MissingDownloadUrl,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        // A timeout or connect failure means the request never produced a
        // response, which callers must be able to tell apart from a remote
        // rejection.
        if err.is_timeout() || err.is_connect() {
            Self::NoResponse(err)
        } else {
            Self::Request(err)
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::RemoteStatus { status, .. } => ApiError::bad_gateway(format!(
                "Templafy API request failed with status {status}"
            )),
            GenerationError::NoResponse(_) => {
                ApiError::gateway_timeout("No response received from the Templafy API")
            }
            GenerationError::Request(_) => {
                ApiError::bad_gateway("Failed to send request to the Templafy API")
            }
            GenerationError::Parse(_) | GenerationError::MissingDownloadUrl => {
                ApiError::bad_gateway("Invalid response from the Templafy API")
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    email: &'a str,
    data: serde_json::Value,
    include_pdf: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    pdf_download_url: Option<String>,
}

/// Build the remote generate endpoint URL for a template item
fn generate_url(
    config: &TemplafyConfig,
    api: &TemplafySettings,
    template: &TemplateItem,
) -> String {
    let base = match &config.base_url {
        Some(base_url) => base_url.trim_end_matches('/').to_string(),
        None => format!("https://{}.api.templafy.com", api.tenant_id),
    };
    format!(
        "{}/{}/libraries/{}/{}/assets/{}/generate",
        base,
        api.api_version,
        template.space_id,
        template.document_type.assets_segment(),
        template.asset_id
    )
}

/// Issue one authenticated generation call and return the PDF download URL
pub async fn generate_document(
    client: &reqwest::Client,
    config: &TemplafyConfig,
    api: &TemplafySettings,
    template: &TemplateItem,
    email: &str,
) -> Result<String, GenerationError> {
    let url = generate_url(config, api, template);
    debug!("Calling Templafy generate endpoint: {url}");

    let payload = GenerateRequest {
        email,
        data: serde_json::json!({}),
        include_pdf: true,
    };

    let response = client
        .post(&url)
        .bearer_auth(&api.bearer_token)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Templafy generate call failed with status {status}: {body}");
        return Err(GenerationError::RemoteStatus { status, body });
    }

    let body = response.bytes().await?;
    let parsed: GenerateResponse = serde_json::from_slice(&body)?;
    parsed
        .pdf_download_url
        .filter(|download_url| !download_url.is_empty())
        .ok_or(GenerationError::MissingDownloadUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;

    fn template(document_type: DocumentType) -> TemplateItem {
        TemplateItem {
            id: 1,
            name: "Quarterly Report".to_string(),
            description: "".to_string(),
            space_id: "space-1".to_string(),
            asset_id: "asset-1".to_string(),
            document_type,
        }
    }

    fn api_settings() -> TemplafySettings {
        TemplafySettings {
            tenant_id: "acme".to_string(),
            api_version: "v2".to_string(),
            bearer_token: "remote-token".to_string(),
        }
    }

    #[test]
    fn test_generate_url_routes_documents() {
        let url = generate_url(
            &TemplafyConfig::default(),
            &api_settings(),
            &template(DocumentType::Document),
        );
        assert_eq!(
            url,
            "https://acme.api.templafy.com/v2/libraries/space-1/documents/assets/asset-1/generate"
        );
    }

    #[test]
    fn test_generate_url_routes_presentations() {
        let url = generate_url(
            &TemplafyConfig::default(),
            &api_settings(),
            &template(DocumentType::Presentation),
        );
        assert!(url.contains("/presentations/"));
        assert!(!url.contains("/documents/"));
    }

    #[test]
    fn test_generate_url_honours_base_override() {
        let config = TemplafyConfig {
            base_url: Some("http://localhost:9999/".to_string()),
            ..TemplafyConfig::default()
        };
        let url = generate_url(&config, &api_settings(), &template(DocumentType::Document));
        assert_eq!(
            url,
            "http://localhost:9999/v2/libraries/space-1/documents/assets/asset-1/generate"
        );
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let payload = GenerateRequest {
            email: "user@example.com",
            data: serde_json::json!({}),
            include_pdf: true,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "email": "user@example.com",
                "data": {},
                "includePdf": true,
            })
        );
    }
}
