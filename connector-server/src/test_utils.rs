//! Shared test fixture: a fully wired application around an in-memory store
//! and a wiremock stand-in for the Templafy API.

use crate::config::ConnectorConfig;
use crate::models::{AccessTokenRecord, DocumentType, NewTemplateItem, TemplateItem};
use crate::settings::{
    CONNECTOR_CLIENT_ID, CONNECTOR_CLIENT_SECRET, DOC_GEN_USE_TEST_EMAIL, TEMPLAFY_API_VERSION,
    TEMPLAFY_BEARER_TOKEN, TEMPLAFY_TENANT_ID,
};
use crate::state::AppState;
use crate::store::StoreBackend;
use axum::{body::Body, Router};
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::MockServer;

pub(crate) const TEST_CLIENT_ID: &str = "test-client";
pub(crate) const TEST_CLIENT_SECRET: &str = "test-secret";

pub(crate) struct TestFixture {
    pub app: Router,
    pub config: Arc<ConnectorConfig>,
    pub state: AppState,
    pub templafy_mock: MockServer,
}

impl TestFixture {
    /// Stand up the full application with an in-memory store, a mock remote
    /// API and a working set of connector settings.
    pub(crate) async fn new() -> Self {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let templafy_mock = MockServer::start().await;
        let config = ConnectorConfig::for_test_with_mocks(&templafy_mock);
        let state = AppState::new(config)
            .await
            .expect("Failed to build test state");

        for (key, value) in [
            (CONNECTOR_CLIENT_ID, TEST_CLIENT_ID),
            (CONNECTOR_CLIENT_SECRET, TEST_CLIENT_SECRET),
            (TEMPLAFY_TENANT_ID, "acme"),
            (TEMPLAFY_API_VERSION, "v2"),
            (TEMPLAFY_BEARER_TOKEN, "remote-token"),
            (DOC_GEN_USE_TEST_EMAIL, "false"),
        ] {
            state
                .store
                .upsert_setting(key, value)
                .await
                .expect("Failed to seed setting");
        }

        let app = crate::create_app(state.clone()).await;
        Self {
            config: state.config.clone(),
            app,
            state,
            templafy_mock,
        }
    }

    pub(crate) async fn upsert_setting(&self, key: &str, value: &str) {
        self.state
            .store
            .upsert_setting(key, value)
            .await
            .expect("Failed to store setting");
    }

    pub(crate) async fn seed_template(
        &self,
        name: &str,
        description: &str,
        space_id: &str,
        asset_id: &str,
    ) -> TemplateItem {
        self.seed_item(name, description, space_id, asset_id, DocumentType::Document)
            .await
    }

    pub(crate) async fn seed_presentation(
        &self,
        name: &str,
        space_id: &str,
        asset_id: &str,
    ) -> TemplateItem {
        self.seed_item(name, "", space_id, asset_id, DocumentType::Presentation)
            .await
    }

    async fn seed_item(
        &self,
        name: &str,
        description: &str,
        space_id: &str,
        asset_id: &str,
        document_type: DocumentType,
    ) -> TemplateItem {
        self.state
            .store
            .insert_template(NewTemplateItem {
                name: name.to_string(),
                description: description.to_string(),
                space_id: space_id.to_string(),
                asset_id: asset_id.to_string(),
                document_type,
            })
            .await
            .expect("Failed to seed template item")
    }

    /// Run the client-credentials grant and return the issued access token
    pub(crate) async fn issue_token(&self) -> String {
        let response = self
            .post_form(
                "/oauth/token",
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", TEST_CLIENT_ID),
                    ("client_secret", TEST_CLIENT_SECRET),
                ],
            )
            .await;
        response.assert_status(StatusCode::OK);
        response.json["access_token"]
            .as_str()
            .expect("Token response has no access_token")
            .to_string()
    }

    /// Insert a token record that expired in the past, bypassing the grant
    pub(crate) async fn insert_expired_token(&self) -> String {
        let token = "expiredexpiredexpiredexpiredexpiredexpiredexpiredexpiredexpired0";
        self.state
            .store
            .insert_token(&AccessTokenRecord {
                token: token.to_string(),
                client_id: TEST_CLIENT_ID.to_string(),
                user_id: None,
                scope: None,
                expires_at: 1,
                issued_at: 0,
            })
            .await
            .expect("Failed to insert token record");
        token.to_string()
    }

    pub(crate) async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    pub(crate) async fn get_with_token(&self, uri: &str, token: &str) -> TestResponse {
        self.get_with_headers(uri, &[("Authorization", &format!("Bearer {token}"))])
            .await
    }

    pub(crate) async fn get_with_headers(
        &self,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.send(request).await
    }

    /// POST a form-urlencoded body, optionally with extra headers
    pub(crate) async fn post_form_with_headers(
        &self,
        uri: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body = serde_urlencoded::to_string(params).expect("Failed to encode form body");
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::from(body)).expect("Failed to build request");
        self.send(request).await
    }

    pub(crate) async fn post_form(&self, uri: &str, params: &[(&str, &str)]) -> TestResponse {
        self.post_form_with_headers(uri, params, &[]).await
    }

    pub(crate) async fn put_json(
        &self,
        uri: &str,
        api_key: Option<&str>,
        body: serde_json::Value,
    ) -> TestResponse {
        self.send_json(Method::PUT, uri, api_key, body).await
    }

    pub(crate) async fn post_json(
        &self,
        uri: &str,
        api_key: Option<&str>,
        body: serde_json::Value,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, api_key, body).await
    }

    async fn send_json(
        &self,
        method: Method,
        uri: &str,
        api_key: Option<&str>,
        body: serde_json::Value,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let raw_body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        let json = if raw_body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&raw_body).unwrap_or(serde_json::Value::Null)
        };
        TestResponse { status, json }
    }
}

pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub json: serde_json::Value,
}

impl TestResponse {
    #[track_caller]
    pub(crate) fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "unexpected status, body: {}",
            self.json
        );
    }

    pub(crate) fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response body")
    }
}
