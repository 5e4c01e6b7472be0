// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP access client for the storage backend.
//!
//! [`BackendClient`] owns the bearer token shared by every gateway. The token
//! is fetched lazily: a request that comes back 401 triggers exactly one
//! credential exchange, after which the original request is replayed once and
//! the replay's response is returned whatever its status.

use std::time::Duration;

use remindo_config::model::BackendConfig;
use remindo_core::{RemindoError, StorageError};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Path of the credential exchange endpoint.
const AUTH_PATH: &str = "auth/jwt/login";

/// Status and raw body of a backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

/// A replayable description of one backend call.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl BackendRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Attaches a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated HTTP client shared by all entity gateways.
#[derive(Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    login: String,
    password: SecretString,
    token: RwLock<Option<String>>,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        login: impl Into<String>,
        password: SecretString,
        timeout: Duration,
    ) -> Result<Self, RemindoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemindoError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login: login.into(),
            password,
            token: RwLock::new(None),
        })
    }

    /// Creates a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, RemindoError> {
        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .ok_or_else(|| RemindoError::Config(format!("backend.{key} is not set")))
        };
        Self::new(
            required(&config.host, "host")?,
            required(&config.login, "login")?,
            SecretString::from(required(&config.password, "password")?),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Seeds the shared token, skipping the first credential exchange.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a request, re-authenticating and replaying once on 401.
    pub async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, StorageError> {
        let response = self.send_once(request).await?;
        if response.status != 401 {
            return Ok(response);
        }

        info!(path = request.path.as_str(), "backend rejected token, re-authenticating");
        self.authenticate().await?;
        self.send_once(request).await
    }

    /// Exchanges the service credentials for a fresh bearer token.
    ///
    /// Concurrent callers may each perform an exchange; the last one to
    /// finish wins, and any of the tokens is valid.
    pub async fn authenticate(&self) -> Result<(), StorageError> {
        let form = [
            ("username", self.login.as_str()),
            ("password", self.password.expose_secret()),
        ];
        let response = self
            .client
            .post(self.url(AUTH_PATH))
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        if status != 200 {
            error!(status, body = body.as_str(), "backend authentication failed");
            return Err(StorageError::Auth {
                status,
                detail: body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "backend authentication returned no access token");
            StorageError::Auth {
                status,
                detail: format!("malformed token response: {e}"),
            }
        })?;

        *self.token.write().await = Some(token.access_token);
        info!("backend auth token refreshed");
        Ok(())
    }

    async fn send_once(&self, request: &BackendRequest) -> Result<BackendResponse, StorageError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        debug!(
            method = %request.method,
            path = request.path.as_str(),
            status,
            "backend request completed"
        );
        Ok(BackendResponse { status, body })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    StorageError::Transport {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(uri: &str) -> BackendClient {
        BackendClient::new(
            uri,
            "service",
            SecretString::from("hunter2".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn mount_login(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/jwt/login"))
            .and(body_string_contains("username=service"))
            .and(body_string_contains("password=hunter2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": token, "token_type": "bearer"})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn first_request_authenticates_lazily_and_replays() {
        let server = MockServer::start().await;
        mount_login(&server, "fresh").await;

        Mock::given(method("GET"))
            .and(path("/themes/get_theme/t1"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/themes/get_theme/t1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .execute(&BackendRequest::get("themes/get_theme/t1"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn second_401_is_returned_not_retried() {
        let server = MockServer::start().await;
        mount_login(&server, "fresh").await;

        Mock::given(method("PATCH"))
            .and(path("/alarms/update_alarm/a1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri()).with_token("stale");
        let response = client
            .execute(
                &BackendRequest::patch("alarms/update_alarm/a1")
                    .json(serde_json::json!({"name": "x"})),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn failed_credential_exchange_is_auth_error_without_replay() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/jwt/login"))
            .respond_with(ResponseTemplate::new(400).set_body_string("LOGIN_BAD_CREDENTIALS"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alarms/get_all_ready_alarms"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .execute(&BackendRequest::get("alarms/get_all_ready_alarms"))
            .await
            .unwrap_err();
        match err {
            StorageError::Auth { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "LOGIN_BAD_CREDENTIALS");
            }
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn seeded_token_is_sent_and_query_is_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/users/update_username/42"))
            .and(query_param("new_name", "ann smith"))
            .and(header("authorization", "Bearer seeded"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri())).with_token("seeded");
        let response = client
            .execute(&BackendRequest::patch("users/update_username/42").query("new_name", "ann smith"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .execute(&BackendRequest::get("themes/get_theme/t1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Transport { .. }));
    }
}
