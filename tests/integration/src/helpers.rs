//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, minting caller tokens
//! and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use presence_api::{create_app, create_app_state};
use presence_common::{AppConfig, Claims, JwtService, ViewerStoreKind};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Issuer used for tokens when the server does not pin one
const TEST_ISSUER: &str = "https://issuer.test";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    jwt: JwtService,
    issuer: String,
    audience: Option<String>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server using the environment's configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server whose viewers live in Redis
    pub async fn start_with_redis() -> Result<Self> {
        let mut config = test_config()?;
        config.presence.store = ViewerStoreKind::Redis;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let jwt = JwtService::from_config(&config.auth);
        let issuer = config
            .auth
            .issuer
            .clone()
            .unwrap_or_else(|| TEST_ISSUER.to_string());
        let audience = config.auth.audience.clone();

        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            jwt,
            issuer,
            audience,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Mint a caller token for `subject`
    pub fn token_for(&self, subject: &str, name: Option<&str>, email: Option<&str>) -> Result<String> {
        let mut claims = Claims::new(self.issuer.clone(), subject, 3600);
        claims.aud.clone_from(&self.audience);
        claims.name = name.map(str::to_string);
        claims.email = email.map(str::to_string);
        Ok(self.jwt.encode(&claims)?)
    }

    /// Mint a token and provision its account, returning (token, user id)
    pub async fn sign_up(&self, name: &str) -> Result<(String, String)> {
        let subject = crate::fixtures::unique_subject(name);
        let token = self.token_for(&subject, Some(name), None)?;
        let response = self.post_auth("/api/v1/users/@me", Some(&token)).await?;
        let provisioned: crate::fixtures::ProvisionResponse =
            assert_json(response, StatusCode::OK).await?;
        Ok((token, provisioned.user_id))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.get_auth(path, None).await
    }

    /// Make a GET request with an optional bearer token
    pub async fn get_auth(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let request = self.client.get(format!("{}{}", self.base_url(), path));
        Ok(with_token(request, token).send().await?)
    }

    /// Make a body-less POST request with an optional bearer token
    pub async fn post_auth(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let request = self.client.post(format!("{}{}", self.base_url(), path));
        Ok(with_token(request, token).send().await?)
    }

    /// Make a DELETE request with an optional bearer token
    pub async fn delete_auth(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let request = self.client.delete(format!("{}{}", self.base_url(), path));
        Ok(with_token(request, token).send().await?)
    }
}

fn with_token(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Create a test configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if the test environment is available
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    for var in ["DATABASE_URL", "AUTH_JWT_SECRET", "API_PORT"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Like [`check_test_env`], additionally requiring Redis
pub async fn check_redis_env() -> bool {
    if !check_test_env().await {
        return false;
    }
    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
