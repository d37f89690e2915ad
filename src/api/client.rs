//! HTTP client for the portal backend.
//!
//! All business logic (credential checks, token issuance, mail delivery,
//! SSO token exchange) lives behind these endpoints; the client only moves
//! JSON back and forth and normalizes failures into `ApiError`.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{
    LoginResponse, MailSettings, SsoConfig, SsoSettings, SsoTestResponse, StatusResponse,
};
use crate::validate::SignupForm;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the portal backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token sent with subsequent requests.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Create a client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    /// The backend base URL (also the portal's web origin, used as the SSO
    /// redirect target).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with the most
    /// specific message available if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Account endpoints =====

    /// Fetch the authenticated landing greeting (plain text).
    pub async fn fetch_hello(&self) -> Result<String> {
        let url = self.url("/api/hello");
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to fetch greeting")?;

        let response = Self::check_response(response).await?;
        response.text().await.context("Failed to read greeting body")
    }

    /// Submit local credentials.
    ///
    /// A 2xx response parses into `LoginResponse`; the caller decides success
    /// from its `status` field. Non-2xx surfaces the backend message when the
    /// error body carries one.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self.post("/api/login", &body).await?;
        debug!(status = %response.status, "Login response received");
        Ok(response)
    }

    /// Submit the signup form.
    pub async fn signup(&self, form: &SignupForm) -> Result<StatusResponse> {
        self.post("/api/signup", form).await
    }

    /// Redeem an email verification token.
    pub async fn verify(&self, token: &str) -> Result<StatusResponse> {
        let url = self.url("/api/verify");
        let response = self
            .client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
            .context("Failed to send verification request")?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse verification response")
    }

    // ===== Settings endpoints =====

    pub async fn fetch_mail_settings(&self) -> Result<MailSettings> {
        self.get("/api/settings/mail").await
    }

    /// Save the mail configuration. The backend replies with an empty body,
    /// so success is just a 2xx.
    pub async fn save_mail_settings(&self, settings: &MailSettings) -> Result<()> {
        let url = self.url("/api/settings/mail");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(settings)
            .send()
            .await
            .context("Failed to save mail settings")?;

        Self::check_response(response).await?;
        Ok(())
    }

    pub async fn fetch_sso_settings(&self) -> Result<SsoSettings> {
        self.get("/api/settings/keycloak").await
    }

    pub async fn save_sso_settings(&self, settings: &SsoSettings) -> Result<StatusResponse> {
        self.post("/api/settings/keycloak", settings).await
    }

    /// Probe the provider with the in-progress (possibly unsaved) record.
    pub async fn test_sso_connection(&self, settings: &SsoSettings) -> Result<SsoTestResponse> {
        self.post("/api/settings/keycloak/test", settings).await
    }

    // ===== SSO runtime configuration =====

    /// Fetch the runtime SSO configuration. A non-2xx here is how the
    /// backend signals "SSO not configured"; the caller treats the error as
    /// disabled.
    pub async fn fetch_sso_config(&self) -> Result<SsoConfig> {
        self.get("/api/auth/sso/config").await
    }
}
