//! Identity client seam for the SSO provider.
//!
//! `IdentityClient` is the capability interface the session provider talks
//! to; `OidcIdentityClient` is the one concrete adapter, a thin wrapper over
//! a Keycloak-style OpenID Connect provider. The interactive login/logout
//! flows are hand-offs to the system browser - their internals belong to the
//! provider, not to this client.

use std::process::Command;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::models::{SsoConfig, SsoUser};

use super::store::TokenStore;

/// Length of the random `state` parameter on the authorization URL.
const STATE_LENGTH: usize = 32;

/// Capability interface over a concrete SSO client.
///
/// Any provider library can sit behind this without touching the session
/// provider: the contract is init (silent check), login, logout, refresh,
/// token snapshot, and profile fetch.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Silent session check: detect an existing authenticated session
    /// without prompting the user. `Ok(true)` means a session was resumed.
    async fn check_session(&self) -> Result<bool>;

    /// Hand off to the provider's interactive login page. Local state is
    /// not changed; the resumed session is picked up on the next launch.
    fn login(&self) -> Result<()>;

    /// Hand off to the provider's logout page and discard local tokens.
    fn logout(&self) -> Result<()>;

    /// Renew the access token unless it is still valid for at least
    /// `min_validity`.
    async fn refresh_token(&self, min_validity: Duration) -> Result<()>;

    /// Snapshot of the current access token, if one is held and unexpired.
    fn token(&self) -> Option<String>;

    /// Fetch the user profile for the current session.
    async fn load_profile(&self) -> Result<SsoUser>;
}

#[derive(Debug, Clone)]
struct TokenSet {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl TokenSet {
    fn is_valid_for(&self, min_validity: Duration) -> bool {
        self.expires_at - Utc::now() > min_validity
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Thin OpenID Connect adapter for a Keycloak-style provider.
pub struct OidcIdentityClient {
    http: reqwest::Client,
    config: SsoConfig,
    /// Where the provider sends the browser back after login/logout; the
    /// portal's web origin.
    redirect_uri: String,
    tokens: Mutex<Option<TokenSet>>,
}

impl OidcIdentityClient {
    pub fn new(config: SsoConfig, redirect_uri: impl Into<String>) -> Result<Self> {
        if config.server_url.is_empty() || config.realm.is_empty() || config.client_id.is_empty() {
            bail!("SSO configuration is incomplete");
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config,
            redirect_uri: redirect_uri.into(),
            tokens: Mutex::new(None),
        })
    }

    fn endpoint(&self, leaf: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/{}",
            self.config.server_url.trim_end_matches('/'),
            self.config.realm,
            leaf
        )
    }

    fn random_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Exchange a refresh token at the provider token endpoint.
    /// `Ok(None)` means the provider rejected the grant (no session);
    /// transport failures propagate as errors.
    async fn refresh_grant(&self, refresh_token: &str) -> Result<Option<TokenSet>> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .context("Failed to reach the SSO token endpoint")?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, body = %body, "Refresh grant rejected");
            return Ok(None);
        }
        if !status.is_success() {
            bail!("SSO token endpoint returned {}", status);
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(Some(TokenSet {
            access_token: parsed.access_token,
            // Keycloak rotates refresh tokens; fall back to the one we sent.
            refresh_token: parsed
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
            expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
        }))
    }

    fn install_tokens(&self, tokens: TokenSet) {
        if let Err(e) = TokenStore::store(&tokens.refresh_token) {
            warn!(error = %e, "Failed to persist refresh token");
        }
        *self.tokens.lock().expect("token lock poisoned") = Some(tokens);
    }

    fn discard_tokens(&self) {
        *self.tokens.lock().expect("token lock poisoned") = None;
        if let Err(e) = TokenStore::clear() {
            debug!(error = %e, "No stored refresh token to clear");
        }
    }
}

#[async_trait]
impl IdentityClient for OidcIdentityClient {
    async fn check_session(&self) -> Result<bool> {
        let stored = match TokenStore::load() {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "No persisted SSO session");
                return Ok(false);
            }
        };

        match self.refresh_grant(&stored).await? {
            Some(tokens) => {
                self.install_tokens(tokens);
                Ok(true)
            }
            None => {
                // Stale token from a previous run; forget it.
                self.discard_tokens();
                Ok(false)
            }
        }
    }

    fn login(&self) -> Result<()> {
        let url = Url::parse_with_params(
            &self.endpoint("auth"),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid"),
                ("state", Self::random_state().as_str()),
            ],
        )
        .context("Failed to build authorization URL")?;

        open_external(url.as_str())
    }

    fn logout(&self) -> Result<()> {
        let url = Url::parse_with_params(
            &self.endpoint("logout"),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("post_logout_redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .context("Failed to build logout URL")?;

        self.discard_tokens();
        open_external(url.as_str())
    }

    async fn refresh_token(&self, min_validity: Duration) -> Result<()> {
        let current = {
            let guard = self.tokens.lock().expect("token lock poisoned");
            guard.clone()
        };

        let Some(current) = current else {
            bail!("No SSO session to refresh");
        };

        if current.is_valid_for(min_validity) {
            return Ok(());
        }

        match self.refresh_grant(&current.refresh_token).await? {
            Some(tokens) => {
                self.install_tokens(tokens);
                Ok(())
            }
            None => {
                self.discard_tokens();
                bail!("SSO session expired");
            }
        }
    }

    fn token(&self) -> Option<String> {
        self.tokens
            .lock()
            .expect("token lock poisoned")
            .as_ref()
            .filter(|t| t.is_valid_for(Duration::zero()))
            .map(|t| t.access_token.clone())
    }

    async fn load_profile(&self) -> Result<SsoUser> {
        let token = self
            .token()
            .context("No access token available for profile fetch")?;

        let response = self
            .http
            .get(self.endpoint("userinfo"))
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to reach the SSO userinfo endpoint")?;

        if !response.status().is_success() {
            bail!("SSO userinfo endpoint returned {}", response.status());
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .context("Failed to parse userinfo response")?;

        Ok(SsoUser::new(
            info.sub,
            info.email.unwrap_or_default(),
            info.given_name.unwrap_or_default(),
            info.family_name.unwrap_or_default(),
        ))
    }
}

/// Open a URL in the system browser (the "external redirect" of the flow).
fn open_external(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    result
        .map(|_| ())
        .with_context(|| format!("Failed to open browser for {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SsoConfig {
        SsoConfig {
            enabled: true,
            server_url: "https://kc.example.com/".to_string(),
            realm: "portal".to_string(),
            client_id: "portal-web".to_string(),
        }
    }

    #[test]
    fn test_endpoint_building() {
        let client =
            OidcIdentityClient::new(config(), "http://localhost:8080").expect("client builds");
        assert_eq!(
            client.endpoint("token"),
            "https://kc.example.com/realms/portal/protocol/openid-connect/token"
        );
        assert_eq!(
            client.endpoint("userinfo"),
            "https://kc.example.com/realms/portal/protocol/openid-connect/userinfo"
        );
    }

    #[test]
    fn test_incomplete_config_is_rejected() {
        let mut cfg = config();
        cfg.realm = String::new();
        assert!(OidcIdentityClient::new(cfg, "http://localhost:8080").is_err());
    }

    #[test]
    fn test_random_state_shape() {
        let a = OidcIdentityClient::random_state();
        let b = OidcIdentityClient::random_state();
        assert_eq!(a.len(), STATE_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_snapshot_filters_expired() {
        let client =
            OidcIdentityClient::new(config(), "http://localhost:8080").expect("client builds");
        assert!(client.token().is_none());

        *client.tokens.lock().unwrap() = Some(TokenSet {
            access_token: "live".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        });
        assert_eq!(client.token().as_deref(), Some("live"));

        *client.tokens.lock().unwrap() = Some(TokenSet {
            access_token: "stale".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() - Duration::minutes(5),
        });
        assert!(client.token().is_none());
    }

    #[test]
    fn test_token_set_validity_window() {
        let set = TokenSet {
            access_token: "t".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::seconds(60),
        };
        assert!(set.is_valid_for(Duration::seconds(30)));
        assert!(!set.is_valid_for(Duration::seconds(120)));
    }
}
