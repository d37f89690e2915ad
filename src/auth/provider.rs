//! Process-wide authentication state.
//!
//! The `SessionProvider` owns the single `Session` snapshot and the single
//! identity client handle. Lifecycle:
//!
//! `uninitialized -> initializing -> { sso-disabled
//!                                   | sso-ready(unauthenticated)
//!                                   | sso-ready(authenticated) }`
//!
//! Initialization runs at most once. `sso-disabled` is terminal for the
//! process; it is entered when the runtime configuration is missing,
//! disabled, or the silent session check cannot reach the provider, and it
//! is never surfaced as a user-facing error. The only autonomous transition
//! afterwards is authenticated -> unauthenticated when a background token
//! refresh fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{Session, SsoConfig};

use super::identity::{IdentityClient, OidcIdentityClient};

/// Period of the background token-refresh timer.
const REFRESH_INTERVAL_SECS: u64 = 30;

/// Minimum remaining validity below which a refresh is actually performed.
const MIN_TOKEN_VALIDITY_SECS: i64 = 30;

pub struct SessionProvider {
    state: Arc<Mutex<Session>>,
    identity: Mutex<Option<Arc<dyn IdentityClient>>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    initialized: AtomicBool,
}

impl SessionProvider {
    /// Create the provider in its uninitialized state (`loading = true`).
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Session::default())),
            identity: Mutex::new(None),
            refresh_task: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    /// Read-only snapshot of the current session state.
    pub fn snapshot(&self) -> Session {
        self.state.lock().expect("session lock poisoned").clone()
    }

    /// Initialize from the backend's runtime SSO configuration. Runs the
    /// whole state machine entry: config fetch, handle construction, silent
    /// session check, profile fetch, refresh timer start.
    pub async fn initialize(&self, api: &ApiClient) {
        let config = api.fetch_sso_config().await;
        let redirect_uri = api.base_url().to_string();
        self.initialize_with(config, move |cfg| {
            let client = OidcIdentityClient::new(cfg.clone(), redirect_uri)?;
            Ok(Arc::new(client) as Arc<dyn IdentityClient>)
        })
        .await;
    }

    /// State-machine entry with the config fetch already resolved and the
    /// handle construction injectable.
    pub(crate) async fn initialize_with<F>(&self, config: Result<SsoConfig>, build: F)
    where
        F: FnOnce(&SsoConfig) -> Result<Arc<dyn IdentityClient>>,
    {
        if self.initialized.swap(true, Ordering::SeqCst) {
            warn!("Session provider already initialized, ignoring");
            return;
        }

        let config = match config {
            Ok(cfg) if cfg.enabled => cfg,
            Ok(_) => {
                info!("SSO is disabled in the backend configuration");
                self.enter_disabled();
                return;
            }
            Err(e) => {
                // Missing config endpoint means "not configured"; degrade
                // silently rather than surfacing an error.
                info!(error = %e, "SSO configuration unavailable, running without SSO");
                self.enter_disabled();
                return;
            }
        };

        let client = match build(&config) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to construct identity client, running without SSO");
                self.enter_disabled();
                return;
            }
        };

        let authenticated = match client.check_session().await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Silent session check failed, running without SSO");
                self.enter_disabled();
                return;
            }
        };

        *self.identity.lock().expect("identity lock poisoned") = Some(Arc::clone(&client));

        if !authenticated {
            debug!("No existing SSO session");
            let mut state = self.state.lock().expect("session lock poisoned");
            state.sso_enabled = true;
            state.authenticated = false;
            state.loading = false;
            return;
        }

        // Profile failure leaves an authenticated session with no user;
        // degraded but usable.
        let user = match client.load_profile().await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Failed to load user profile");
                None
            }
        };

        {
            let mut state = self.state.lock().expect("session lock poisoned");
            state.sso_enabled = true;
            state.authenticated = true;
            state.user = user;
            state.loading = false;
        }

        info!("Resumed existing SSO session");
        self.start_refresh_task(client);
    }

    fn enter_disabled(&self) {
        *self.identity.lock().expect("identity lock poisoned") = None;
        let mut state = self.state.lock().expect("session lock poisoned");
        state.sso_enabled = false;
        state.authenticated = false;
        state.user = None;
        state.loading = false;
    }

    /// Start the recurring token refresh bound to this provider's lifetime.
    fn start_refresh_task(&self, client: Arc<dyn IdentityClient>) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(Self::run_refresh_loop(state, client));
        *self.refresh_task.lock().expect("refresh task lock poisoned") = Some(handle);
    }

    /// Refresh loop: every `REFRESH_INTERVAL_SECS`, renew the token unless
    /// it still has `MIN_TOKEN_VALIDITY_SECS` left. The first failure drops
    /// the session back to unauthenticated and ends the loop.
    async fn run_refresh_loop(state: Arc<Mutex<Session>>, client: Arc<dyn IdentityClient>) {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(REFRESH_INTERVAL_SECS));
        // interval fires immediately; the first refresh belongs one period out
        interval.tick().await;

        loop {
            interval.tick().await;
            match client
                .refresh_token(chrono::Duration::seconds(MIN_TOKEN_VALIDITY_SECS))
                .await
            {
                Ok(()) => debug!("Token refresh ok"),
                Err(e) => {
                    warn!(error = %e, "Token refresh failed, session dropped");
                    let mut session = state.lock().expect("session lock poisoned");
                    session.authenticated = false;
                    session.user = None;
                    break;
                }
            }
        }
    }

    fn identity(&self) -> Option<Arc<dyn IdentityClient>> {
        self.identity
            .lock()
            .expect("identity lock poisoned")
            .clone()
    }

    /// Hand off to the provider's interactive login. Valid only once
    /// initialization finished with a handle; does not change local state.
    pub fn login(&self) -> Result<()> {
        let client = self.identity().context("SSO is not available")?;
        client.login()
    }

    /// Hand off to the provider's logout and clear the local session.
    pub fn logout(&self) -> Result<()> {
        let client = self.identity().context("SSO is not available")?;
        client.logout()?;
        self.shutdown();

        let mut state = self.state.lock().expect("session lock poisoned");
        state.authenticated = false;
        state.user = None;
        Ok(())
    }

    /// Current access token, if a handle exists and holds a valid session.
    pub fn token(&self) -> Option<String> {
        self.identity().and_then(|client| client.token())
    }

    /// Cancel the refresh timer. Idempotent; also runs on drop so tests and
    /// restarts cannot leak the task.
    pub fn shutdown(&self) {
        if let Some(handle) = self
            .refresh_task
            .lock()
            .expect("refresh task lock poisoned")
            .take()
        {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn has_identity(&self) -> bool {
        self.identity
            .lock()
            .expect("identity lock poisoned")
            .is_some()
    }
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SsoUser;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct MockIdentity {
        has_session: bool,
        profile_fails: bool,
        check_fails: bool,
        refresh_fails: bool,
        refresh_calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityClient for MockIdentity {
        async fn check_session(&self) -> Result<bool> {
            if self.check_fails {
                return Err(anyhow!("provider unreachable"));
            }
            Ok(self.has_session)
        }

        fn login(&self) -> Result<()> {
            Ok(())
        }

        fn logout(&self) -> Result<()> {
            Ok(())
        }

        async fn refresh_token(&self, _min_validity: chrono::Duration) -> Result<()> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.refresh_fails {
                return Err(anyhow!("refresh rejected"));
            }
            Ok(())
        }

        fn token(&self) -> Option<String> {
            self.has_session.then(|| "mock-token".to_string())
        }

        async fn load_profile(&self) -> Result<SsoUser> {
            if self.profile_fails {
                return Err(anyhow!("userinfo unavailable"));
            }
            Ok(SsoUser::new(
                "uuid-1".to_string(),
                "ada@example.com".to_string(),
                "Ada".to_string(),
                "Lovelace".to_string(),
            ))
        }
    }

    fn enabled_config() -> SsoConfig {
        SsoConfig {
            enabled: true,
            server_url: "https://kc.example.com".to_string(),
            realm: "portal".to_string(),
            client_id: "portal-web".to_string(),
        }
    }

    fn mock(mock: MockIdentity) -> impl FnOnce(&SsoConfig) -> Result<Arc<dyn IdentityClient>> {
        move |_| Ok(Arc::new(mock) as Arc<dyn IdentityClient>)
    }

    #[test]
    fn test_uninitialized_snapshot_is_loading() {
        let provider = SessionProvider::new();
        let session = provider.snapshot();
        assert!(session.loading);
        assert!(!session.authenticated);
        assert!(!session.sso_enabled);
    }

    #[tokio::test]
    async fn test_config_fetch_failure_disables_sso_without_a_handle() {
        let provider = Arc::new(SessionProvider::new());
        let mut built = false;
        provider
            .initialize_with(Err(anyhow!("404 not found")), |_| {
                built = true;
                Err(anyhow!("must not be called"))
            })
            .await;

        let session = provider.snapshot();
        assert!(!session.sso_enabled);
        assert!(!session.loading);
        assert!(!built, "no identity client may be constructed");
        assert!(!provider.has_identity());
        assert!(provider.token().is_none());
    }

    #[tokio::test]
    async fn test_disabled_config_is_terminal() {
        let provider = Arc::new(SessionProvider::new());
        let config = SsoConfig {
            enabled: false,
            ..enabled_config()
        };
        provider
            .initialize_with(Ok(config), |_| Err(anyhow!("must not be called")))
            .await;

        let session = provider.snapshot();
        assert!(!session.sso_enabled);
        assert!(!session.loading);
        assert!(!provider.has_identity());
    }

    #[tokio::test]
    async fn test_no_existing_session_is_unauthenticated() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(Ok(enabled_config()), mock(MockIdentity::default()))
            .await;

        let session = provider.snapshot();
        assert!(session.sso_enabled);
        assert!(!session.authenticated);
        assert!(session.user.is_none());
        assert!(!session.loading);
        assert!(provider.has_identity());
    }

    #[tokio::test]
    async fn test_resumed_session_loads_user() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(
                Ok(enabled_config()),
                mock(MockIdentity {
                    has_session: true,
                    ..Default::default()
                }),
            )
            .await;

        let session = provider.snapshot();
        assert!(session.authenticated);
        assert_eq!(session.display_name(), Some("Ada Lovelace"));
        assert_eq!(provider.token().as_deref(), Some("mock-token"));
        provider.shutdown();
    }

    /// Sanctioned exception: profile failure leaves authenticated=true with
    /// an absent user.
    #[tokio::test]
    async fn test_profile_failure_keeps_authenticated_without_user() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(
                Ok(enabled_config()),
                mock(MockIdentity {
                    has_session: true,
                    profile_fails: true,
                    ..Default::default()
                }),
            )
            .await;

        let session = provider.snapshot();
        assert!(session.authenticated);
        assert!(session.user.is_none());
        assert!(session.sso_enabled);
        provider.shutdown();
    }

    #[tokio::test]
    async fn test_silent_check_failure_degrades_to_disabled() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(
                Ok(enabled_config()),
                mock(MockIdentity {
                    check_fails: true,
                    ..Default::default()
                }),
            )
            .await;

        let session = provider.snapshot();
        assert!(!session.sso_enabled);
        assert!(!session.authenticated);
        assert!(!provider.has_identity());
    }

    #[tokio::test]
    async fn test_initialization_runs_at_most_once() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(Ok(enabled_config()), mock(MockIdentity::default()))
            .await;
        assert!(provider.snapshot().sso_enabled);

        // A second attempt must not rerun the machine or touch state.
        provider
            .initialize_with(Err(anyhow!("should be ignored")), |_| {
                Err(anyhow!("must not be called"))
            })
            .await;
        assert!(provider.snapshot().sso_enabled);
        assert!(provider.has_identity());
    }

    #[tokio::test]
    async fn test_logout_clears_local_session() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(
                Ok(enabled_config()),
                mock(MockIdentity {
                    has_session: true,
                    ..Default::default()
                }),
            )
            .await;
        assert!(provider.snapshot().authenticated);

        provider.logout().expect("logout delegates");
        let session = provider.snapshot();
        assert!(!session.authenticated);
        assert!(session.user.is_none());
        // sso stays enabled; only the session is gone
        assert!(session.sso_enabled);
        provider.shutdown();
    }

    #[tokio::test]
    async fn test_login_requires_a_handle() {
        let provider = Arc::new(SessionProvider::new());
        provider
            .initialize_with(Err(anyhow!("no config")), |_| Err(anyhow!("unused")))
            .await;
        assert!(provider.login().is_err());
        assert!(provider.logout().is_err());
    }

    /// The only autonomous transition: a failed background refresh drops
    /// the session to unauthenticated and clears the user.
    #[tokio::test(start_paused = true)]
    async fn test_refresh_failure_clears_session() {
        let state = Arc::new(Mutex::new(Session {
            authenticated: true,
            user: Some(SsoUser::new(
                "uuid-1".to_string(),
                "ada@example.com".to_string(),
                "Ada".to_string(),
                "Lovelace".to_string(),
            )),
            sso_enabled: true,
            loading: false,
        }));
        let client: Arc<dyn IdentityClient> = Arc::new(MockIdentity {
            has_session: true,
            refresh_fails: true,
            ..Default::default()
        });

        // Paused time: the interval fires as soon as the runtime is idle.
        SessionProvider::run_refresh_loop(Arc::clone(&state), client).await;

        let session = state.lock().unwrap().clone();
        assert!(!session.authenticated);
        assert!(session.user.is_none());
        // sso_enabled is untouched by the autonomous transition
        assert!(session.sso_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_loop_keeps_running_on_success() {
        let state = Arc::new(Mutex::new(Session::default()));
        let mock = Arc::new(MockIdentity {
            has_session: true,
            ..Default::default()
        });
        let client: Arc<dyn IdentityClient> = Arc::clone(&mock) as Arc<dyn IdentityClient>;

        let task = tokio::spawn(SessionProvider::run_refresh_loop(state, client));
        tokio::time::sleep(std::time::Duration::from_secs(95)).await;
        task.abort();

        // Three periods elapsed -> three refresh attempts.
        assert_eq!(mock.refresh_calls.load(Ordering::SeqCst), 3);
    }
}
