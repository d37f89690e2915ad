//! Application state management for the portal client.
//!
//! `App` is the root navigator: it owns the current screen, the top-level
//! current-user value, per-screen form state, and the channel that carries
//! background request results back into the render loop. The session
//! provider is owned here too, but its state machine lives in `auth`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::SessionProvider;
use crate::config::Config;
use crate::models::{
    LoginResponse, MailSettings, Session, SsoSettings, SsoTestResponse, StatusResponse,
};
use crate::validate::{self, SignupErrors, SignupField, SignupForm};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A handful of in-flight requests at most; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for text field input.
pub const MAX_FIELD_LENGTH: usize = 100;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Delay before the scheduled redirect after signup/verification success.
const REDIRECT_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level screens the root navigator routes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Signup,
    Verify,
    Settings,
}

/// Where the app starts, derived from the command line.
#[derive(Debug, Clone)]
pub enum Launch {
    Home,
    /// `--verify` was given; the payload is the extracted token, if any.
    Verify(Option<String>),
}

/// Kind of a user-facing screen message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// A message shown inline on a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: MessageKind,
    pub text: String,
}

impl Feedback {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }
}

/// Focus positions on the signed-out Home (login) card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    SsoButton,
    Email,
    Password,
    Submit,
    SignupLink,
}

impl LoginFocus {
    pub fn next(self, sso_enabled: bool) -> Self {
        match self {
            LoginFocus::SsoButton => LoginFocus::Email,
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Submit,
            LoginFocus::Submit => LoginFocus::SignupLink,
            LoginFocus::SignupLink => {
                if sso_enabled {
                    LoginFocus::SsoButton
                } else {
                    LoginFocus::Email
                }
            }
        }
    }

    pub fn prev(self, sso_enabled: bool) -> Self {
        match self {
            LoginFocus::SsoButton => LoginFocus::SignupLink,
            LoginFocus::Email => {
                if sso_enabled {
                    LoginFocus::SsoButton
                } else {
                    LoginFocus::SignupLink
                }
            }
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Submit => LoginFocus::Password,
            LoginFocus::SignupLink => LoginFocus::Submit,
        }
    }
}

/// Focus positions on the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Submit,
    LoginLink,
}

impl SignupFocus {
    pub fn next(self) -> Self {
        match self {
            SignupFocus::FirstName => SignupFocus::LastName,
            SignupFocus::LastName => SignupFocus::Email,
            SignupFocus::Email => SignupFocus::Password,
            SignupFocus::Password => SignupFocus::ConfirmPassword,
            SignupFocus::ConfirmPassword => SignupFocus::Submit,
            SignupFocus::Submit => SignupFocus::LoginLink,
            SignupFocus::LoginLink => SignupFocus::FirstName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SignupFocus::FirstName => SignupFocus::LoginLink,
            SignupFocus::LastName => SignupFocus::FirstName,
            SignupFocus::Email => SignupFocus::LastName,
            SignupFocus::Password => SignupFocus::Email,
            SignupFocus::ConfirmPassword => SignupFocus::Password,
            SignupFocus::Submit => SignupFocus::ConfirmPassword,
            SignupFocus::LoginLink => SignupFocus::Submit,
        }
    }

    /// The form field under this focus, if it is one.
    pub fn field(self) -> Option<SignupField> {
        match self {
            SignupFocus::FirstName => Some(SignupField::FirstName),
            SignupFocus::LastName => Some(SignupField::LastName),
            SignupFocus::Email => Some(SignupField::Email),
            SignupFocus::Password => Some(SignupField::Password),
            SignupFocus::ConfirmPassword => Some(SignupField::ConfirmPassword),
            SignupFocus::Submit | SignupFocus::LoginLink => None,
        }
    }
}

/// Focus positions on the settings screen, mail panel first, SSO second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFocus {
    MailHost,
    MailPort,
    MailUsername,
    MailPassword,
    MailProtocol,
    MailAuth,
    MailStarttls,
    MailFromEmail,
    MailFromName,
    MailSave,
    SsoEnabled,
    SsoServerUrl,
    SsoRealm,
    SsoClientId,
    SsoClientSecret,
    SsoSave,
    SsoTest,
}

impl SettingsFocus {
    pub fn next(self) -> Self {
        use SettingsFocus::*;
        match self {
            MailHost => MailPort,
            MailPort => MailUsername,
            MailUsername => MailPassword,
            MailPassword => MailProtocol,
            MailProtocol => MailAuth,
            MailAuth => MailStarttls,
            MailStarttls => MailFromEmail,
            MailFromEmail => MailFromName,
            MailFromName => MailSave,
            MailSave => SsoEnabled,
            SsoEnabled => SsoServerUrl,
            SsoServerUrl => SsoRealm,
            SsoRealm => SsoClientId,
            SsoClientId => SsoClientSecret,
            SsoClientSecret => SsoSave,
            SsoSave => SsoTest,
            SsoTest => MailHost,
        }
    }

    pub fn prev(self) -> Self {
        use SettingsFocus::*;
        match self {
            MailHost => SsoTest,
            MailPort => MailHost,
            MailUsername => MailPort,
            MailPassword => MailUsername,
            MailProtocol => MailPassword,
            MailAuth => MailProtocol,
            MailStarttls => MailAuth,
            MailFromEmail => MailStarttls,
            MailFromName => MailFromEmail,
            MailSave => MailFromName,
            SsoEnabled => MailSave,
            SsoServerUrl => SsoEnabled,
            SsoRealm => SsoServerUrl,
            SsoClientId => SsoRealm,
            SsoClientSecret => SsoClientId,
            SsoSave => SsoClientSecret,
            SsoTest => SsoSave,
        }
    }

    /// Whether this position is in the mail panel.
    pub fn in_mail_panel(self) -> bool {
        use SettingsFocus::*;
        matches!(
            self,
            MailHost
                | MailPort
                | MailUsername
                | MailPassword
                | MailProtocol
                | MailAuth
                | MailStarttls
                | MailFromEmail
                | MailFromName
                | MailSave
        )
    }
}

// ============================================================================
// Per-Screen State
// ============================================================================

/// Signed-out Home card state (local credential login).
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub feedback: Option<Feedback>,
    pub pending: bool,
    pub focus: LoginFocus,
}

/// Signup screen state.
pub struct SignupState {
    pub form: SignupForm,
    pub errors: SignupErrors,
    pub feedback: Option<Feedback>,
    pub pending: bool,
    pub focus: SignupFocus,
}

/// Verification screen state.
pub struct VerifyState {
    pub token: Option<String>,
    pub feedback: Option<Feedback>,
    pub pending: bool,
}

/// Settings screen state: two independent panels.
pub struct SettingsState {
    pub mail: MailSettings,
    pub mail_feedback: Option<Feedback>,
    pub mail_pending: bool,
    pub sso: SsoSettings,
    pub sso_feedback: Option<Feedback>,
    pub sso_pending: bool,
    pub testing: bool,
    pub focus: SettingsFocus,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            mail: MailSettings::default(),
            mail_feedback: None,
            mail_pending: false,
            sso: SsoSettings::default(),
            sso_feedback: None,
            sso_pending: false,
            testing: false,
            focus: SettingsFocus::MailHost,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results coming back from spawned backend requests.
enum TaskResult {
    Login(anyhow::Result<LoginResponse>),
    Signup(anyhow::Result<StatusResponse>),
    Verify(anyhow::Result<StatusResponse>),
    Hello(anyhow::Result<String>),
    MailLoaded(anyhow::Result<MailSettings>),
    MailSaved(anyhow::Result<()>),
    SsoLoaded(anyhow::Result<SsoSettings>),
    SsoSaved(anyhow::Result<StatusResponse>),
    SsoTested(anyhow::Result<SsoTestResponse>),
}

/// A task result tagged with the screen that requested it. Results for a
/// screen the user has left are discarded (the unmount guard).
struct TaskMessage {
    screen: Screen,
    result: TaskResult,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<SessionProvider>,

    // Navigation
    pub screen: Screen,
    pub current_user: Option<String>,

    // Per-screen state
    pub login: LoginState,
    pub signup: SignupState,
    pub verify: VerifyState,
    pub settings: SettingsState,

    // Signed-in landing content
    pub hello_message: Option<String>,
    hello_pending: bool,

    // Scheduled navigation (signup/verify success redirects)
    pending_redirect: Option<(Instant, Screen)>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskMessage>,
    task_tx: mpsc::Sender<TaskMessage>,
}

impl App {
    pub fn new(config: Config, api: ApiClient, session: Arc<SessionProvider>, launch: Launch) -> Self {
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Seed the login email from env or the remembered address
        let email = std::env::var("PORTAL_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let (screen, verify_token) = match launch {
            Launch::Home => (Screen::Home, None),
            Launch::Verify(token) => (Screen::Verify, token),
        };

        Self {
            config,
            api,
            session,
            screen,
            current_user: None,
            login: LoginState {
                email,
                password: String::new(),
                feedback: None,
                pending: false,
                focus: LoginFocus::Email,
            },
            signup: SignupState {
                form: SignupForm::default(),
                errors: SignupErrors::default(),
                feedback: None,
                pending: false,
                focus: SignupFocus::FirstName,
            },
            verify: VerifyState {
                token: verify_token,
                feedback: None,
                pending: false,
            },
            settings: SettingsState::default(),
            hello_message: None,
            hello_pending: false,
            pending_redirect: None,
            task_rx,
            task_tx,
        }
    }

    /// Run the current screen's mount action. Called once after startup and
    /// again by `navigate`.
    pub fn mount_screen(&mut self) {
        match self.screen {
            Screen::Verify => self.begin_verification(),
            Screen::Settings => self.load_settings(),
            Screen::Home | Screen::Signup => {}
        }
    }

    /// Session snapshot for rendering.
    pub fn session_snapshot(&self) -> Session {
        self.session.snapshot()
    }

    /// The effective signed-in display name: a local login wins, otherwise
    /// the SSO user.
    pub fn display_user(&self) -> Option<String> {
        if let Some(ref name) = self.current_user {
            return Some(name.clone());
        }
        let session = self.session.snapshot();
        if session.authenticated {
            // Authenticated with no profile is a sanctioned degraded state.
            return Some(
                session
                    .display_name()
                    .unwrap_or("Signed in")
                    .to_string(),
            );
        }
        None
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn navigate(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        debug!(?screen, "Navigating");
        // Leaving a screen discards its in-flight work.
        self.reset_pending();
        self.pending_redirect = None;
        self.screen = screen;
        self.mount_screen();
    }

    fn reset_pending(&mut self) {
        self.login.pending = false;
        self.signup.pending = false;
        self.verify.pending = false;
        self.settings.mail_pending = false;
        self.settings.sso_pending = false;
        self.settings.testing = false;
        self.hello_pending = false;
    }

    fn schedule_redirect(&mut self, screen: Screen) {
        self.pending_redirect = Some((Instant::now() + REDIRECT_DELAY, screen));
    }

    /// Fire a due scheduled redirect. Called from the main loop tick.
    pub fn check_redirect(&mut self) {
        if let Some((at, screen)) = self.pending_redirect {
            if Instant::now() >= at {
                self.pending_redirect = None;
                self.navigate(screen);
            }
        }
    }

    // =========================================================================
    // Session actions
    // =========================================================================

    /// Hand off to the SSO provider's login page.
    pub fn sso_login(&mut self) {
        if let Err(e) = self.session.login() {
            warn!(error = %e, "SSO login hand-off failed");
            self.login.feedback = Some(Feedback::error("SSO login is not available"));
        }
    }

    /// Sign out: clear the local user, and end the SSO session if one exists.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.hello_message = None;
        if self.session.snapshot().authenticated {
            if let Err(e) = self.session.logout() {
                warn!(error = %e, "SSO logout failed");
            }
        }
        info!("Signed out");
    }

    // =========================================================================
    // Local-credential login
    // =========================================================================

    pub fn submit_login(&mut self) {
        if self.config.guard_double_submit && self.login.pending {
            return;
        }

        if self.login.email.is_empty() || self.login.password.is_empty() {
            self.login.feedback = Some(Feedback::error("Email and password are required"));
            return;
        }

        self.login.feedback = None;
        self.login.pending = true;

        let api = self.api.clone();
        let email = self.login.email.clone();
        let password = self.login.password.clone();
        self.spawn_task(Screen::Home, async move {
            TaskResult::Login(api.login(&email, &password).await)
        });
    }

    fn process_login_result(&mut self, result: anyhow::Result<LoginResponse>) {
        self.login.pending = false;
        match result {
            Ok(response) if response.is_success() => {
                let name = response.display_name();
                info!(user = %name, "Login successful");
                self.login.feedback = Some(Feedback::success(response.message));
                self.login.password.clear();

                self.config.last_email = Some(self.login.email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.current_user = Some(name);
            }
            Ok(response) => {
                // Backend validated the request but rejected the credentials
                let message = if response.message.is_empty() {
                    "Login failed".to_string()
                } else {
                    response.message
                };
                self.login.feedback = Some(Feedback::error(message));
            }
            Err(e) => {
                warn!(error = %e, "Login request failed");
                self.login.feedback =
                    Some(Feedback::error(surface_error(&e, "Login failed. Please try again.")));
            }
        }
    }

    // =========================================================================
    // Signup
    // =========================================================================

    pub fn submit_signup(&mut self) {
        if self.config.guard_double_submit && self.signup.pending {
            return;
        }

        // Fail fast: no network call when any rule is violated.
        let errors = validate::validate_signup(&self.signup.form);
        if !errors.is_empty() {
            self.signup.errors = errors;
            return;
        }

        self.signup.errors = SignupErrors::default();
        self.signup.feedback = None;
        self.signup.pending = true;

        let api = self.api.clone();
        let form = self.signup.form.clone();
        self.spawn_task(Screen::Signup, async move {
            TaskResult::Signup(api.signup(&form).await)
        });
    }

    fn process_signup_result(&mut self, result: anyhow::Result<StatusResponse>) {
        self.signup.pending = false;
        match result {
            Ok(response) if response.is_success() => {
                self.signup.feedback = Some(Feedback::success(response.message));
                self.signup.form = SignupForm::default();
                self.schedule_redirect(Screen::Home);
            }
            Ok(response) => {
                self.signup.feedback = Some(Feedback::error(response.message));
            }
            Err(e) => {
                warn!(error = %e, "Signup request failed");
                self.signup.feedback = Some(Feedback::error(surface_error(
                    &e,
                    "Signup failed. Please try again.",
                )));
            }
        }
    }

    // =========================================================================
    // Email verification
    // =========================================================================

    pub fn begin_verification(&mut self) {
        match self.verify.token.clone() {
            None => {
                // Terminal: no token, no network call.
                self.verify.feedback = Some(Feedback::error("Invalid verification link"));
            }
            Some(token) => {
                self.verify.feedback = Some(Feedback::info("Verifying your email..."));
                self.verify.pending = true;
                let api = self.api.clone();
                self.spawn_task(Screen::Verify, async move {
                    TaskResult::Verify(api.verify(&token).await)
                });
            }
        }
    }

    fn process_verify_result(&mut self, result: anyhow::Result<StatusResponse>) {
        self.verify.pending = false;
        match result {
            Ok(response) if response.is_success() => {
                self.verify.feedback = Some(Feedback::success(response.message));
                self.schedule_redirect(Screen::Home);
            }
            Ok(response) => {
                self.verify.feedback = Some(Feedback::error(response.message));
            }
            Err(e) => {
                warn!(error = %e, "Verification request failed");
                self.verify.feedback = Some(Feedback::error(surface_error(
                    &e,
                    "Verification failed. Please try again.",
                )));
            }
        }
    }

    // =========================================================================
    // Landing greeting
    // =========================================================================

    /// Fetch the landing greeting once a user is present. Called from the
    /// main loop tick so both login paths (local and SSO) trigger it.
    pub fn maybe_fetch_hello(&mut self) {
        if self.screen != Screen::Home
            || self.hello_pending
            || self.hello_message.is_some()
            || self.display_user().is_none()
        {
            return;
        }

        self.hello_pending = true;
        let api = self.api.with_token(self.session.token());
        self.spawn_task(Screen::Home, async move {
            TaskResult::Hello(api.fetch_hello().await)
        });
    }

    fn process_hello_result(&mut self, result: anyhow::Result<String>) {
        self.hello_pending = false;
        match result {
            Ok(message) => self.hello_message = Some(message),
            Err(e) => {
                // Not user-fatal; the landing card just keeps its placeholder.
                debug!(error = %e, "Greeting fetch failed");
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Mount action: fetch both panels independently. A failed fetch leaves
    /// the in-memory values (defaults or prior edits) in place.
    pub fn load_settings(&mut self) {
        self.settings.mail_feedback = None;
        self.settings.sso_feedback = None;

        let api = self.api.clone();
        self.spawn_task(Screen::Settings, async move {
            TaskResult::MailLoaded(api.fetch_mail_settings().await)
        });

        let api = self.api.clone();
        self.spawn_task(Screen::Settings, async move {
            TaskResult::SsoLoaded(api.fetch_sso_settings().await)
        });
    }

    pub fn save_mail_settings(&mut self) {
        if self.config.guard_double_submit && self.settings.mail_pending {
            return;
        }
        self.settings.mail_feedback = None;
        self.settings.mail_pending = true;

        let api = self.api.clone();
        let mail = self.settings.mail.clone();
        self.spawn_task(Screen::Settings, async move {
            TaskResult::MailSaved(api.save_mail_settings(&mail).await)
        });
    }

    pub fn save_sso_settings(&mut self) {
        if self.config.guard_double_submit && self.settings.sso_pending {
            return;
        }
        self.settings.sso_feedback = None;
        self.settings.sso_pending = true;

        let api = self.api.clone();
        let sso = self.settings.sso.clone();
        self.spawn_task(Screen::Settings, async move {
            TaskResult::SsoSaved(api.save_sso_settings(&sso).await)
        });
    }

    /// Probe the provider with the in-progress (possibly unsaved) record.
    pub fn test_sso_connection(&mut self) {
        if self.settings.testing {
            return;
        }
        self.settings.sso_feedback = None;
        self.settings.testing = true;

        let api = self.api.clone();
        let sso = self.settings.sso.clone();
        self.spawn_task(Screen::Settings, async move {
            TaskResult::SsoTested(api.test_sso_connection(&sso).await)
        });
    }

    fn process_mail_loaded(&mut self, result: anyhow::Result<MailSettings>) {
        match result {
            Ok(mail) => self.settings.mail = mail,
            Err(e) => {
                warn!(error = %e, "Mail settings fetch failed");
                self.settings.mail_feedback =
                    Some(Feedback::error("Could not load mail settings"));
            }
        }
    }

    fn process_mail_saved(&mut self, result: anyhow::Result<()>) {
        self.settings.mail_pending = false;
        match result {
            Ok(()) => {
                self.settings.mail_feedback =
                    Some(Feedback::success("Settings saved successfully!"));
            }
            Err(e) => {
                warn!(error = %e, "Mail settings save failed");
                self.settings.mail_feedback =
                    Some(Feedback::error(surface_error(&e, "Failed to save settings")));
            }
        }
    }

    fn process_sso_loaded(&mut self, result: anyhow::Result<SsoSettings>) {
        match result {
            Ok(sso) => self.settings.sso = sso,
            Err(e) => {
                warn!(error = %e, "SSO settings fetch failed");
                self.settings.sso_feedback =
                    Some(Feedback::error("Could not load SSO settings"));
            }
        }
    }

    fn process_sso_saved(&mut self, result: anyhow::Result<StatusResponse>) {
        self.settings.sso_pending = false;
        match result {
            Ok(response) if response.is_success() => {
                self.settings.sso_feedback = Some(Feedback::success(
                    "SSO settings saved successfully! Changes take effect on next launch.",
                ));
            }
            Ok(response) => {
                let message = if response.message.is_empty() {
                    "Failed to save SSO settings".to_string()
                } else {
                    response.message
                };
                self.settings.sso_feedback = Some(Feedback::error(message));
            }
            Err(e) => {
                warn!(error = %e, "SSO settings save failed");
                self.settings.sso_feedback = Some(Feedback::error(surface_error(
                    &e,
                    "Error saving SSO settings",
                )));
            }
        }
    }

    fn process_sso_tested(&mut self, result: anyhow::Result<SsoTestResponse>) {
        self.settings.testing = false;
        match result {
            Ok(response) if response.success => {
                let issuer = response.issuer.unwrap_or_default();
                self.settings.sso_feedback = Some(Feedback::success(format!(
                    "Connection successful! Issuer: {}",
                    issuer
                )));
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "unknown error".to_string());
                self.settings.sso_feedback =
                    Some(Feedback::error(format!("Connection failed: {}", message)));
            }
            Err(e) => {
                warn!(error = %e, "SSO connection test failed");
                self.settings.sso_feedback = Some(Feedback::error(surface_error(
                    &e,
                    "Error testing connection",
                )));
            }
        }
    }

    // =========================================================================
    // Background task plumbing
    // =========================================================================

    fn spawn_task<F>(&self, screen: Screen, fut: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = fut.await;
            if tx.send(TaskMessage { screen, result }).await.is_err() {
                debug!("Task result dropped - app shut down");
            }
        });
    }

    /// Drain completed background tasks. Called from the main loop tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(message) = self.task_rx.try_recv() {
            self.process_task_message(message);
        }
    }

    fn process_task_message(&mut self, message: TaskMessage) {
        // Unmount guard: the user navigated away, the response is stale.
        if message.screen != self.screen {
            debug!(from = ?message.screen, now = ?self.screen, "Discarding result for inactive screen");
            return;
        }

        match message.result {
            TaskResult::Login(result) => self.process_login_result(result),
            TaskResult::Signup(result) => self.process_signup_result(result),
            TaskResult::Verify(result) => self.process_verify_result(result),
            TaskResult::Hello(result) => self.process_hello_result(result),
            TaskResult::MailLoaded(result) => self.process_mail_loaded(result),
            TaskResult::MailSaved(result) => self.process_mail_saved(result),
            TaskResult::SsoLoaded(result) => self.process_sso_loaded(result),
            TaskResult::SsoSaved(result) => self.process_sso_saved(result),
            TaskResult::SsoTested(result) => self.process_sso_tested(result),
        }
    }
}

/// Pick the message shown to the user for a failed request: the backend's
/// own words when it spoke, a generic fallback for transport-level noise.
fn surface_error(err: &anyhow::Error, fallback: &str) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::NetworkError(_)) | None => fallback.to_string(),
        Some(api_err) => api_err.to_string(),
    }
}
