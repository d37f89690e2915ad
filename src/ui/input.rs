//! Keyboard event handling.
//!
//! Translates key events into application state changes. Returns `true`
//! from `handle_input` when the app should quit.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    App, LoginFocus, Screen, SettingsFocus, SignupFocus, MAX_FIELD_LENGTH, MAX_PASSWORD_LENGTH,
};
use crate::validate::SignupField;

/// Append a printable char, respecting the field's length cap.
fn push_char(field: &mut String, c: char, max: usize) {
    if !c.is_control() && field.chars().count() < max {
        field.push(c);
    }
}

pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.screen {
        Screen::Home => {
            if app.display_user().is_some() {
                handle_landing_input(app, key)
            } else {
                handle_login_input(app, key)
            }
        }
        Screen::Signup => handle_signup_input(app, key),
        Screen::Verify => handle_verify_input(app, key),
        Screen::Settings => handle_settings_input(app, key),
    }
}

fn handle_landing_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('g') => app.navigate(Screen::Settings),
        KeyCode::Char('x') => app.logout(),
        _ => {}
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let session = app.session_snapshot();

    // While the session provider is initializing, the card only shows
    // "Loading..."; session operations are not available yet.
    if session.loading {
        return Ok(matches!(key.code, KeyCode::Esc));
    }

    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::Down => {
            app.login.focus = app.login.focus.next(session.sso_enabled);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login.focus = app.login.focus.prev(session.sso_enabled);
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::SsoButton => app.sso_login(),
            LoginFocus::Email | LoginFocus::Password | LoginFocus::Submit => app.submit_login(),
            LoginFocus::SignupLink => app.navigate(Screen::Signup),
        },
        KeyCode::Backspace => match app.login.focus {
            LoginFocus::Email => {
                app.login.email.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.login.focus {
            LoginFocus::Email => push_char(&mut app.login.email, c, MAX_FIELD_LENGTH),
            LoginFocus::Password => push_char(&mut app.login.password, c, MAX_PASSWORD_LENGTH),
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_signup_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Home),
        KeyCode::Tab | KeyCode::Down => app.signup.focus = app.signup.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.signup.focus = app.signup.focus.prev(),
        KeyCode::Enter => match app.signup.focus {
            SignupFocus::LoginLink => app.navigate(Screen::Home),
            _ => app.submit_signup(),
        },
        KeyCode::Backspace => {
            if let Some(field) = app.signup.focus.field() {
                signup_field_mut(app, field).pop();
                app.signup.errors.clear_field(field);
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.signup.focus.field() {
                let max = match field {
                    SignupField::Password | SignupField::ConfirmPassword => MAX_PASSWORD_LENGTH,
                    _ => MAX_FIELD_LENGTH,
                };
                push_char(signup_field_mut(app, field), c, max);
                // Editing a field clears its validation message
                app.signup.errors.clear_field(field);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn signup_field_mut(app: &mut App, field: SignupField) -> &mut String {
    match field {
        SignupField::FirstName => &mut app.signup.form.first_name,
        SignupField::LastName => &mut app.signup.form.last_name,
        SignupField::Email => &mut app.signup.form.email,
        SignupField::Password => &mut app.signup.form.password,
        SignupField::ConfirmPassword => &mut app.signup.form.confirm_password,
    }
}

fn handle_verify_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Enter => app.navigate(Screen::Home),
        _ => {}
    }
    Ok(false)
}

fn handle_settings_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Home),
        KeyCode::Tab | KeyCode::Down => app.settings.focus = app.settings.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.settings.focus = app.settings.focus.prev(),
        KeyCode::Char(' ') => toggle_settings_checkbox(app),
        KeyCode::Enter => match app.settings.focus {
            SettingsFocus::MailSave => app.save_mail_settings(),
            SettingsFocus::SsoSave => app.save_sso_settings(),
            SettingsFocus::SsoTest => app.test_sso_connection(),
            SettingsFocus::MailAuth | SettingsFocus::MailStarttls | SettingsFocus::SsoEnabled => {
                toggle_settings_checkbox(app)
            }
            // Enter on a text field walks the form
            _ => app.settings.focus = app.settings.focus.next(),
        },
        KeyCode::Backspace => match app.settings.focus {
            SettingsFocus::MailPort => {
                app.settings.mail.port /= 10;
            }
            _ => {
                if let Some(field) = settings_field_mut(app) {
                    field.pop();
                }
            }
        },
        KeyCode::Char(c) => {
            if app.settings.focus == SettingsFocus::MailPort {
                if let Some(digit) = c.to_digit(10) {
                    let next = u32::from(app.settings.mail.port) * 10 + digit;
                    if let Ok(port) = u16::try_from(next) {
                        app.settings.mail.port = port;
                    }
                }
            } else if let Some(field) = settings_field_mut(app) {
                push_char(field, c, MAX_FIELD_LENGTH);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn toggle_settings_checkbox(app: &mut App) {
    match app.settings.focus {
        SettingsFocus::MailAuth => app.settings.mail.auth = !app.settings.mail.auth,
        SettingsFocus::MailStarttls => app.settings.mail.starttls = !app.settings.mail.starttls,
        SettingsFocus::SsoEnabled => app.settings.sso.enabled = !app.settings.sso.enabled,
        _ => {}
    }
}

/// The text field under the settings focus, if it is one.
fn settings_field_mut(app: &mut App) -> Option<&mut String> {
    let settings = &mut app.settings;
    match settings.focus {
        SettingsFocus::MailHost => Some(&mut settings.mail.host),
        SettingsFocus::MailUsername => Some(&mut settings.mail.username),
        SettingsFocus::MailPassword => Some(&mut settings.mail.password),
        SettingsFocus::MailProtocol => Some(&mut settings.mail.protocol),
        SettingsFocus::MailFromEmail => Some(&mut settings.mail.from_email),
        SettingsFocus::MailFromName => Some(&mut settings.mail.from_name),
        SettingsFocus::SsoServerUrl => Some(&mut settings.sso.server_url),
        SettingsFocus::SsoRealm => Some(&mut settings.sso.realm),
        SettingsFocus::SsoClientId => Some(&mut settings.sso.client_id),
        SettingsFocus::SsoClientSecret => Some(&mut settings.sso.client_secret),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::app::Launch;
    use crate::auth::SessionProvider;
    use crate::config::Config;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::Arc;

    fn test_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9").expect("client builds");
        App::new(
            Config::default(),
            api,
            Arc::new(SessionProvider::new()),
            Launch::Home,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Drive the provider out of `loading` so the login card takes input.
    async fn settle_session(app: &App) {
        app.session
            .initialize_with(Err(anyhow::anyhow!("sso unavailable")), |_| {
                Err(anyhow::anyhow!("unused"))
            })
            .await;
    }

    #[tokio::test]
    async fn test_typing_into_login_fields() {
        let mut app = test_app();
        settle_session(&app).await;

        app.login.focus = LoginFocus::Email;
        for c in "a@b.com".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.login.email, "a@b.com");

        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.login.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_login_focus_skips_sso_when_disabled() {
        let mut app = test_app();
        settle_session(&app).await;

        app.login.focus = LoginFocus::SignupLink;
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.login.focus, LoginFocus::Email);
    }

    #[tokio::test]
    async fn test_input_ignored_while_session_loading() {
        let mut app = test_app();
        // Provider untouched: still loading.
        app.login.focus = LoginFocus::Email;
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert!(app.login.email.is_empty());
    }

    #[tokio::test]
    async fn test_signup_editing_clears_field_error() {
        let mut app = test_app();
        app.navigate(Screen::Signup);
        app.submit_signup(); // empty form: every field flagged
        assert!(app.signup.errors.email.is_some());

        app.signup.focus = SignupFocus::Email;
        handle_input(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert!(app.signup.errors.email.is_none());
        assert!(app.signup.errors.first_name.is_some());
    }

    #[tokio::test]
    async fn test_settings_port_editing_is_numeric() {
        let mut app = test_app();
        app.navigate(Screen::Settings);
        app.settings.focus = SettingsFocus::MailPort;
        app.settings.mail.port = 0;

        for c in "2a5!25".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.settings.mail.port, 2525);

        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.settings.mail.port, 252);

        // Digits that would overflow a u16 are dropped
        app.settings.mail.port = 65535;
        handle_input(&mut app, key(KeyCode::Char('9'))).unwrap();
        assert_eq!(app.settings.mail.port, 65535);
    }

    #[tokio::test]
    async fn test_settings_checkbox_toggle() {
        let mut app = test_app();
        app.navigate(Screen::Settings);
        app.settings.focus = SettingsFocus::MailStarttls;
        assert!(app.settings.mail.starttls);

        handle_input(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(!app.settings.mail.starttls);
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.settings.mail.starttls);
    }

    #[tokio::test]
    async fn test_escape_leaves_settings_for_home() {
        let mut app = test_app();
        app.navigate(Screen::Settings);
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen, Screen::Home);
    }
}
