//! Settings screen: mail server and SSO provider panels, side by side.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SettingsFocus};
use crate::ui::styles;

use super::{blank_line, button_line, checkbox_line, field_line, message_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_mail_panel(frame, app, chunks[0]);
    render_sso_panel(frame, app, chunks[1]);
}

fn render_mail_panel(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.settings;
    let focus = state.focus;
    let mut lines: Vec<Line> = vec![blank_line()];

    lines.push(field_line(
        "SMTP Host",
        &state.mail.host,
        focus == SettingsFocus::MailHost,
        false,
    ));
    lines.push(field_line(
        "SMTP Port",
        &state.mail.port.to_string(),
        focus == SettingsFocus::MailPort,
        false,
    ));
    lines.push(field_line(
        "Username",
        &state.mail.username,
        focus == SettingsFocus::MailUsername,
        false,
    ));
    lines.push(field_line(
        "Password",
        &state.mail.password,
        focus == SettingsFocus::MailPassword,
        true,
    ));
    lines.push(field_line(
        "Protocol",
        &state.mail.protocol,
        focus == SettingsFocus::MailProtocol,
        false,
    ));
    lines.push(checkbox_line(
        "SMTP Auth",
        state.mail.auth,
        focus == SettingsFocus::MailAuth,
    ));
    lines.push(checkbox_line(
        "STARTTLS",
        state.mail.starttls,
        focus == SettingsFocus::MailStarttls,
    ));
    lines.push(field_line(
        "From Email",
        &state.mail.from_email,
        focus == SettingsFocus::MailFromEmail,
        false,
    ));
    lines.push(field_line(
        "From Name",
        &state.mail.from_name,
        focus == SettingsFocus::MailFromName,
        false,
    ));

    lines.push(blank_line());
    let save_label = if state.mail_pending {
        "Saving..."
    } else {
        "Save Mail Settings"
    };
    lines.push(button_line(save_label, focus == SettingsFocus::MailSave));

    if let Some(ref feedback) = state.mail_feedback {
        lines.push(blank_line());
        lines.push(message_line(feedback));
    }

    let block = Block::default()
        .title(" Mail Server Settings ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focus.in_mail_panel()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_sso_panel(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.settings;
    let focus = state.focus;
    let mut lines: Vec<Line> = vec![blank_line()];

    lines.push(checkbox_line(
        "Enabled",
        state.sso.enabled,
        focus == SettingsFocus::SsoEnabled,
    ));
    lines.push(field_line(
        "Server URL",
        &state.sso.server_url,
        focus == SettingsFocus::SsoServerUrl,
        false,
    ));
    lines.push(field_line(
        "Realm",
        &state.sso.realm,
        focus == SettingsFocus::SsoRealm,
        false,
    ));
    lines.push(field_line(
        "Client ID",
        &state.sso.client_id,
        focus == SettingsFocus::SsoClientId,
        false,
    ));
    lines.push(field_line(
        "Client Secret",
        &state.sso.client_secret,
        focus == SettingsFocus::SsoClientSecret,
        true,
    ));

    lines.push(blank_line());
    let save_label = if state.sso_pending {
        "Saving..."
    } else {
        "Save SSO Settings"
    };
    lines.push(button_line(save_label, focus == SettingsFocus::SsoSave));

    let test_label = if state.testing {
        "Testing..."
    } else {
        "Test Connection"
    };
    lines.push(button_line(test_label, focus == SettingsFocus::SsoTest));

    if let Some(ref feedback) = state.sso_feedback {
        lines.push(blank_line());
        lines.push(message_line(feedback));
    }

    let block = Block::default()
        .title(" SSO Provider Settings ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!focus.in_mail_panel()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
