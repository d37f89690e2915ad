//! Home screen: the login card when signed out, the landing card when
//! signed in.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::styles;

use super::{blank_line, button_line, field_line, message_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.display_user().is_some() {
        render_landing(frame, app, area);
    } else {
        render_login(frame, app, area);
    }
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session_snapshot();
    let mut lines: Vec<Line> = Vec::new();

    if session.loading {
        lines.push(blank_line());
        lines.push(Line::from(Span::styled(
            " Loading...",
            styles::muted_style(),
        )));
    } else {
        if session.sso_enabled {
            lines.push(blank_line());
            lines.push(button_line(
                "Sign in with SSO",
                app.login.focus == LoginFocus::SsoButton,
            ));
            lines.push(blank_line());
            lines.push(Line::from(Span::styled(
                " ----- or use a local account -----",
                styles::muted_style(),
            )));
        }

        lines.push(blank_line());
        lines.push(field_line(
            "Email Address",
            &app.login.email,
            app.login.focus == LoginFocus::Email,
            false,
        ));
        lines.push(field_line(
            "Password",
            &app.login.password,
            app.login.focus == LoginFocus::Password,
            true,
        ));
        lines.push(blank_line());

        let submit_label = if app.login.pending {
            "Logging in..."
        } else {
            "Login with Email"
        };
        lines.push(button_line(
            submit_label,
            app.login.focus == LoginFocus::Submit,
        ));

        if let Some(ref feedback) = app.login.feedback {
            lines.push(blank_line());
            lines.push(message_line(feedback));
        }

        lines.push(blank_line());
        lines.push(Line::from(Span::styled(
            " Don't have an account?",
            styles::muted_style(),
        )));
        lines.push(button_line(
            "Sign Up",
            app.login.focus == LoginFocus::SignupLink,
        ));
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_landing(frame: &mut Frame, app: &App, area: Rect) {
    let user = app.display_user().unwrap_or_default();
    let mut lines: Vec<Line> = vec![
        blank_line(),
        Line::from(Span::styled(
            format!(" Welcome, {}!", user),
            styles::title_style(),
        )),
        blank_line(),
        Line::from(Span::styled(" Backend says:", styles::label_style())),
    ];

    match app.hello_message {
        Some(ref message) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", message),
                styles::value_style(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                " Loading...",
                styles::muted_style(),
            )));
        }
    }

    lines.push(blank_line());
    lines.push(Line::from(vec![
        Span::styled(" [g]", styles::help_key_style()),
        Span::styled(" settings  ", styles::muted_style()),
        Span::styled("[x]", styles::help_key_style()),
        Span::styled(" logout  ", styles::muted_style()),
        Span::styled("[q]", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Web Portal ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
