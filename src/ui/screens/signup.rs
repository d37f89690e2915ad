//! Signup screen: the registration form with field-scoped validation.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SignupFocus};
use crate::ui::styles;

use super::{blank_line, button_line, field_error_line, field_line, message_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.signup;
    let mut lines: Vec<Line> = vec![blank_line()];

    lines.push(field_line(
        "First Name *",
        &state.form.first_name,
        state.focus == SignupFocus::FirstName,
        false,
    ));
    if let Some(ref message) = state.errors.first_name {
        lines.push(field_error_line(message));
    }

    lines.push(field_line(
        "Last Name *",
        &state.form.last_name,
        state.focus == SignupFocus::LastName,
        false,
    ));
    if let Some(ref message) = state.errors.last_name {
        lines.push(field_error_line(message));
    }

    lines.push(field_line(
        "Email Address *",
        &state.form.email,
        state.focus == SignupFocus::Email,
        false,
    ));
    if let Some(ref message) = state.errors.email {
        lines.push(field_error_line(message));
    }

    lines.push(field_line(
        "Password *",
        &state.form.password,
        state.focus == SignupFocus::Password,
        true,
    ));
    if let Some(ref message) = state.errors.password {
        lines.push(field_error_line(message));
    }

    lines.push(field_line(
        "Confirm Password *",
        &state.form.confirm_password,
        state.focus == SignupFocus::ConfirmPassword,
        true,
    ));
    if let Some(ref message) = state.errors.confirm_password {
        lines.push(field_error_line(message));
    }

    lines.push(blank_line());
    let submit_label = if state.pending {
        "Signing up..."
    } else {
        "Sign Up"
    };
    lines.push(button_line(submit_label, state.focus == SignupFocus::Submit));

    if let Some(ref feedback) = state.feedback {
        lines.push(blank_line());
        lines.push(message_line(feedback));
    }

    lines.push(blank_line());
    lines.push(Line::from(Span::styled(
        " Already have an account?",
        styles::muted_style(),
    )));
    lines.push(button_line(
        "Back to Login",
        state.focus == SignupFocus::LoginLink,
    ));

    let block = Block::default()
        .title(" Sign Up ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
