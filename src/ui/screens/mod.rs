//! Screen renderers, one module per screen, plus shared form widgets.

pub mod home;
pub mod settings;
pub mod signup;
pub mod verify;

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::app::{Feedback, MessageKind};

use super::styles;

/// Width of the label column in form fields.
const LABEL_WIDTH: usize = 18;

/// A labeled text input rendered as one line. Passwords are masked.
pub(super) fn field_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let shown = if mask {
        "\u{2022}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(
            format!(" {:<width$}", label, width = LABEL_WIDTH),
            styles::label_style(),
        ),
        Span::styled(format!("{}{}", shown, cursor), styles::field_style(focused)),
    ])
}

/// A boolean toggle rendered as one line.
pub(super) fn checkbox_line(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(vec![
        Span::styled(
            format!(" {:<width$}", label, width = LABEL_WIDTH),
            styles::label_style(),
        ),
        Span::styled(mark.to_string(), styles::field_style(focused)),
    ])
}

/// A button rendered as one line.
pub(super) fn button_line(label: &str, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("[ {} ]", label), styles::button_style(focused)),
    ])
}

/// An inline screen message in its kind's color.
pub(super) fn message_line(feedback: &Feedback) -> Line<'static> {
    let style: Style = match feedback.kind {
        MessageKind::Success => styles::success_style(),
        MessageKind::Error => styles::error_style(),
        MessageKind::Info => styles::info_style(),
    };
    Line::from(Span::styled(format!(" {}", feedback.text), style))
}

/// A field-scoped validation error, indented under its field.
pub(super) fn field_error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("   {}", message),
        styles::error_style(),
    ))
}

pub(super) fn blank_line() -> Line<'static> {
    Line::from("")
}
