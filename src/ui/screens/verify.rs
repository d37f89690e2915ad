//! Email verification screen.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, MessageKind};
use crate::ui::styles;

use super::{blank_line, message_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = vec![blank_line()];

    if let Some(ref feedback) = app.verify.feedback {
        lines.push(message_line(feedback));
        if feedback.kind == MessageKind::Success {
            lines.push(blank_line());
            lines.push(Line::from(Span::styled(
                " Redirecting to login...",
                styles::muted_style(),
            )));
        }
    }

    lines.push(blank_line());
    lines.push(Line::from(vec![
        Span::styled(" [enter]", styles::help_key_style()),
        Span::styled(" back to login  ", styles::muted_style()),
        Span::styled("[q]", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Email Verification ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
