//! Main frame rendering and layout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Screen};

use super::screens::{home, settings, signup, verify};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Web Portal";
    let session = app.session_snapshot();
    let sso_hint = if session.loading {
        "SSO: checking..."
    } else if session.sso_enabled {
        if session.authenticated {
            "SSO: signed in"
        } else {
            "SSO: available"
        }
    } else {
        "SSO: off"
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + sso_hint.len() + 4),
        )),
        Span::styled(sso_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Home => home::render(frame, app, area),
        Screen::Signup => signup::render(frame, app, area),
        Screen::Verify => verify::render(frame, app, area),
        Screen::Settings => settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.screen {
        Screen::Home => {
            if app.display_user().is_some() {
                " [g] settings | [x] logout | [q] quit"
            } else {
                " [tab] next field | [enter] activate | [esc] quit"
            }
        }
        Screen::Signup => " [tab] next field | [enter] activate | [esc] back",
        Screen::Verify => " [enter] back to login | [q] quit",
        Screen::Settings => " [tab] next field | [space] toggle | [enter] activate | [esc] back",
    };

    let line = Line::from(Span::styled(shortcuts, styles::status_bar_style()));
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}
