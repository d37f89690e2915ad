//! Portal TUI - a terminal client for the account portal.
//!
//! Provides login (local credentials or SSO), signup, email verification
//! and the admin settings screens against the portal backend. All business
//! logic lives in the backend; this client is presentation and navigation.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod ui;
mod validate;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use api::ApiClient;
use app::{App, Launch};
use auth::SessionProvider;
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the data directory
const LOG_FILE: &str = "portal.log";

/// Initialize the tracing subscriber.
///
/// Logs go to a file under the data dir so the alternate screen stays
/// clean; stderr is the fallback when no data dir is available. Use the
/// RUST_LOG env var to control the level (e.g. RUST_LOG=debug).
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Ok(dir) = Config::data_dir() {
        if std::fs::create_dir_all(&dir).is_ok() {
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
    None
}

/// Extract the verification token from a `--verify` argument: either a raw
/// token or a pasted verification link carrying a `token` query parameter.
fn parse_verify_target(arg: &str) -> Option<String> {
    if let Ok(url) = Url::parse(arg) {
        return url
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned());
    }
    (!arg.is_empty()).then(|| arg.to_string())
}

fn parse_launch(args: &[String]) -> Launch {
    match args.iter().position(|a| a == "--verify") {
        Some(pos) => Launch::Verify(args.get(pos + 1).and_then(|a| parse_verify_target(a))),
        None => Launch::Home,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();
    info!("Portal TUI starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let launch = parse_launch(&args);

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Ok(url) = std::env::var("PORTAL_BACKEND_URL") {
        config.backend_url = url;
    }

    let api = ApiClient::new(&config.backend_url)?;

    // Kick off the session provider; screens render its loading state until
    // the silent check resolves.
    let session = Arc::new(SessionProvider::new());
    {
        let session = Arc::clone(&session);
        let api = api.clone();
        tokio::spawn(async move {
            session.initialize(&api).await;
        });
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api, Arc::clone(&session), launch);
    app.mount_screen();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    session.shutdown();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Portal TUI shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Drain finished backend requests and fire due redirects
        app.check_background_tasks();
        app.check_redirect();
        app.maybe_fetch_hello();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verify_target_raw_token() {
        assert_eq!(
            parse_verify_target("abc123").as_deref(),
            Some("abc123")
        );
        assert!(parse_verify_target("").is_none());
    }

    #[test]
    fn test_parse_verify_target_link() {
        assert_eq!(
            parse_verify_target("https://portal.example.com/verify?token=abc123").as_deref(),
            Some("abc123")
        );
        // A link without a token parameter is not a verification link
        assert!(parse_verify_target("https://portal.example.com/verify").is_none());
    }

    #[test]
    fn test_parse_launch() {
        assert!(matches!(parse_launch(&[]), Launch::Home));

        let args = vec!["--verify".to_string(), "tok".to_string()];
        match parse_launch(&args) {
            Launch::Verify(Some(token)) => assert_eq!(token, "tok"),
            other => panic!("unexpected launch: {:?}", other),
        }

        // --verify with no token still lands on the verify screen, which
        // reports the invalid link
        assert!(matches!(
            parse_launch(&["--verify".to_string()]),
            Launch::Verify(None)
        ));
    }
}
