//! formwizard - terminal front end for the registration forms
//!
//! A Ratatui-based TUI showing a single-page registration form and a
//! three-step registration wizard, both driven by the `formwizard` library.

mod app;
mod backend;
mod config;
mod platform;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use config::FormsConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Install the tracing subscriber: RUST_LOG, else the configured filter
fn init_tracing(config: &FormsConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.log_filter()))?;

    let writer = match config.log_file() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(config.log_file().is_none()),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = FormsConfig::load()?;

    // Write the effective configuration out as a starting point for edits
    if std::env::args().skip(1).any(|arg| arg == "--write-config") {
        config.save()?;
        if let Some(path) = FormsConfig::config_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    init_tracing(&config)?;
    tracing::info!(mode = ?config.validation_mode(), "starting");

    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting after error");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.take_pending_submit() {
            submit_with_status(terminal, app).await?;
            continue;
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Run the queued submission, redrawing whenever the form publishes a new
/// submission status
async fn submit_with_status<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let view = app.view;
    let mut status = app.subscribe_status();
    let submission = app.submit_current();
    tokio::pin!(submission);

    loop {
        tokio::select! {
            result = &mut submission => return result,
            Ok(()) = status.changed() => {
                let current = status.borrow_and_update().clone();
                tracing::trace!(?current, "submission status changed");
                terminal.draw(|frame| ui::draw_submitting(frame, view, &current))?;
            }
        }
    }
}
