//! denim CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`denim_engine`] (wizard state) and [`denim_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_app() -> App + TUI
//!        \-> ask / conversations (one-shot RAG proxy calls)
//! ```
//!
//! # Event Loop
//!
//! The wizard uses a fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`denim_tui::InputPump`])
//! 3. Advance time-based state (`app.tick()` runs a due autosave)
//! 4. Render frame

mod remote;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tokio::time::{MissedTickBehavior, interval};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use denim_config::DenimConfig;
use denim_engine::{App, AppOptions, FileStore};
use denim_tui::{InputPump, draw, handle_events};

#[derive(Parser)]
#[command(name = "denim")]
#[command(author, version, about = "Onboarding wizard for denim dye houses")]
struct Cli {
    /// Config file to use instead of `$DENIM_CONFIG` or `~/.denim/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message to the RAG chat proxy and print the reply.
    Ask {
        message: String,
        /// Continue an existing conversation.
        #[arg(long)]
        conversation: Option<String>,
    },

    /// List conversations known to the RAG proxy.
    Conversations,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.denim/logs/denim.log
    if let Some(config_path) = DenimConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("denim.log"));
    }

    // Fallback: ./.denim/logs/denim.log
    candidates.push(PathBuf::from(".denim").join("logs").join("denim.log"));

    candidates
}

/// An explicit `--config` must load; the default location may be missing or broken.
fn load_config(explicit: Option<&Path>) -> Result<Option<DenimConfig>> {
    if let Some(path) = explicit {
        let config = DenimConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        return Ok(Some(config));
    }
    match DenimConfig::load() {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring unreadable config: {err}");
            Ok(None)
        }
    }
}

/// Terminal session with RAII cleanup.
///
/// Enables raw mode, bracketed paste and the alternate screen. On drop, all
/// terminal state is restored, even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => run_wizard(config.as_ref()).await,
        Some(Commands::Ask {
            message,
            conversation,
        }) => remote::ask(config.as_ref(), message, conversation).await,
        Some(Commands::Conversations) => remote::conversations(config.as_ref()).await,
    }
}

async fn run_wizard(config: Option<&DenimConfig>) -> Result<()> {
    let storage_dir = config.map_or_else(
        || DenimConfig::default().storage_dir(),
        DenimConfig::storage_dir,
    );
    tracing::info!(dir = %storage_dir.display(), "Using storage directory");

    let store = FileStore::new(storage_dir);
    let mut app = App::new(Box::new(store), AppOptions::from_config(config));

    let run_result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    // Quitting inside the debounce window must not lose the last edits.
    app.save_now();
    app.shutdown();

    if let Err(err) = &run_result {
        eprintln!("Error: {err:?}");
    }
    run_result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
