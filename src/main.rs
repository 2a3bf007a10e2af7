//! selectkit - gallery of searchable selection controls.
//!
//! Sets up the terminal, loads the configuration and runs the event loop.

use std::io::{self, Stdout};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use selectkit::app::App;
use selectkit::config::Config;
use selectkit::error::{self, AppError};
use selectkit::events::EventHandler;
use selectkit::logging;
use selectkit::ui::{init_theme, load_theme};

/// Searchable selection controls for the terminal.
#[derive(Debug, Parser)]
#[command(name = "selectkit", version, about)]
struct Cli {
    /// Path to the config file (overrides SELECTKIT_CONFIG).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

/// Restores the terminal when dropped, including on early return.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> error::Result<Self> {
        enable_raw_mode().map_err(|e| AppError::terminal("Failed to enable raw mode", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| AppError::terminal("Failed to enter alternate screen", e))?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| AppError::terminal("Failed to create terminal", e))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        ) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = self.terminal.show_cursor() {
            warn!("Failed to show cursor: {}", e);
        }
    }
}

fn load_config(cli: &Cli) -> error::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn run(config: Config) -> error::Result<()> {
    let mut guard = TerminalGuard::new()?;
    let events = EventHandler::new();
    let mut app = App::with_config(config);

    while !app.should_quit() {
        guard
            .terminal
            .draw(|frame| app.view(frame))
            .map_err(|e| AppError::terminal("Failed to draw", e))?;
        let event = events
            .next()
            .map_err(|e| AppError::terminal("Failed to read terminal event", e))?;
        app.update(event);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.debug {
        std::env::set_var("RUST_LOG", logging::DEBUG_LOG_FILTER);
    }
    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            eprintln!("{}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            if e.is_critical() {
                std::process::exit(1);
            }
            warn!("Using default configuration");
            Config::default()
        }
    };
    info!(theme = %config.settings.theme, vim_mode = config.settings.vim_mode, "Configuration loaded");
    init_theme(load_theme(&config.settings.theme));

    let result = run(config);
    if let Err(e) = &result {
        error!(error = %e, "Application error");
        eprintln!("{}", e.user_message());
    }
    logging::shutdown();
    result.map_err(anyhow::Error::from)
}
