//! user-dashboard binary entry point.
//!
//! Parses configuration, starts the users fetch, runs the TUI event loop in
//! raw mode, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_dashboard::app::keymap::Keymap;
use user_dashboard::app::{self, AppState, Theme};
use user_dashboard::cli::Cli;
use user_dashboard::error::{Context, Result};
use user_dashboard::logging;
use user_dashboard::source::UsersSource;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().with_ctx(|| "enable raw mode".to_string())?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .with_ctx(|| "enter alternate screen".to_string())?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).with_ctx(|| "create terminal".to_string())?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_file) {
        eprintln!("logging disabled ({}): {e}", cli.log_file);
    }

    // Validate the endpoint before touching the terminal.
    let source = UsersSource::new(&cli.endpoint)?;

    let mut state = AppState::new(
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
    );
    state.endpoint = source.endpoint().to_string();
    let pending = source.spawn_fetch();

    let mut terminal = init_terminal()?;

    let res = app::run(&mut terminal, &mut state, Some(pending));

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
