//! Command-line configuration. Every flag can also come from the environment.
use clap::Parser;

use crate::source::DEFAULT_ENDPOINT;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "user-dashboard",
    version,
    about = "Browse, search and edit user records fetched from a REST endpoint"
)]
pub struct Cli {
    /// Users listing to load once at startup.
    #[arg(long, env = "USER_DASHBOARD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Theme file (created with defaults if missing).
    #[arg(long, env = "USER_DASHBOARD_THEME", default_value = "theme.conf")]
    pub theme: String,

    /// Keybindings file (created with defaults if missing).
    #[arg(long, env = "USER_DASHBOARD_KEYBINDS", default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Where diagnostics are written; the terminal itself is taken by the UI.
    #[arg(long, env = "USER_DASHBOARD_LOG", default_value = "user-dashboard.log")]
    pub log_file: String,
}
