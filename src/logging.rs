//! Log file setup.
//!
//! The alternate screen owns the terminal, so events go to a file instead.
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install a global subscriber appending to `path`. Level comes from `RUST_LOG`, default `info`.
///
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init(path: &str) -> crate::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()?;
    Ok(())
}
