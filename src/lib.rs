//! Library crate for user-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, form controller and event loop (`app`)
//! - Command-line configuration (`cli`)
//! - Error and result types (`error`)
//! - Log file setup (`logging`)
//! - User records and the working set (`model`)
//! - Filtering and pagination (`search`)
//! - The users endpoint adapter (`source`)
//! - UI rendering (`ui`)
//!
//! It is used by the `user-dashboard` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod search;
pub mod source;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, FetchError, Result};
