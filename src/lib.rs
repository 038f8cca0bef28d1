//! Library crate for invite-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Backend HTTP client and wire types (`api`)
//! - Application state, dialog workflow and event loop (`app`)
//! - Command line configuration (`config`)
//! - Error types (`error`)
//! - Group/search filtering over the directory (`filter`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `invite-tui` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{InviteError, Result};
