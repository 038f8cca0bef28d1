//! Command line configuration.
//!
//! The surrounding client (state store, authentication) is out of scope, so
//! the pieces the invite workflow needs from it are injected here: the local
//! participant's role, the room URL sent as context with invites, and the
//! session credential for the backend.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// Role of the local participant, normally read from the client's state
/// store. The invite feature is gated on `Moderator`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ParticipantRole {
    Moderator,
    Participant,
}

impl ParticipantRole {
    pub fn is_moderator(self) -> bool {
        matches!(self, Self::Moderator)
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "invite-tui", version, about)]
pub struct Config {
    /// Base URL of the conferencing backend
    #[arg(long, env = "INVITE_SERVER_URL")]
    pub server_url: String,

    /// URL of the conference room, sent as context with invite requests
    #[arg(long, env = "INVITE_ROOM_URL")]
    pub room_url: String,

    /// Role of the local participant
    #[arg(long, value_enum, default_value_t = ParticipantRole::Participant)]
    pub role: ParticipantRole,

    /// Session cookie for credentialed backend requests
    #[arg(long, env = "INVITE_SESSION_COOKIE")]
    pub session_cookie: Option<String>,

    /// Accept self-signed TLS certificates from the backend
    #[arg(long)]
    pub insecure: bool,

    /// Theme configuration file (created with defaults when missing)
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Write diagnostics to this file (filter via INVITE_TUI_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Host part of the room URL, empty when the URL does not parse.
    pub fn hostname(&self) -> String {
        Url::parse(&self.room_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}
