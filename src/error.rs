//! Failure taxonomy for the invite workflow.
//!
//! Every variant's `Display` text is the plain-language message shown to the
//! user; diagnostic detail is carried separately and only reaches the tracing
//! log. Nothing here is retried automatically.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InviteError>;

#[derive(Debug, Error)]
pub enum InviteError {
    /// The local participant is not a moderator; the dialog never opens.
    #[error("Only Moderators can send invites.")]
    PermissionDenied,

    /// Either directory read failed, aborting the aggregate fetch.
    #[error("Failed to load users and groups. Please try again later.")]
    FetchFailed { detail: String },

    /// The invite request was rejected or never reached the backend.
    #[error("Failed to send invites. Please try again.")]
    SubmitFailed { detail: String },

    /// The client could not be built from the given configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl InviteError {
    pub fn fetch(detail: impl Into<String>) -> Self {
        Self::FetchFailed {
            detail: detail.into(),
        }
    }

    pub fn submit(detail: impl Into<String>) -> Self {
        Self::SubmitFailed {
            detail: detail.into(),
        }
    }

    /// Diagnostic detail for the log; `None` for variants that carry none.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::FetchFailed { detail } | Self::SubmitFailed { detail } => Some(detail),
            Self::PermissionDenied | Self::Config(_) => None,
        }
    }
}
