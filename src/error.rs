//! Error types for basketscan
//!
//! All modules use `BasketscanResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for basketscan operations
pub type BasketscanResult<T> = Result<T, BasketscanError>;

/// All errors that can occur in basketscan
#[derive(Error, Debug)]
pub enum BasketscanError {
    // Feed errors
    #[error("Feed request to {url} returned HTTP {status}")]
    FeedStatus { url: String, status: u16 },

    #[error("Feed request to {url} failed: {reason}")]
    FeedRequest { url: String, reason: String },

    #[error("Feed body from {url} is not valid top-packages JSON: {reason}")]
    FeedParse { url: String, reason: String },

    // Pipeline errors
    #[error("Feed returned zero packages, nothing to download")]
    EmptyPackageList,

    #[error("Home directory could not be determined")]
    HomeNotFound,

    // Cache tool errors
    #[error("{tool} {subcommand} exited with code {code}: {stderr}")]
    CacheTool {
        tool: String,
        subcommand: String,
        code: i32,
        stderr: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BasketscanError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::FeedStatus { .. } | Self::FeedRequest { .. } => {
                Some("Check network connectivity and the feed URL (--feed-url)")
            }
            Self::CacheTool { .. } => Some("Is the basket cache tool installed and on PATH?"),
            Self::HomeNotFound => Some("Set BASKET_ROOT to choose a workspace location"),
            _ => None,
        }
    }
}
