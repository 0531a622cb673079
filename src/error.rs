// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::notify::TransportError;

/// Everything that can end a run. Every variant is fatal; `main` owns the exit.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unable to fetch listings from {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to parse listings: {0}")]
    ListingsParse(String),

    #[error("error parsing show time {raw:?}")]
    ShowTime {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unable to find cinema {0}")]
    CinemaNotFound(i64),

    #[error("error sending SMS notification to {to}")]
    Transport {
        to: String,
        #[source]
        source: TransportError,
    },

    #[error("unable to {action} notifications file {}", .path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Short stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Network { .. } => "network",
            RunError::ListingsParse(_) | RunError::ShowTime { .. } => "parse",
            RunError::CinemaNotFound(_) => "cinema_not_found",
            RunError::Transport { .. } => "transport",
            RunError::Storage { .. } => "storage",
        }
    }
}
