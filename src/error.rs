//! Error types shared by the pattern catalogue.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::behavioral::chain::HandlerId;

#[derive(Error, Debug)]
pub enum PatternError {
    /// The id was minted by a different chain, or by none at all.
    #[error("handler {0} is not part of this chain")]
    UnknownHandler(HandlerId),

    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown demo '{0}' (try one of: {1})")]
    UnknownDemo(String, String),

    #[error("worker thread panicked: {0}")]
    ThreadPanicked(String),
}

impl PatternError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
