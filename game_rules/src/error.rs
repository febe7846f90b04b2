//! Errors raised by the rules crate.

use std::path::PathBuf;

use crate::entities::ActorParseError;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse session config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("state snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid identifier in state snapshot: {0}")]
    Identifier(#[from] ActorParseError),
}
