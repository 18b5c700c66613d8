//! Game error types

use rust_engine::config::ConfigError;

use crate::pool::PoolError;

/// Errors surfaced by the simulation core
///
/// Both variants describe wiring or tuning mistakes and are meant to abort
/// startup. Problems during normal play (stale tasks, unknown colliders) are
/// logged and ignored instead.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Invalid tunables or a pool key without a prototype
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required object is not wired up
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Failed to load or parse a configuration file
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<PoolError> for GameError {
    fn from(err: PoolError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result alias for fallible game operations
pub type GameResult<T> = Result<T, GameError>;
