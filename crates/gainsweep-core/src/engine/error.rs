use thiserror::Error;

use super::config::ConfigError;
use crate::core::search_space::SearchSpaceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Search space construction failed: {source}")]
    SearchSpace {
        #[from]
        source: SearchSpaceError,
    },

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Worker {worker} failed: {reason}")]
    Worker { worker: usize, reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
