use crate::config::UnitRole;
use thiserror::Error;

/// Failures at the engine boundary. Decision code never produces these; it
/// degrades to doing nothing instead.
#[derive(Error, Debug)]
pub enum AlgoError {
    #[error("unit information missing for {0:?}")]
    MissingUnit(UnitRole),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlgoError>;
