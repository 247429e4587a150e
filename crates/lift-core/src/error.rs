//! Error taxonomy shared by the `lift-*` crates.
//!
//! Sub-crates define their own error enums and convert into `LiftError` via
//! `From` impls where a caller needs one type for everything.

use thiserror::Error;

use crate::UnitId;

/// Why a request was rejected.  Every message names the failed constraint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("origin and destination must differ (both are floor {floor})")]
    SameFloor { floor: u32 },

    #[error("floor {floor} is outside the building (valid floors are 0..={top})")]
    FloorOutOfRange { floor: u32, top: u32 },

    #[error("party size must be between 1 and {max}, got {got}")]
    PartySize { got: u32, max: u32 },
}

/// The top-level error type for the simulator.
#[derive(Debug, Error)]
pub enum LiftError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("invalid fleet state: {0}")]
    InvalidFleetState(String),

    #[error("pipeline fault on {unit}: {reason}")]
    PipelineFault { unit: UnitId, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `lift-*` crates.
pub type LiftResult<T> = Result<T, LiftError>;
