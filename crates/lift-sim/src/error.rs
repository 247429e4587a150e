use lift_core::{LiftError, RequestError};
use lift_dispatch::DispatchError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("invalid fleet state: {0}")]
    InvalidFleetState(String),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<DispatchError> for SimError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::InvalidRequest(r) => SimError::InvalidRequest(r),
            other => SimError::InvalidFleetState(other.to_string()),
        }
    }
}

impl From<SimError> for LiftError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::Config(msg) => LiftError::Config(msg),
            SimError::InvalidRequest(r) => LiftError::InvalidRequest(r),
            SimError::InvalidFleetState(msg) => LiftError::InvalidFleetState(msg),
        }
    }
}
