use lift_core::{LiftError, RequestError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("cannot dispatch: the fleet is empty")]
    EmptyFleet,

    #[error("unit index {index} is out of range for a fleet of {len}")]
    UnitOutOfRange { index: usize, len: usize },

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl From<DispatchError> for LiftError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::InvalidRequest(r) => LiftError::InvalidRequest(r),
            other => LiftError::InvalidFleetState(other.to_string()),
        }
    }
}
