use lift_core::{Floor, LiftError, UnitId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("{unit} cannot travel to floor {floor}: building has {floors} floors")]
    FloorOutOfRange { unit: UnitId, floor: Floor, floors: u32 },

    #[error("{unit} expected a request at the head of its queue but it is empty")]
    MissingRequest { unit: UnitId },
}

impl UnitError {
    pub fn unit(&self) -> UnitId {
        match self {
            UnitError::FloorOutOfRange { unit, .. } | UnitError::MissingRequest { unit } => *unit,
        }
    }
}

pub type UnitResult<T> = Result<T, UnitError>;

impl From<UnitError> for LiftError {
    fn from(e: UnitError) -> Self {
        LiftError::PipelineFault { unit: e.unit(), reason: e.to_string() }
    }
}
