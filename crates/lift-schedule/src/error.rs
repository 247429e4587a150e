use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("traffic parse error: {0}")]
    Parse(String),

    #[error("arrival rate must be within 0.0..=1.0 calls per tick, got {0}")]
    InvalidRate(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

impl From<ScheduleError> for lift_core::LiftError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::Io(io) => lift_core::LiftError::Io(io),
            other => lift_core::LiftError::Parse(other.to_string()),
        }
    }
}
