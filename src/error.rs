use std::io;
use thiserror::Error;

pub type CursorResult<T> = Result<T, CursorError>;

#[derive(Debug, Error)]
pub enum CursorError {
    /// A required input was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An array cursor index outside `0..len`.
    #[error("index {index} out of range for buffer of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// A stream cursor requested behind the shared reader with no queued data.
    #[error("position {position} already passed by reader at {read_position}")]
    PositionPassed {
        position: usize,
        read_position: usize,
    },
    #[error("source read failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { offset: usize },
}

impl CursorError {
    /// True for caller mistakes (bad arguments or positions), false for source faults.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CursorError::InvalidArgument(_)
                | CursorError::OutOfRange { .. }
                | CursorError::PositionPassed { .. }
        )
    }
}
