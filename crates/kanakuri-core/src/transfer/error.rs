//! Errors surfaced by the transfer engine.
//!
//! Per-chunk network failures never appear here; they are absorbed by the
//! adaptive backoff inside `step()`.

/// Operation called in a phase that does not allow it. Caller misuse: the
/// engine never retries these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("destination not open")]
    NotOpen,
    #[error("destination already open")]
    AlreadyOpen,
    #[error("transfer already complete")]
    AlreadyComplete,
    /// Should be unreachable; indicates a defect if observed.
    #[error("position {position} exceeds total size {total_size}")]
    PositionOverflow { position: u64, total_size: u64 },
    #[error("transfer closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("destination I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

impl TransferError {
    /// The state error, if this is one.
    pub fn state(&self) -> Option<StateError> {
        match self {
            TransferError::State(s) => Some(*s),
            _ => None,
        }
    }
}
