//! Progress reported by each transfer step.

/// Snapshot returned by `FileTransfer::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    /// `position == total_size`.
    pub done: bool,
    /// Total file size in bytes.
    pub total_size: u64,
    /// Bytes committed to the destination so far.
    pub position: u64,
}

impl StepStatus {
    pub fn new(position: u64, total_size: u64) -> Self {
        Self {
            done: position == total_size,
            total_size,
            position,
        }
    }

    /// Bytes still to transfer.
    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.position)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_size == 0 {
            return 1.0;
        }
        (self.position as f64 / self.total_size as f64).min(1.0)
    }
}
