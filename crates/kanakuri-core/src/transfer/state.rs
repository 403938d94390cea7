//! Transfer position/chunk-size pair and the destination phase.

use crate::storage::Destination;

use super::error::StateError;

/// Mutable progress of one transfer. `position` only grows; `chunk_size`
/// stays within the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferState {
    pub position: u64,
    pub chunk_size: u64,
}

impl TransferState {
    /// Inclusive byte range of the next request, or the reason there is none.
    pub fn next_range(&self, total_size: u64) -> Result<(u64, u64), StateError> {
        if self.position == total_size {
            return Err(StateError::AlreadyComplete);
        }
        if self.position > total_size {
            return Err(StateError::PositionOverflow {
                position: self.position,
                total_size,
            });
        }
        let end = self
            .position
            .saturating_add(self.chunk_size.max(1) - 1)
            .min(total_size - 1);
        Ok((self.position, end))
    }
}

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unopened,
    Transferring,
    Complete,
    Closed,
}

/// Phase plus the destination handle it owns.
#[derive(Debug)]
pub(super) enum Slot {
    Unopened,
    Transferring(Destination),
    Complete(Destination),
    Closed,
}

impl Slot {
    pub(super) fn phase(&self) -> Phase {
        match self {
            Slot::Unopened => Phase::Unopened,
            Slot::Transferring(_) => Phase::Transferring,
            Slot::Complete(_) => Phase::Complete,
            Slot::Closed => Phase::Closed,
        }
    }

    /// The open destination, in either open phase.
    pub(super) fn destination(&self) -> Result<&Destination, StateError> {
        match self {
            Slot::Transferring(d) | Slot::Complete(d) => Ok(d),
            Slot::Unopened => Err(StateError::NotOpen),
            Slot::Closed => Err(StateError::Closed),
        }
    }

    /// Move `Transferring` to `Complete`, keeping the handle.
    pub(super) fn mark_complete(&mut self) {
        if let Slot::Transferring(_) = self {
            if let Slot::Transferring(d) = std::mem::replace(self, Slot::Closed) {
                *self = Slot::Complete(d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_range_clips_to_total() {
        let s = TransferState {
            position: 90,
            chunk_size: 50,
        };
        assert_eq!(s.next_range(100), Ok((90, 99)));
        let s = TransferState {
            position: 0,
            chunk_size: 10,
        };
        assert_eq!(s.next_range(100), Ok((0, 9)));
    }

    #[test]
    fn next_range_rejects_done_and_overflow() {
        let done = TransferState {
            position: 100,
            chunk_size: 10,
        };
        assert_eq!(done.next_range(100), Err(StateError::AlreadyComplete));
        let past = TransferState {
            position: 101,
            chunk_size: 10,
        };
        assert_eq!(
            past.next_range(100),
            Err(StateError::PositionOverflow {
                position: 101,
                total_size: 100
            })
        );
    }
}
