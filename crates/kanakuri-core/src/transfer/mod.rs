//! Sequential, adaptive, resumable file transfer.
//!
//! `FileTransfer` drives a download one chunk per `step()`: it requests the
//! next span starting at the committed position, appends whatever arrived,
//! rescales the chunk size from the response time and outcome, and backs off
//! after failures. The caller loops until `StepStatus::done`, then calls
//! `verify()` and `close_destination()`.
//!
//! Lifecycle: `Unopened -> Transferring -> Complete`, with `Closed` reachable
//! from `Unopened` or any open phase.

mod error;
mod progress;
mod state;
mod target;

pub use error::{StateError, TransferError};
pub use progress::StepStatus;
pub use state::{Phase, TransferState};
pub use target::TransferTarget;

use std::path::Path;
use std::time::Instant;

use crate::adaptive;
use crate::checksum;
use crate::config::TransferConfig;
use crate::range::{RangeFetch, Transport};
use crate::storage::Destination;

use state::Slot;

/// Per-chunk diagnostics: `info` when the transfer is verbose, `debug` otherwise.
macro_rules! diag {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// One resumable transfer of `target` through the range source `F`.
pub struct FileTransfer<F: RangeFetch = Transport> {
    target: TransferTarget,
    fetcher: F,
    config: TransferConfig,
    state: TransferState,
    slot: Slot,
}

impl<F: RangeFetch> FileTransfer<F> {
    /// Start at `config.initial_pos` with a chunk size midway between the
    /// configured bounds.
    pub fn new(
        target: TransferTarget,
        fetcher: F,
        config: TransferConfig,
    ) -> Result<Self, TransferError> {
        config.validate().map_err(TransferError::InvalidConfig)?;
        if config.initial_pos > target.total_size() {
            return Err(TransferError::InvalidTarget(format!(
                "initial position {} is past the end of a {} byte file",
                config.initial_pos,
                target.total_size()
            )));
        }
        let state = TransferState {
            position: config.initial_pos,
            chunk_size: config.initial_chunk_size(),
        };
        Ok(Self {
            target,
            fetcher,
            config,
            state,
            slot: Slot::Unopened,
        })
    }

    pub fn target(&self) -> &TransferTarget {
        &self.target
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Bytes committed so far.
    pub fn position(&self) -> u64 {
        self.state.position
    }

    /// Size of the next request.
    pub fn chunk_size(&self) -> u64 {
        self.state.chunk_size
    }

    pub fn phase(&self) -> Phase {
        self.slot.phase()
    }

    pub fn status(&self) -> StepStatus {
        StepStatus::new(self.state.position, self.target.total_size())
    }

    /// Open the destination. With `truncate` the file starts empty; without
    /// it existing content is kept and new chunks are appended after it.
    pub fn open_destination(&mut self, path: &Path, truncate: bool) -> Result<(), TransferError> {
        match self.slot {
            Slot::Unopened => {}
            Slot::Transferring(_) | Slot::Complete(_) => return Err(StateError::AlreadyOpen.into()),
            Slot::Closed => return Err(StateError::Closed.into()),
        }

        let dest = Destination::open(path, truncate)?;
        let on_disk = dest.len()?;
        if on_disk != self.state.position {
            tracing::warn!(
                path = %path.display(),
                on_disk,
                position = self.state.position,
                "destination length differs from transfer position; new data is appended at end of file"
            );
        }
        tracing::info!(
            path = %path.display(),
            truncate,
            position = self.state.position,
            total = self.target.total_size(),
            "destination opened"
        );

        self.slot = if self.state.position == self.target.total_size() {
            Slot::Complete(dest)
        } else {
            Slot::Transferring(dest)
        };
        Ok(())
    }

    /// Fetch and commit the next chunk.
    ///
    /// Fails without touching the network if the destination is not open or
    /// the transfer is already complete. Network failures are not errors:
    /// the received prefix is committed, the chunk size shrinks, and the call
    /// sleeps for the unused part of the timeout budget before returning.
    pub fn step(&mut self) -> Result<StepStatus, TransferError> {
        let total_size = self.target.total_size();
        let dest = match &mut self.slot {
            Slot::Transferring(d) => d,
            Slot::Complete(_) => return Err(StateError::AlreadyComplete.into()),
            Slot::Unopened => return Err(StateError::NotOpen.into()),
            Slot::Closed => return Err(StateError::Closed.into()),
        };
        let (start, end) = self.state.next_range(total_size)?;
        let verbose = self.config.verbose;

        diag!(verbose, start, bytes = end - start + 1, "requesting chunk");

        let t0 = Instant::now();
        let result = self
            .fetcher
            .fetch_range(self.target.url(), start, end, self.config.max_interval());
        let elapsed = t0.elapsed();
        let rel = adaptive::response_time_rel(elapsed, &self.config);

        if !result.bytes.is_empty() {
            if let Err(e) = dest.append(&result.bytes) {
                // Whatever part of the chunk reached the file is dropped so
                // the file ends at `position` again and the span can be retried.
                if let Err(rewind) = dest.truncate_to(self.state.position) {
                    tracing::error!(
                        path = %dest.path().display(),
                        position = self.state.position,
                        "cannot discard partial write ({}); closing transfer",
                        rewind
                    );
                    self.slot = Slot::Closed;
                }
                return Err(e.into());
            }
            self.state.position += result.bytes.len() as u64;
            diag!(verbose, bytes = result.bytes.len(), "transferred");
        }

        let succeeded = result.is_success();
        match &result.error {
            None => diag!(
                verbose,
                "full transfer, response time: {:.1} %",
                100.0 * rel
            ),
            Some(e) => diag!(
                verbose,
                timeout = e.is_timeout(),
                connection = e.is_connection(),
                "partial transfer [{}], response time: {:.1} %",
                e,
                100.0 * rel
            ),
        }

        self.state.chunk_size =
            adaptive::next_chunk_size(self.state.chunk_size, elapsed, succeeded, &self.config);
        diag!(verbose, chunk_size = self.state.chunk_size, "next chunk size");

        if self.state.position == total_size {
            self.slot.mark_complete();
        }

        if !succeeded {
            let wait = adaptive::failure_backoff(elapsed, &self.config);
            if !wait.is_zero() {
                diag!(verbose, wait_ms = wait.as_millis() as u64, "backing off");
                std::thread::sleep(wait);
            }
        }

        Ok(self.status())
    }

    /// Hash the destination from byte 0 and compare with the expected
    /// digest. A mismatch is `Ok(false)`, not an error.
    pub fn verify(&self) -> Result<bool, TransferError> {
        let dest = self.slot.destination()?;
        let digest = checksum::sha256_reader(dest.reader()?)?;
        let expected = self.target.expected_digest();
        let ok = expected.matches(&digest);
        if ok {
            tracing::info!(path = %dest.path().display(), "digest verified");
        } else {
            tracing::warn!(
                path = %dest.path().display(),
                expected = expected.value(),
                actual = %expected.encoding().encode(&digest),
                "digest mismatch"
            );
        }
        Ok(ok)
    }

    /// Sync and release the destination. Closing an engine that was never
    /// opened just retires it.
    pub fn close_destination(&mut self) -> Result<(), TransferError> {
        match std::mem::replace(&mut self.slot, Slot::Closed) {
            Slot::Transferring(d) | Slot::Complete(d) => {
                let path = d.path().to_path_buf();
                d.close()?;
                tracing::info!(
                    path = %path.display(),
                    position = self.state.position,
                    "destination closed"
                );
                Ok(())
            }
            Slot::Unopened => Ok(()),
            Slot::Closed => Err(StateError::NotOpen.into()),
        }
    }
}
