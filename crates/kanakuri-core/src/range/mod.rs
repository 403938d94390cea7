//! HTTP Range requests.
//!
//! A range request fetches one inclusive byte span under a single deadline
//! and always yields a `RangeResult`: the bytes actually copied plus the
//! reason it stopped short, if it did. Partial data is therefore never lost,
//! and the transfer loop can commit it before retrying.

mod classify;
mod error;
mod request;
mod transport;

pub use classify::{classify_curl_error, is_connection_error};
pub use error::RangeError;
pub use transport::{Transport, TransportOptions};

use std::time::Duration;

/// Outcome of one range request.
#[derive(Debug)]
pub struct RangeResult {
    /// Bytes copied, starting at the requested start offset. Equal to the
    /// full span on success, otherwise the prefix copied before the failure.
    pub bytes: Vec<u8>,
    /// Why the request ended early; `None` on success.
    pub error: Option<RangeError>,
}

impl RangeResult {
    pub fn complete(bytes: Vec<u8>) -> Self {
        Self { bytes, error: None }
    }

    pub fn failed(bytes: Vec<u8>, error: RangeError) -> Self {
        Self {
            bytes,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Source of byte ranges. Implemented by `Transport` over HTTP; the transfer
/// state machine only depends on this trait.
pub trait RangeFetch {
    /// Fetch `[start, end]` (inclusive) of `url`, giving up after `timeout`.
    fn fetch_range(&mut self, url: &str, start: u64, end: u64, timeout: Duration) -> RangeResult;
}

impl<T: RangeFetch + ?Sized> RangeFetch for &mut T {
    fn fetch_range(&mut self, url: &str, start: u64, end: u64, timeout: Duration) -> RangeResult {
        (**self).fetch_range(url, start, end, timeout)
    }
}

impl<T: RangeFetch + ?Sized> RangeFetch for Box<T> {
    fn fetch_range(&mut self, url: &str, start: u64, end: u64, timeout: Duration) -> RangeResult {
        (**self).fetch_range(url, start, end, timeout)
    }
}
