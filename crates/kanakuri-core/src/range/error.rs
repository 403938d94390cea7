//! Failure kinds of a single range request.

/// Why a range request ended before delivering the full span.
///
/// All variants are per-chunk failures: the transfer loop feeds them into the
/// chunk controller and backs off, it never surfaces them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    /// The deadline passed before the response headers arrived.
    #[error("timeout (during request)")]
    RequestTimeout,
    /// The deadline passed while the body was still arriving.
    #[error("timeout (during response)")]
    ResponseTimeout,
    /// The server sent more bytes than requested (e.g. ignored the Range
    /// header and returned the whole resource).
    #[error("sub-chunk overflow: {received} of {expected} bytes copied before excess data")]
    SubChunkOverflow { expected: u64, received: u64 },
    /// The response ended cleanly but short of the requested span.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Any other transport failure (DNS, connect, reset, TLS, ...).
    #[error("network error: {0}")]
    Network(#[source] curl::Error),
}

impl RangeError {
    /// True for both deadline classifications.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RangeError::RequestTimeout | RangeError::ResponseTimeout)
    }

    /// True when the server could not be reached or the connection dropped.
    pub fn is_connection(&self) -> bool {
        match self {
            RangeError::Network(e) => super::classify::is_connection_error(e),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_flag_only_for_network_failures() {
        let refused = RangeError::Network(curl::Error::new(7));
        assert!(refused.is_connection());
        assert!(!refused.is_timeout());
        let ssl = RangeError::Network(curl::Error::new(60));
        assert!(!ssl.is_connection());
        assert!(!RangeError::ResponseTimeout.is_connection());
        assert!(!RangeError::PartialTransfer { expected: 2, received: 1 }.is_connection());
    }
}
