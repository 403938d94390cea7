//! Map curl failures onto `RangeError`.

use super::error::RangeError;

/// Classify a curl error. Timeouts are split on whether the response had
/// already started when the deadline passed.
pub fn classify_curl_error(e: curl::Error, response_started: bool) -> RangeError {
    if e.is_operation_timedout() {
        return if response_started {
            RangeError::ResponseTimeout
        } else {
            RangeError::RequestTimeout
        };
    }
    RangeError::Network(e)
}

/// Network-level failures worth calling out in logs (connection refused,
/// DNS, resets) as opposed to protocol or local errors.
pub fn is_connection_error(e: &curl::Error) -> bool {
    e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
}
