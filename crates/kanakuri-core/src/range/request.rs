//! One ranged GET with a single deadline and an exact-length receive buffer.

use std::cell::Cell;
use std::time::Duration;

use super::classify::classify_curl_error;
use super::error::RangeError;
use super::RangeResult;

/// Observations shared between the header and body callbacks.
#[derive(Default)]
struct Progress {
    received: Cell<usize>,
    response_started: Cell<bool>,
    overflow: Cell<bool>,
}

/// Fetch `[start, end]` (inclusive) from `url` on `easy`. Never fails: the
/// result carries whatever prefix was copied plus the classified error.
pub(super) fn fetch_range(
    easy: &mut curl::easy::Easy,
    url: &str,
    start: u64,
    end: u64,
    timeout: Duration,
) -> RangeResult {
    let expected = end.saturating_sub(start).saturating_add(1);
    let mut buf = vec![0u8; expected as usize];
    let progress = Progress::default();

    let outcome = configure(easy, url, start, end, timeout)
        .and_then(|()| perform(easy, &mut buf, &progress));

    let received = progress.received.get();
    buf.truncate(received);
    let received = received as u64;

    let error = if progress.overflow.get() {
        Some(RangeError::SubChunkOverflow { expected, received })
    } else if received == expected {
        None
    } else {
        match outcome {
            Ok(()) => Some(RangeError::PartialTransfer { expected, received }),
            Err(e) => Some(classify_curl_error(e, progress.response_started.get())),
        }
    };

    RangeResult { bytes: buf, error }
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    start: u64,
    end: u64,
    timeout: Duration,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    // curl expects "start-end" and sends it as "Range: bytes=start-end".
    easy.range(&format!("{}-{}", start, end))?;
    // Covers connect, headers and body: one deadline per request.
    easy.timeout(timeout)?;
    Ok(())
}

fn perform(
    easy: &mut curl::easy::Easy,
    buf: &mut [u8],
    progress: &Progress,
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.header_function(|line| {
        // Blank line terminates a header block.
        if line == b"\r\n" || line == b"\n" {
            progress.response_started.set(true);
        }
        true
    })?;
    transfer.write_function(|data| {
        progress.response_started.set(true);
        let at = progress.received.get();
        let Some(slot) = buf.get_mut(at..at + data.len()) else {
            progress.overflow.set(true);
            // Returning less than offered makes curl abort with a write error.
            return Ok(0);
        };
        slot.copy_from_slice(data);
        progress.received.set(at + data.len());
        Ok(data.len())
    })?;
    transfer.perform()
}
