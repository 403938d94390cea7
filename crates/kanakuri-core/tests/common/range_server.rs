//! Minimal HTTP/1.1 server that answers Range GETs for integration tests.
//!
//! Serves a single static body, one request per connection. Options let a
//! test make the server misbehave: ignore the Range header, send bytes past
//! the requested span, delay the response, or stall mid-body.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeServerOptions {
    /// If true, GET ignores Range and always returns 200 with the full body.
    pub ignore_ranges: bool,
    /// Bytes appended after the requested span (Content-Length includes them).
    pub extra_bytes: usize,
    /// Sleep before sending anything.
    pub header_delay: Option<Duration>,
    /// Send headers and this many body bytes, then stall for `stall_for`.
    pub stall_after: Option<usize>,
    pub stall_for: Duration,
}

/// Handle to a running server: its URL and the Range headers it has seen.
pub struct RangeServer {
    pub url: String,
    ranges: Arc<Mutex<Vec<String>>>,
}

impl RangeServer {
    /// Raw `Range` header values received so far, in arrival order.
    pub fn ranges(&self) -> Vec<String> {
        self.ranges.lock().unwrap().clone()
    }
}

/// Starts a well-behaved server in a background thread serving `body`.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let ranges = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&ranges);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &body, opts, &seen));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/file.bin", port),
        ranges,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: RangeServerOptions,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (raw_range, range) = parse_range(request);
    if let Some(raw) = raw_range {
        seen.lock().unwrap().push(raw.to_string());
    }

    if let Some(d) = opts.header_delay {
        thread::sleep(d);
    }

    let total = body.len() as u64;
    let (status, mut payload) = match range {
        Some((start, end_incl)) if !opts.ignore_ranges && start < total => {
            let end_excl = end_incl.saturating_add(1).min(total) as usize;
            ("206 Partial Content", body[start as usize..end_excl].to_vec())
        }
        Some(_) if !opts.ignore_ranges => ("416 Range Not Satisfiable", Vec::new()),
        _ => ("200 OK", body.to_vec()),
    };
    payload.extend(std::iter::repeat(0xAB).take(opts.extra_bytes));

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
        status,
        payload.len()
    );
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    match opts.stall_after {
        Some(k) => {
            let k = k.min(payload.len());
            let _ = stream.write_all(&payload[..k]);
            let _ = stream.flush();
            thread::sleep(opts.stall_for);
            let _ = stream.write_all(&payload[k..]);
        }
        None => {
            let _ = stream.write_all(&payload);
        }
    }
}

/// Returns the raw Range value and the parsed (start, end_inclusive) for
/// `Range: bytes=X-Y`.
fn parse_range(request: &str) -> (Option<&str>, Option<(u64, u64)>) {
    for line in request.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("range") {
            continue;
        }
        let value = value.trim();
        let parsed = value
            .strip_prefix("bytes=")
            .and_then(|span| span.split_once('-'))
            .and_then(|(a, b)| {
                let start = a.trim().parse::<u64>().ok()?;
                let end = b.trim();
                let end = if end.is_empty() {
                    u64::MAX
                } else {
                    end.parse::<u64>().ok()?
                };
                Some((start, end))
            });
        return (Some(value), parsed);
    }
    (None, None)
}
