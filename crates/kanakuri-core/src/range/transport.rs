//! Reusable HTTP transport agent.
//!
//! Wraps one libcurl easy handle. libcurl keeps its connection cache inside
//! the handle, so consecutive range requests reuse the same connection.

use std::path::PathBuf;
use std::time::Duration;

use super::request;
use super::{RangeFetch, RangeResult};

/// Connection-level settings applied once when the agent is built.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Extra request headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// `User-Agent` header; libcurl sends none when unset.
    pub user_agent: Option<String>,
    /// Follow 3xx redirects.
    pub follow_redirects: bool,
    /// CA bundle used to verify the server certificate.
    pub ca_path: Option<PathBuf>,
    /// Client certificate (PEM) for mutual TLS.
    pub client_cert: Option<PathBuf>,
    /// Private key (PEM) matching `client_cert`.
    pub client_key: Option<PathBuf>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            user_agent: Some(concat!("kanakuri/", env!("CARGO_PKG_VERSION")).to_string()),
            follow_redirects: true,
            ca_path: None,
            client_cert: None,
            client_key: None,
        }
    }
}

/// HTTP(S) agent issuing ranged GETs over a persistent libcurl handle.
pub struct Transport {
    easy: curl::easy::Easy,
}

impl Transport {
    pub fn new(options: &TransportOptions) -> Result<Self, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.get(true)?;
        easy.follow_location(options.follow_redirects)?;
        easy.max_redirections(10)?;
        if let Some(ua) = &options.user_agent {
            easy.useragent(ua)?;
        }
        if let Some(ca) = &options.ca_path {
            easy.cainfo(ca)?;
        }
        if let Some(cert) = &options.client_cert {
            easy.ssl_cert(cert)?;
        }
        if let Some(key) = &options.client_key {
            easy.ssl_key(key)?;
        }

        if !options.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &options.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        Ok(Self { easy })
    }

    /// Agent with default options.
    pub fn with_defaults() -> Result<Self, curl::Error> {
        Self::new(&TransportOptions::default())
    }
}

impl RangeFetch for Transport {
    fn fetch_range(&mut self, url: &str, start: u64, end: u64, timeout: Duration) -> RangeResult {
        request::fetch_range(&mut self.easy, url, start, end, timeout)
    }
}
