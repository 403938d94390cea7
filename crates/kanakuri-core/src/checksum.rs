//! SHA-256 verification of completed downloads.
//!
//! Digests are computed by streaming, never by loading the whole file, and
//! compared against an expected value in a fixed textual encoding.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Textual representation of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    /// Standard base64 with padding.
    #[default]
    Base64,
    /// Lowercase hexadecimal.
    Hex,
}

impl DigestEncoding {
    pub fn encode(self, digest: &[u8]) -> String {
        match self {
            DigestEncoding::Base64 => BASE64.encode(digest),
            DigestEncoding::Hex => hex::encode(digest),
        }
    }
}

impl fmt::Display for DigestEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestEncoding::Base64 => write!(f, "base64"),
            DigestEncoding::Hex => write!(f, "hex"),
        }
    }
}

/// SHA-256 digest a completed file is expected to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    value: String,
    encoding: DigestEncoding,
}

impl ExpectedDigest {
    pub fn new(value: impl Into<String>, encoding: DigestEncoding) -> Self {
        Self {
            value: value.into().trim().to_string(),
            encoding,
        }
    }

    pub fn base64(value: impl Into<String>) -> Self {
        Self::new(value, DigestEncoding::Base64)
    }

    pub fn hex(value: impl Into<String>) -> Self {
        Self::new(value, DigestEncoding::Hex)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn encoding(&self) -> DigestEncoding {
        self.encoding
    }

    /// Compare a raw digest against the expected value. Hex is compared
    /// ignoring ASCII case; base64 is case-sensitive.
    pub fn matches(&self, digest: &[u8]) -> bool {
        let actual = self.encoding.encode(digest);
        match self.encoding {
            DigestEncoding::Hex => actual.eq_ignore_ascii_case(&self.value),
            DigestEncoding::Base64 => actual == self.value,
        }
    }
}

/// Stream `reader` to EOF through SHA-256 and return the raw digest.
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<[u8; 32]> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Ok(out)
}

/// Compute SHA-256 of a file and return the digest in `encoding`.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path, encoding: DigestEncoding) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let digest = sha256_reader(f).with_context(|| format!("read {}", path.display()))?;
    Ok(encoding.encode(&digest))
}
