//! What is being transferred: URL, size and expected digest.

use crate::checksum::ExpectedDigest;

use super::error::TransferError;

/// Remote file of known size and digest. Fixed for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct TransferTarget {
    url: String,
    total_size: u64,
    expected_digest: ExpectedDigest,
}

impl TransferTarget {
    /// Validates that `url` is an absolute http(s) URL.
    pub fn new(
        url: &str,
        total_size: u64,
        expected_digest: ExpectedDigest,
    ) -> Result<Self, TransferError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| TransferError::InvalidTarget(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(TransferError::InvalidTarget(format!(
                    "unsupported scheme {:?} in {}",
                    other, url
                )))
            }
        }
        Ok(Self {
            url: parsed.into(),
            total_size,
            expected_digest,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn expected_digest(&self) -> &ExpectedDigest {
        &self.expected_digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        let d = ExpectedDigest::base64("x");
        assert!(TransferTarget::new("http://127.0.0.1:8080/a.bin", 1, d.clone()).is_ok());
        let t = TransferTarget::new("https://example.com/test.txt", 1234, d).unwrap();
        assert_eq!(t.url(), "https://example.com/test.txt");
        assert_eq!(t.total_size(), 1234);
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        let d = ExpectedDigest::base64("x");
        assert!(matches!(
            TransferTarget::new("ftp://example.com/a", 1, d.clone()),
            Err(TransferError::InvalidTarget(_))
        ));
        assert!(matches!(
            TransferTarget::new("not a url", 1, d),
            Err(TransferError::InvalidTarget(_))
        ));
    }
}
