//! Checksum command: compute SHA-256 of a file.

use anyhow::{Context, Result};
use kanakuri_core::checksum::{self, DigestEncoding};
use std::path::Path;

/// Compute and print SHA-256 of the given file (base64 unless `hex`).
pub async fn run_checksum(path: &Path, hex: bool) -> Result<()> {
    let encoding = if hex {
        DigestEncoding::Hex
    } else {
        DigestEncoding::Base64
    };
    let owned = path.to_path_buf();
    let digest = tokio::task::spawn_blocking(move || checksum::sha256_path(&owned, encoding))
        .await
        .context("checksum task join")??;
    println!("{}  {}", digest, path.display());
    Ok(())
}
