//! `kanakuri fetch` – download one file in adaptive chunks and verify it.

use anyhow::{bail, Context, Result};
use clap::Args;
use kanakuri_core::checksum::{DigestEncoding, ExpectedDigest};
use kanakuri_core::config::TransferConfig;
use kanakuri_core::range::{Transport, TransportOptions};
use kanakuri_core::transfer::{FileTransfer, StepStatus, TransferTarget};
use kanakuri_core::url_model;
use std::path::{Path, PathBuf};
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 500;
const FALLBACK_FILE_NAME: &str = "download.bin";

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// URL of the file.
    pub url: String,

    /// Exact size of the file in bytes.
    #[arg(long)]
    pub size: u64,

    /// Expected SHA-256 digest (base64 unless --hex).
    #[arg(long)]
    pub sha256: String,

    /// Destination path (default: last URL path segment in the current directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// The --sha256 value is hex.
    #[arg(long)]
    pub hex: bool,

    /// Continue from the current length of the output file instead of truncating it.
    #[arg(long)]
    pub resume: bool,

    /// Extra request header, "Name: value". May be repeated.
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// CA bundle for TLS verification.
    #[arg(long, value_name = "PATH")]
    pub ca: Option<PathBuf>,

    /// Client certificate for TLS.
    #[arg(long, value_name = "PATH")]
    pub cert: Option<PathBuf>,

    /// Private key for the client certificate.
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// Per-request timeout in milliseconds (overrides config).
    #[arg(long, value_name = "MS")]
    pub max_interval: Option<u64>,

    /// Smallest chunk size in bytes (overrides config).
    #[arg(long, value_name = "BYTES")]
    pub chunk_min: Option<u64>,

    /// Largest chunk size in bytes (overrides config).
    #[arg(long, value_name = "BYTES")]
    pub chunk_max: Option<u64>,
}

impl FetchArgs {
    /// Output path, or the URL's last path segment when none was given.
    pub fn output_path(&self) -> PathBuf {
        if let Some(p) = &self.output {
            return p.clone();
        }
        let name = url_model::file_name_from_url(&self.url)
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        PathBuf::from(name)
    }

    pub fn expected_digest(&self) -> ExpectedDigest {
        let encoding = if self.hex {
            DigestEncoding::Hex
        } else {
            DigestEncoding::Base64
        };
        ExpectedDigest::new(self.sha256.as_str(), encoding)
    }

    pub fn transport_options(&self) -> Result<TransportOptions> {
        let headers = self
            .headers
            .iter()
            .map(|h| parse_header(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(TransportOptions {
            headers,
            ca_path: self.ca.clone(),
            client_cert: self.cert.clone(),
            client_key: self.key.clone(),
            ..TransportOptions::default()
        })
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut TransferConfig) {
        if let Some(ms) = self.max_interval {
            cfg.max_interval = ms;
        }
        if let Some(min) = self.chunk_min {
            cfg.chunk_size_min = min;
        }
        if let Some(max) = self.chunk_max {
            cfg.chunk_size_max = max;
        }
    }
}

/// Split `"Name: value"` into a header pair.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("header {:?} is not of the form \"Name: value\"", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("header {:?} has an empty name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn existing_len(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(m) => Ok(m.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e).with_context(|| format!("stat {}", path.display())),
    }
}

pub async fn run_fetch(args: FetchArgs, mut cfg: TransferConfig) -> Result<()> {
    args.apply_overrides(&mut cfg);
    let output = args.output_path();

    let truncate = !args.resume;
    if args.resume {
        let have = existing_len(&output)?;
        if have > args.size {
            bail!(
                "{} is {} bytes, larger than the expected {} bytes; refusing to resume",
                output.display(),
                have,
                args.size
            );
        }
        cfg.initial_pos = have;
        if have > 0 {
            tracing::info!(path = %output.display(), bytes = have, "resuming");
        }
    }

    let target = TransferTarget::new(&args.url, args.size, args.expected_digest())?;
    let transport =
        Transport::new(&args.transport_options()?).context("failed to set up HTTP transport")?;
    let transfer = FileTransfer::new(target, transport, cfg)?;

    println!("Downloading {} -> {}", args.url, output.display());

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<StepStatus>(16);
    let progress_handle = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(status) = progress_rx.recv().await {
            let due = last_print
                .map(|t| t.elapsed().as_millis() as u64 >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || status.done {
                println!(
                    "Progress: {:.1} % ({} bytes remaining)",
                    status.fraction() * 100.0,
                    status.remaining()
                );
                last_print = Some(Instant::now());
            }
        }
    });

    let verified = tokio::task::spawn_blocking(move || -> Result<bool> {
        let mut transfer = transfer;
        transfer.open_destination(&output, truncate)?;
        let mut status = transfer.status();
        let _ = progress_tx.blocking_send(status);
        while !status.done {
            status = transfer.step()?;
            let _ = progress_tx.blocking_send(status);
        }
        drop(progress_tx);
        let ok = transfer.verify()?;
        transfer.close_destination()?;
        Ok(ok)
    })
    .await
    .context("transfer task join")??;

    let _ = progress_handle.await;

    println!("hash OK: {}", verified);
    if !verified {
        bail!("SHA-256 mismatch for {}", args.url);
    }
    Ok(())
}
