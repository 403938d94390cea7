use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tuning for one transfer: chunk bounds, timeout budget, resume offset and
/// the two multiplier curves used by the adaptive chunk sizing.
///
/// After each response the chunk size is multiplied by a value linearly
/// related to how much of `max_interval` the response consumed. `ms0`/`ms1`
/// apply to successful fetches, `mf0`/`mf1` to failed ones; the `0` value is
/// used at 0% of the budget and the `1` value at 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum bytes requested in one chunk.
    pub chunk_size_max: u64,
    /// Minimum bytes requested in one chunk.
    pub chunk_size_min: u64,
    /// Timeout budget for one range request, in milliseconds.
    pub max_interval: u64,
    /// Byte offset where requests start. Used for resuming transfers.
    pub initial_pos: u64,
    /// Failed request, response time at 0% of `max_interval`.
    pub mf0: f64,
    /// Failed request, response time at 100% of `max_interval`.
    pub mf1: f64,
    /// Successful request, response time at 0% of `max_interval`.
    pub ms0: f64,
    /// Successful request, response time at 100% of `max_interval`.
    pub ms1: f64,
    /// Log per-chunk diagnostics (requested range, response time, errors).
    pub verbose: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size_max: 50_000_000,
            chunk_size_min: 10_000,
            max_interval: 10_000,
            initial_pos: 0,
            mf0: 1.0,
            mf1: 0.05,
            ms0: 2.0,
            ms1: 0.2,
            verbose: false,
        }
    }
}

impl TransferConfig {
    /// Timeout budget as a `Duration`.
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval)
    }

    /// Chunk size a fresh transfer starts with: midway between the bounds.
    pub fn initial_chunk_size(&self) -> u64 {
        self.chunk_size_min + (self.chunk_size_max - self.chunk_size_min) / 2
    }

    /// Reject configurations the chunk controller cannot work with.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_size_min == 0 {
            return Err("chunk_size_min must be at least 1 byte".into());
        }
        if self.chunk_size_min > self.chunk_size_max {
            return Err(format!(
                "chunk_size_min ({}) exceeds chunk_size_max ({})",
                self.chunk_size_min, self.chunk_size_max
            ));
        }
        if self.max_interval == 0 {
            return Err("max_interval must be greater than 0 ms".into());
        }
        for (name, v) in [
            ("mf0", self.mf0),
            ("mf1", self.mf1),
            ("ms0", self.ms0),
            ("ms1", self.ms1),
        ] {
            if !v.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("kanakuri")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit TOML file. Missing keys take defaults.
pub fn load_from_path(path: &Path) -> Result<TransferConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: TransferConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TransferConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TransferConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
