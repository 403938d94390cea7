//! `kanakuri config` – show the effective configuration.

use anyhow::Result;
use kanakuri_core::config::{self, TransferConfig};
use std::path::Path;

pub fn run_config(explicit: Option<&Path>, cfg: &TransferConfig) -> Result<()> {
    match explicit {
        Some(p) => println!("# {}", p.display()),
        None => match config::config_path() {
            Ok(p) => println!("# {}", p.display()),
            Err(_) => println!("# built-in defaults"),
        },
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
