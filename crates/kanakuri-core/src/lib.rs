//! Adaptive, resumable, hash-verified HTTP range downloads.
//!
//! A [`transfer::FileTransfer`] fetches a file of known size chunk by chunk
//! over a reusable [`range::Transport`], growing or shrinking the chunk size
//! from how much of the per-request timeout each response used, and verifies
//! the finished file against an expected SHA-256 digest.

pub mod adaptive;
pub mod checksum;
pub mod config;
pub mod logging;
pub mod range;
pub mod storage;
pub mod transfer;
pub mod url_model;

pub use checksum::{DigestEncoding, ExpectedDigest};
pub use config::TransferConfig;
pub use range::{RangeError, RangeFetch, RangeResult, Transport, TransportOptions};
pub use transfer::{FileTransfer, Phase, StateError, StepStatus, TransferError, TransferTarget};
