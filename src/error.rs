//! Fatal decode errors.
//!
//! Anything that reaches this type aborts the whole load; the caller discards
//! the pass and falls back to defaults.  Recoverable per-item problems (a bad
//! proxy entry, an unknown emoji key) never become a `SettingsError`.

use std::io;
use thiserror::Error;

use crate::stream::StreamError;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
    /// Payload lengths are implied by the id, so an unknown id cannot be skipped.
    #[error("Unknown block id {id:#x} at offset {offset}")]
    UnknownBlock { id: u32, offset: u64 },
    #[error("Cache size limit {size} is not above the minimum data size {minimum}")]
    CacheSizeTooSmall { size: i64, minimum: i64 },
    #[error("Negative cache time limit {0}")]
    NegativeTimeLimit(i32),
    #[error("Invalid send key value {0}")]
    InvalidSendKey(i32),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SettingsError>;
