//! Error types for range normalization, lookup and the I/O around them.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Errors raised while building or querying a [`crate::BlockTable`].
#[derive(Error, Debug)]
pub enum InetnumError {
    /// `inetnum` start address is after its end address.
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: Ipv4Addr, end: Ipv4Addr },

    /// Text that should be an IPv4 address is not one.
    #[error("Invalid address: '{0}'")]
    InvalidAddress(String),

    /// Prefix length outside 0..=32, or an inverted search window.
    #[error("Invalid prefix length: {0}")]
    InvalidPrefix(String),

    /// Malformed `a.b.c.d/n` text.
    #[error("Invalid block: '{0}'")]
    InvalidBlock(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Cache file unreadable, corrupt, or built from another dump.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),
}

impl InetnumError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        InetnumError::Io {
            path: path.into(),
            source,
        }
    }
}
