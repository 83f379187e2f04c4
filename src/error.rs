//! Crate-wide error type.
//!
//! Per-line protocol errors (malformed IAMAT/WHATSAT/AT) are *not*
//! represented here — they never propagate past the connection loop,
//! they become a `? <line>` reply (see [`crate::message`]). This type
//! covers failures that can occur before or outside of a single
//! connection's request/reply cycle.

use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeofloodError {
    #[error("server name {0:?} is not a member of the configured topology")]
    UnknownServer(String),

    #[error("failed to load topology from {path}: {source}")]
    TopologyLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to bind listener on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("oracle request failed: {0}")]
    Oracle(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GeofloodError>;
