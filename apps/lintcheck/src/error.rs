//! Error types for lintcheck.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running a scan.
///
/// `Encoding` never aborts a scan: the scanner records the file as skipped
/// and moves on. Everything else surfaces to the binary as exit code 2.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text", path.display())]
    Encoding { path: PathBuf },

    #[error("invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("unknown preset '{0}' (available: nohttp)")]
    UnknownPreset(String),

    #[error("no rules configured; pass --rule, --preset, or add [[rules]] to lintcheck.toml")]
    NoRules,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
