//! lintcheck core library.
//!
//! This crate exposes programmatic APIs for scanning a directory tree for
//! disallowed text patterns, such as insecure `http://` URLs.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `filter`: Include/exclude globs and the default exclude set.
//! - `rules`: Rule parsing, compilation, and presets.
//! - `scanner`: Directory walk and parallel per-file scanning.
//! - `models`: Violation and scan result structs.
//! - `output`: Human/JSON printers and exit codes.
//! - `error`: Error type shared by all of the above.
//! - `utils`: Message prefixes and logging setup.
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod output;
pub mod rules;
pub mod scanner;
pub mod utils;

pub use error::{Error, Result};
pub use filter::PathFilter;
pub use models::{ScanResult, SkippedFile, Violation};
pub use rules::{Rule, RuleSet, RuleSpec};
pub use scanner::{scan, scan_with, ScanOptions};
