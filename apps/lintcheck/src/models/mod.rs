//! Scan result models shared by the scanner and the printers.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One occurrence of a disallowed pattern.
pub struct Violation {
    /// Path relative to the scan root, `/`-separated.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub matched: String,
    pub message: String,
    /// Index of the producing rule in the rule set.
    #[serde(skip)]
    pub rule: usize,
}

impl Violation {
    /// Sort key: path, then position, then rule order.
    pub fn sort_key(&self) -> (&str, usize, usize, usize) {
        (self.path.as_str(), self.line, self.column, self.rule)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A file that passed the filter but could not be scanned.
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Outcome of one scan invocation.
pub struct ScanResult {
    pub violations: Vec<Violation>,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

impl ScanResult {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
