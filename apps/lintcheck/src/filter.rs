//! Include/exclude path filtering.
//!
//! Globs are matched against paths relative to the scan root, always with `/`
//! separators, using Ant-style semantics:
//! - `*` and `?` never cross a `/`.
//! - `**/` matches zero or more leading directories.
//! - a trailing `/**` matches everything below a directory.
//!
//! Directories are pruned as soon as an exclude glob matches them, either as
//! `dir` or as `dir/`, so `.git/**` and `**/.kotlin` both stop the walk.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// Excludes applied unless `--no-default-excludes` is given: VCS metadata,
/// IDE folders, build outputs, and binary artifacts.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git/**",
    "**/.gradle/**",
    ".idea/**",
    ".eclipse/**",
    "**/*.class",
    "**/*.hprof",
    "**/*.jar",
    "**/*.jpg",
    "**/*.png",
    "**/*.jks",
    "**/build/**",
    "**/.kotlin",
];

const MATCH_OPTS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob plus whether it ends in a recursive `**` component.
#[derive(Debug, Clone)]
struct Glob {
    pattern: Pattern,
    recursive_tail: bool,
}

impl Glob {
    fn compile(raw: &str) -> Result<Self> {
        let pattern = Pattern::new(raw).map_err(|source| Error::InvalidGlob {
            pattern: raw.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            recursive_tail: raw == "**" || raw.ends_with("/**"),
        })
    }

    fn matches(&self, rel: &str) -> bool {
        self.pattern.matches_with(rel, MATCH_OPTS)
    }

    /// `dir/**` covers everything below `dir`; test the slash form only for
    /// such globs so that `src/*` does not swallow `src/a/b.rs`.
    fn covers_dir(&self, dir: &str) -> bool {
        self.recursive_tail && self.matches(&format!("{}/", dir))
    }
}

/// Compiled include and exclude globs.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Glob>,
    exclude: Vec<Glob>,
}

impl PathFilter {
    /// Compile a filter from raw glob strings.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// Filter with the default exclude set plus `extra_exclude`.
    pub fn with_defaults<I, E, S, T>(include: I, extra_exclude: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(extra_exclude.into_iter().map(|s| s.as_ref().to_string()));
        Self::new(include, excludes)
    }

    /// Whether a file at `rel` (relative to the root) should be scanned.
    pub fn is_included(&self, rel: &Path) -> bool {
        let rel = normalize(rel);
        if self.is_excluded_file(&rel) {
            return false;
        }
        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|g| g.matches(&rel) || ancestors(&rel).any(|dir| g.covers_dir(dir)))
    }

    /// Whether the walk should skip the directory at `rel` and everything under it.
    pub fn prunes_dir(&self, rel: &Path) -> bool {
        let rel = normalize(rel);
        !rel.is_empty() && self.is_excluded_dir(&rel)
    }

    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.include.iter().map(|g| g.pattern.as_str())
    }

    pub fn exclude_patterns(&self) -> impl Iterator<Item = &str> {
        self.exclude.iter().map(|g| g.pattern.as_str())
    }

    fn is_excluded_dir(&self, dir: &str) -> bool {
        self.exclude
            .iter()
            .any(|g| g.matches(dir) || g.covers_dir(dir))
    }

    fn is_excluded_file(&self, rel: &str) -> bool {
        self.exclude.iter().any(|g| g.matches(rel))
            || ancestors(rel).any(|dir| self.is_excluded_dir(dir))
    }
}

fn compile_all<I, S>(globs: I) -> Result<Vec<Glob>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    globs.into_iter().map(|g| Glob::compile(g.as_ref())).collect()
}

/// Proper ancestor directories of a `/`-separated path, shallowest first.
fn ancestors(rel: &str) -> impl Iterator<Item = &str> {
    rel.match_indices('/').map(move |(i, _)| &rel[..i])
}

/// Relative path as a `/`-separated string, independent of the host OS.
pub fn normalize(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
