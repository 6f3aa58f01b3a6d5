//! Directory scanner.
//!
//! The walk runs once, single-threaded and sorted by file name, producing the
//! candidate list. Candidates are then scanned on a rayon pool and the per-file
//! outcomes merged; violations are sorted by (path, line, column, rule) so the
//! report does not depend on the thread count.

use crate::error::{Error, Result};
use crate::filter::{normalize, PathFilter};
use crate::models::{ScanResult, SkippedFile, Violation};
use crate::rules::RuleSet;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Tuning knobs that do not change what is reported.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Worker count; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    pub follow_links: bool,
}

struct Candidate {
    abs: PathBuf,
    rel: String,
}

enum FileOutcome {
    Scanned(Vec<Violation>),
    Skipped(SkippedFile),
}

/// Scan `root` with default options.
pub fn scan(root: &Path, filter: &PathFilter, rules: &RuleSet) -> Result<ScanResult> {
    scan_with(root, filter, rules, &ScanOptions::default())
}

/// Scan every file under `root` that passes `filter`, applying `rules` line by line.
///
/// Only an unreadable `root` is an error. Files that cannot be decoded as
/// UTF-8 (or read at all) are logged and listed in `ScanResult::skipped`.
pub fn scan_with(
    root: &Path,
    filter: &PathFilter,
    rules: &RuleSet,
    options: &ScanOptions,
) -> Result<ScanResult> {
    check_root(root)?;
    let candidates = collect_candidates(root, filter, options.follow_links);
    debug!(count = candidates.len(), "collected candidate files");

    let outcomes = match options.threads {
        Some(n) if n > 0 => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| scan_all(&candidates, rules))
        }
        _ => scan_all(&candidates, rules),
    };

    let mut result = ScanResult::default();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Scanned(mut found) => {
                result.files_scanned += 1;
                result.violations.append(&mut found);
            }
            FileOutcome::Skipped(s) => result.skipped.push(s),
        }
    }
    result.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    result.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    info!(
        files = result.files_scanned,
        violations = result.violations.len(),
        skipped = result.skipped.len(),
        "scan finished"
    );
    Ok(result)
}

fn check_root(root: &Path) -> Result<()> {
    let io_err = |source| Error::Io {
        path: root.to_path_buf(),
        source,
    };
    let meta = fs::metadata(root).map_err(io_err)?;
    if !meta.is_dir() {
        return Err(io_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }
    fs::read_dir(root).map_err(io_err)?;
    Ok(())
}

fn collect_candidates(root: &Path, filter: &PathFilter, follow_links: bool) -> Vec<Candidate> {
    let rel_of = |p: &Path| normalize(p.strip_prefix(root).unwrap_or(p));
    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_type().is_dir() || !filter.prunes_dir(Path::new(&rel_of(e.path())))
        });

    let mut out = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = rel_of(entry.path());
        if filter.is_included(Path::new(&rel)) {
            out.push(Candidate {
                abs: entry.into_path(),
                rel,
            });
        }
    }
    out
}

fn scan_all(candidates: &[Candidate], rules: &RuleSet) -> Vec<FileOutcome> {
    candidates
        .par_iter()
        .map(|c| match read_text(&c.abs) {
            Ok(text) => {
                debug!(path = %c.rel, "scanning");
                FileOutcome::Scanned(scan_text(&c.rel, &text, rules))
            }
            Err(e) => {
                warn!("skipping {}: {}", c.rel, e);
                FileOutcome::Skipped(SkippedFile {
                    path: c.rel.clone(),
                    reason: skip_reason(&e),
                })
            }
        })
        .collect()
}

/// Short reason recorded for a file that could not be scanned.
fn skip_reason(e: &Error) -> String {
    match e {
        Error::Encoding { .. } => "not valid UTF-8".to_string(),
        Error::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| Error::Encoding {
        path: path.to_path_buf(),
    })
}

/// Apply every rule to every line of `text`, reporting as `rel`.
pub fn scan_text(rel: &str, text: &str, rules: &RuleSet) -> Vec<Violation> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut found = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for (rule_idx, rule) in rules.iter() {
            for m in rule.find_in(line) {
                found.push(Violation {
                    path: rel.to_string(),
                    line: idx + 1,
                    column: line[..m.start()].chars().count() + 1,
                    matched: m.as_str().to_string(),
                    message: rule.message.clone(),
                    rule: rule_idx,
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{preset, RuleSpec};
    use tempfile::tempdir;

    fn nohttp() -> RuleSet {
        RuleSet::compile(&preset("nohttp").unwrap()).unwrap()
    }

    fn no_filter() -> PathFilter {
        PathFilter::new(Vec::<&str>::new(), Vec::<&str>::new()).unwrap()
    }

    #[test]
    fn test_reports_line_and_column() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "first\nsecond\n  see http://example.com\n",
        )
        .unwrap();
        let res = scan(dir.path(), &no_filter(), &nohttp()).unwrap();
        assert_eq!(res.files_scanned, 1);
        assert_eq!(res.violations.len(), 1);
        let v = &res.violations[0];
        assert_eq!(v.path, "a.txt");
        assert_eq!(v.line, 3);
        assert_eq!(v.column, 7);
        assert_eq!(v.matched, "http://");
    }

    #[test]
    fn test_empty_root_is_clean() {
        let dir = tempdir().unwrap();
        let res = scan(dir.path(), &no_filter(), &nohttp()).unwrap();
        assert_eq!(res, ScanResult::default());
    }

    #[test]
    fn test_https_only_is_clean() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "https://example.com\n").unwrap();
        let res = scan(dir.path(), &no_filter(), &nohttp()).unwrap();
        assert!(res.is_clean());
        assert_eq!(res.files_scanned, 1);
    }

    #[test]
    fn test_default_excludes_hide_banned_content() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for sub in [".git", "app/build/gen", "sub/.gradle", ".kotlin"] {
            fs::create_dir_all(root.join(sub)).unwrap();
            fs::write(root.join(sub).join("x.txt"), "http://a").unwrap();
        }
        fs::write(root.join("lib.jar"), "http://a").unwrap();
        fs::write(root.join("keep.txt"), "http://a").unwrap();
        let filter =
            PathFilter::with_defaults(Vec::<&str>::new(), Vec::<&str>::new()).unwrap();
        let res = scan(root, &filter, &nohttp()).unwrap();
        let paths: Vec<_> = res.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["keep.txt"]);
        assert_eq!(res.files_scanned, 1);
    }

    #[test]
    fn test_non_utf8_file_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bin.dat"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(dir.path().join("ok.txt"), "http://x").unwrap();
        let res = scan(dir.path(), &no_filter(), &nohttp()).unwrap();
        assert_eq!(res.files_scanned, 1);
        assert_eq!(res.violations.len(), 1);
        assert_eq!(res.skipped.len(), 1);
        assert_eq!(res.skipped[0].path, "bin.dat");
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        let err = scan(&dir.path().join("nope"), &no_filter(), &nohttp()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_root_that_is_a_file_is_io_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            scan(&file, &no_filter(), &nohttp()),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_order_is_stable_across_thread_counts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for i in 0..20 {
            let sub = root.join(format!("d{}", i % 4));
            fs::create_dir_all(&sub).unwrap();
            fs::write(
                sub.join(format!("f{}.txt", i)),
                "http://a http://b\nok\nhttp://c\n",
            )
            .unwrap();
        }
        let rules = nohttp();
        let serial = scan_with(
            root,
            &no_filter(),
            &rules,
            &ScanOptions {
                threads: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let parallel = scan_with(
            root,
            &no_filter(),
            &rules,
            &ScanOptions {
                threads: Some(8),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(serial.violations.len(), 60);
        let mut sorted = serial.violations.clone();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        assert_eq!(serial.violations, sorted);
        assert_eq!(scan(root, &no_filter(), &rules).unwrap(), serial);
    }

    #[test]
    fn test_scan_text_multiple_rules_and_unicode_columns() {
        let specs = vec![
            RuleSpec::parse_cli("http://=insecure").unwrap(),
            RuleSpec::parse_cli("TODO=todo left").unwrap(),
        ];
        let rules = RuleSet::compile(&specs).unwrap();
        let found = scan_text("x.rs", "é TODO http://a\r\nTODO\n", &rules);
        let got: Vec<_> = found
            .iter()
            .map(|v| (v.line, v.column, v.message.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![(1, 8, "insecure"), (1, 3, "todo left"), (2, 1, "todo left")]
        );
    }

    #[test]
    fn test_skip_reason_keeps_io_cause() {
        let e = Error::Io {
            path: PathBuf::from("gone.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(skip_reason(&e), "permission denied");
        let e = Error::Encoding {
            path: PathBuf::from("x.bin"),
        };
        assert_eq!(skip_reason(&e), "not valid UTF-8");
    }

    #[test]
    fn test_empty_width_matches_are_ignored() {
        let rules = RuleSet::compile(&[RuleSpec::parse_cli("x*=empty").unwrap()]).unwrap();
        let found = scan_text("a.txt", "abc\n\nxx y\n", &rules);
        let got: Vec<_> = found
            .iter()
            .map(|v| (v.line, v.column, v.matched.as_str()))
            .collect();
        assert_eq!(got, vec![(3, 1, "xx")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_followed_only_when_asked() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("real.txt"), "http://a").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let res = scan(root, &no_filter(), &nohttp()).unwrap();
        let paths: Vec<_> = res.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["real.txt"]);
        assert_eq!(res.files_scanned, 1);

        let opts = ScanOptions {
            follow_links: true,
            ..Default::default()
        };
        let res = scan_with(root, &no_filter(), &nohttp(), &opts).unwrap();
        let paths: Vec<_> = res.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["link.txt", "real.txt"]);
        assert_eq!(res.files_scanned, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_errors_below_root_are_not_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/inner.txt"), "http://a").unwrap();
        fs::write(root.join("top.txt"), "http://b").unwrap();
        std::os::unix::fs::symlink("..", root.join("a/loop")).unwrap();

        let opts = ScanOptions {
            follow_links: true,
            ..Default::default()
        };
        let res = scan_with(root, &no_filter(), &nohttp(), &opts).unwrap();
        let paths: Vec<_> = res.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["a/inner.txt", "top.txt"]);
        assert_eq!(res.files_scanned, 2);
    }
}
