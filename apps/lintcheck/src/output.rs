//! Output rendering for scan results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-violation fields, skipped files, and a top-level summary.

use crate::models::ScanResult;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Exit code for a clean run.
pub const EXIT_CLEAN: i32 = 0;
/// Exit code when at least one violation was found.
pub const EXIT_VIOLATIONS: i32 = 1;
/// Exit code for usage, configuration, and I/O failures.
pub const EXIT_ERROR: i32 = 2;

pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Map a result to the process exit code.
pub fn exit_code(res: &ScanResult) -> i32 {
    if res.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_VIOLATIONS
    }
}

/// Print the result in the requested format and return the exit code.
pub fn report(res: &ScanResult, output: &str) -> i32 {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_json(res)) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("{} {}", crate::utils::error_prefix(), e);
                return EXIT_ERROR;
            }
        },
        _ => print!("{}", render_human(res, use_colors(output))),
    }
    exit_code(res)
}

/// Render `path:line:column: message` lines followed by a summary line.
pub fn render_human(res: &ScanResult, color: bool) -> String {
    let mut out = String::new();
    for v in &res.violations {
        let loc = format!("{}:{}:{}", v.path, v.line, v.column);
        let loc = if color { loc.bold().to_string() } else { loc };
        out.push_str(&format!("{}: {}\n", loc, v.message));
    }
    let summary = format!(
        "-- Summary -- violations={} files={} skipped={}",
        res.violations.len(),
        res.files_scanned,
        res.skipped.len()
    );
    if color {
        let summary = if res.is_clean() {
            summary.green().bold().to_string()
        } else {
            summary.red().bold().to_string()
        };
        out.push_str(&summary);
    } else {
        out.push_str(&summary);
    }
    out.push('\n');
    out
}

/// Compose the JSON report object (pure) for testing/snapshot purposes.
pub fn compose_json(res: &ScanResult) -> JsonVal {
    json!({
        "violations": res.violations,
        "skipped": res.skipped,
        "summary": {
            "violations": res.violations.len(),
            "files": res.files_scanned,
            "skipped": res.skipped.len(),
        }
    })
}
