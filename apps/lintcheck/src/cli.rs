//! CLI argument parsing via `clap`.

use crate::config::CliOverrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lintcheck",
    version,
    about = "Forbid patterns such as http:// URLs in a source tree",
    long_about = "lintcheck walks a directory, filters files with include/exclude globs, and reports every line matching a disallowed regex.\n\nConfiguration precedence: CLI > lintcheck.toml > defaults.\nExit codes: 0 clean, 1 violations found, 2 usage/IO error.",
    after_help = "Examples:\n  lintcheck --preset nohttp\n  lintcheck --root . --include 'src/**' --rule 'http://=use https instead'\n  lintcheck --rule 'TODO' --exclude 'docs/**' --output json"
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(long, help = "Directory to scan (default: nearest ancestor with lintcheck.toml or .git)")]
    pub root: Option<PathBuf>,
    #[arg(long, help = "Config file (default: lintcheck.{toml,yaml,yml} at the root)")]
    pub config: Option<PathBuf>,
    #[arg(long = "include", value_name = "GLOB", help = "Only scan files matching this glob (repeatable)")]
    pub include: Vec<String>,
    #[arg(long = "exclude", value_name = "GLOB", help = "Skip files matching this glob, on top of the defaults (repeatable)")]
    pub exclude: Vec<String>,
    #[arg(long = "rule", value_name = "REGEX=MESSAGE", help = "Disallowed pattern and its message (repeatable)")]
    pub rule: Vec<String>,
    #[arg(long, help = "Built-in rule set to prepend: nohttp")]
    pub preset: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "no_default_excludes", help = "Apply the default exclude set even if the config file disables it")]
    pub default_excludes: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Do not apply the default exclude set")]
    pub no_default_excludes: bool,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "Worker threads (default: one per CPU)")]
    pub threads: Option<usize>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root: self.root.clone(),
            config: self.config.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            rules: self.rule.clone(),
            preset: self.preset.clone(),
            default_excludes: match (self.default_excludes, self.no_default_excludes) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            output: self.output.clone(),
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_flags_collect() {
        let cli = Cli::try_parse_from([
            "lintcheck",
            "--root",
            "/tmp/x",
            "--include",
            "src/**",
            "--include",
            "docs/**",
            "--rule",
            "http://=use https",
            "--no-default-excludes",
            "-vv",
        ])
        .unwrap();
        let ov = cli.overrides();
        assert_eq!(ov.root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(ov.include, vec!["src/**", "docs/**"]);
        assert_eq!(ov.rules, vec!["http://=use https"]);
        assert_eq!(ov.default_excludes, Some(false));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["lintcheck", "--bogus"]).is_err());
    }

    #[test]
    fn test_default_excludes_flags() {
        let on = Cli::try_parse_from(["lintcheck", "--default-excludes"]).unwrap();
        assert_eq!(on.overrides().default_excludes, Some(true));
        let unset = Cli::try_parse_from(["lintcheck"]).unwrap();
        assert_eq!(unset.overrides().default_excludes, None);
        assert!(Cli::try_parse_from([
            "lintcheck",
            "--default-excludes",
            "--no-default-excludes"
        ])
        .is_err());
    }
}
