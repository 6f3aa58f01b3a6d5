//! lintcheck CLI binary entry point.
//! Resolves configuration, runs the scanner, and prints results.

use clap::Parser;
use lintcheck::cli::Cli;
use lintcheck::config::{self, Effective};
use lintcheck::output::{self, EXIT_ERROR};
use lintcheck::utils::{error_prefix, info_prefix, init_tracing, note_prefix, warn_prefix};
use lintcheck::{PathFilter, RuleSet, ScanOptions};
use tracing::debug;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let eff = match config::resolve_effective(&cli.overrides()) {
        Ok(eff) => eff,
        Err(e) => fail(e),
    };
    let human = eff.output != "json";
    if human && cli.verbose > 0 {
        eprintln!(
            "{} Scanning {} with {} rule(s)",
            info_prefix(),
            eff.root.display(),
            eff.rules.len()
        );
    }

    let code = match run(&eff) {
        Ok(res) => {
            if human && eff.config_path.is_none() {
                eprintln!("{} No lintcheck.toml found; using defaults.", note_prefix());
            }
            if human && !res.skipped.is_empty() {
                eprintln!(
                    "{} {} file(s) skipped (not readable as text)",
                    warn_prefix(),
                    res.skipped.len()
                );
            }
            output::report(&res, &eff.output)
        }
        Err(e) => fail(e),
    };
    std::process::exit(code);
}

fn run(eff: &Effective) -> lintcheck::Result<lintcheck::ScanResult> {
    let filter = if eff.default_excludes {
        PathFilter::with_defaults(&eff.include, &eff.exclude)?
    } else {
        PathFilter::new(&eff.include, &eff.exclude)?
    };
    let rules = RuleSet::compile(&eff.rules)?;
    debug!(
        include = ?filter.include_patterns().collect::<Vec<_>>(),
        exclude = ?filter.exclude_patterns().collect::<Vec<_>>(),
        rules = rules.len(),
        "resolved scan inputs"
    );
    let options = ScanOptions {
        threads: eff.threads,
        follow_links: false,
    };
    lintcheck::scan_with(&eff.root, &filter, &rules, &options)
}

fn fail(e: lintcheck::Error) -> ! {
    eprintln!("{} {}", error_prefix(), e);
    std::process::exit(EXIT_ERROR);
}
