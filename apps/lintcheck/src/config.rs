//! Configuration discovery and effective settings resolution.
//!
//! lintcheck reads `lintcheck.toml|yaml|yml` from the scan root and merges it
//! with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `root`: closest ancestor of the current dir holding a config or `.git`
//! - `output`: `human`
//! - `default_excludes`: true
//! - `include`, `exclude`, `rules`: empty
//!
//! Overrides precedence: CLI > config file > defaults. A non-empty list on the
//! CLI replaces the config file's list.

use crate::error::{Error, Result};
use crate::rules::{preset, RuleSpec};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["lintcheck.toml", "lintcheck.yaml", "lintcheck.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// Root configuration loaded from `lintcheck.toml|yaml`.
pub struct LintConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub default_excludes: Option<bool>,
    pub preset: Option<String>,
    pub threads: Option<usize>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Values taken from the command line; `None`/empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub rules: Vec<String>,
    pub preset: Option<String>,
    /// `--default-excludes` / `--no-default-excludes`.
    pub default_excludes: Option<bool>,
    pub output: Option<String>,
    pub threads: Option<usize>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the run after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub default_excludes: bool,
    pub threads: Option<usize>,
    pub rules: Vec<RuleSpec>,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `lintcheck.toml|yaml|yml` or a `.git` entry is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Locate the config file at `root`, if any.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.is_file())
}

/// Parse a config file; the format follows the extension.
pub fn load_config(path: &Path) -> Result<LintConfig> {
    let s = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let root = match cli.root.as_ref() {
        Some(r) => r.clone(),
        None => {
            let cwd = std::env::current_dir().map_err(|source| Error::Io {
                path: PathBuf::from("."),
                source,
            })?;
            detect_root(&cwd)
        }
    };
    let config_path = cli.config.clone().or_else(|| find_config(&root));
    let cfg = match config_path.as_ref() {
        Some(p) => load_config(p)?,
        None => LintConfig::default(),
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(Error::Config {
            path: config_path.clone().unwrap_or_default(),
            message: format!("unknown output mode '{}' (expected human|json)", output),
        });
    }

    let include = prefer_cli(&cli.include, cfg.include);
    let exclude = prefer_cli(&cli.exclude, cfg.exclude);
    let default_excludes = cli
        .default_excludes
        .or(cfg.default_excludes)
        .unwrap_or(true);
    let threads = cli.threads.or(cfg.threads);

    let mut rules = match cli.preset.as_ref().or(cfg.preset.as_ref()) {
        Some(name) => preset(name)?,
        None => Vec::new(),
    };
    if cli.rules.is_empty() {
        rules.extend(cfg.rules);
    } else {
        for raw in &cli.rules {
            rules.push(RuleSpec::parse_cli(raw)?);
        }
    }
    if rules.is_empty() {
        return Err(Error::NoRules);
    }

    Ok(Effective {
        root,
        config_path,
        output,
        include,
        exclude,
        default_excludes,
        threads,
        rules,
    })
}

fn prefer_cli(cli: &[String], cfg: Vec<String>) -> Vec<String> {
    if cli.is_empty() {
        cfg
    } else {
        cli.to_vec()
    }
}
