//! Text rules: a regex that must not appear, plus the message to report.
//!
//! Rules come from three places, in this order: a built-in preset, the
//! `[[rules]]` table of the config file, and `--rule regex=message` flags.
//! Once compiled into a `RuleSet` they are never mutated.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;

/// Message used when a `--rule` value carries no `=message` part.
const DEFAULT_MESSAGE_PREFIX: &str = "disallowed pattern: ";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
/// Uncompiled rule as written in `lintcheck.toml` or on the command line.
pub struct RuleSpec {
    pub pattern: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Regexes that suppress a match when they match at the same position.
    #[serde(default)]
    pub allow: Vec<String>,
}

impl RuleSpec {
    /// Parse `regex=message`. The first `=` not preceded by `\` separates the
    /// halves; `\=` inside the regex half stands for a literal `=`.
    pub fn parse_cli(raw: &str) -> Result<Self> {
        let mut split_at = None;
        let mut escaped = false;
        for (i, c) in raw.char_indices() {
            match c {
                '\\' => escaped = !escaped,
                '=' if !escaped => {
                    split_at = Some(i);
                    break;
                }
                _ => escaped = false,
            }
        }
        let (pattern, message) = match split_at {
            Some(i) => (&raw[..i], Some(raw[i + 1..].trim().to_string())),
            None => (raw, None),
        };
        let pattern = pattern.replace("\\=", "=");
        if pattern.is_empty() {
            return Err(Error::InvalidRule {
                rule: raw.to_string(),
                reason: "empty pattern".into(),
            });
        }
        Ok(Self {
            pattern,
            message: message.filter(|m| !m.is_empty()),
            allow: Vec::new(),
        })
    }
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub message: String,
    allow: Vec<Regex>,
}

impl Rule {
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let invalid = |e: regex::Error| Error::InvalidRule {
            rule: spec.pattern.clone(),
            reason: e.to_string(),
        };
        let pattern = Regex::new(&spec.pattern).map_err(invalid)?;
        let allow = spec
            .allow
            .iter()
            .map(|a| Regex::new(a).map_err(invalid))
            .collect::<Result<Vec<_>>>()?;
        let message = spec
            .message
            .clone()
            .unwrap_or_else(|| format!("{}{}", DEFAULT_MESSAGE_PREFIX, spec.pattern));
        Ok(Self {
            pattern,
            message,
            allow,
        })
    }

    /// Every non-overlapping, non-empty, non-allowed match in `line`.
    pub fn find_in<'a>(&'a self, line: &'a str) -> impl Iterator<Item = regex::Match<'a>> + 'a {
        self.pattern
            .find_iter(line)
            .filter(move |m| !m.as_str().is_empty() && !self.is_allowed(line, m.start()))
    }

    fn is_allowed(&self, line: &str, start: usize) -> bool {
        self.allow.iter().any(|a| {
            a.find_at(line, start)
                .map(|am| am.start() == start)
                .unwrap_or(false)
        })
    }
}

/// Ordered, immutable list of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn compile<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RuleSpec>,
    {
        let rules = specs.into_iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Built-in rule lists selectable with `--preset`.
pub fn preset(name: &str) -> Result<Vec<RuleSpec>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "nohttp" => Ok(vec![RuleSpec {
            pattern: "http://".into(),
            message: Some("http:// URL found; use https:// instead".into()),
            allow: Vec::new(),
        }]),
        _ => Err(Error::UnknownPreset(name.to_string())),
    }
}
