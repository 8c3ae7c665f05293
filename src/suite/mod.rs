pub mod error;

pub use error::{SuiteError, SuiteErrorKind};

use crate::expectation::Expectation;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;


/// A named SQL query and the expectation its result must meet.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Check {
    pub name: String,
    pub sql: String,
    #[serde(flatten)]
    pub expectation: Expectation,
}


/// A TOML file of checks.
///
/// ```toml
/// [vars]
/// table = "birds"
///
/// [[check]]
/// name = "count max in range"
/// sql = "SELECT count FROM {table}"
/// expect = "column_max_to_be_between"
/// column = "count"
/// min = 1
/// max = 10
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default, rename = "check")]
    pub checks: Vec<Check>,
}

impl FromStr for Suite {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Suite {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        tracing::debug!("Loading suite from '{}'", path.display());

        let text = fs::read_to_string(path).map_err(|source| SuiteError {
            kind: SuiteErrorKind::Io { path: path.to_path_buf(), source },
        })?;

        let suite: Suite = text.parse()?;
        if suite.checks.is_empty() {
            tracing::warn!("Suite '{}' defines no checks", path.display());
        }
        Ok(suite)
    }

    /// Checks with `{key}` placeholders in their name and SQL filled in.
    /// `overrides` take precedence over the suite's own `[vars]`.
    pub fn render(&self, overrides: &BTreeMap<String, String>) -> Vec<Check> {
        let mut vars = self.vars.clone();
        vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.checks
            .iter()
            .map(|check| Check {
                name: substitute(&check.name, &vars),
                sql: substitute(&check.sql, &vars),
                expectation: check.expectation.clone(),
            })
            .collect()
    }
}


/// Replace every `{key}` whose key is in `vars`. Anything else is kept verbatim.
pub fn substitute(template: &str, vars: &BTreeMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let key = after.find('}').map(|close| &after[..close]);
        match key.and_then(|key| vars.get(key).map(|value| (key, value))) {
            Some((key, value)) => {
                output.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}


/// Parse a `KEY=VALUE` command-line variable.
pub fn parse_var(s: &str) -> Result<(String, String), SuiteError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(SuiteError { kind: SuiteErrorKind::InvalidVar(s.to_string()) }),
    }
}
