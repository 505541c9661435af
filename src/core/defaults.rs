use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::diagnostics::Verbosity;
use crate::error::{Error, Result};

pub const DEFAULT_INPUT: &str = "cdk-outputs.json";
pub const DEFAULT_OUTPUT: &str = "cdk-outputs.sh";

/// Partial configuration. Every field is optional; unset fields fall back
/// to the defaults when resolved into a [`ConvertConfig`].
///
/// Also the shape of a `--config` JSON file:
///
/// ```json
/// { "input": "cdk-outputs.json", "output": "env/stack.sh", "failOnMissing": true, "verbosity": 1 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConvertOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_missing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
}

impl ConvertOptions {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ConvertOptions) -> ConvertOptions {
        ConvertOptions {
            input: other.input.or(self.input),
            output: other.output.or(self.output),
            fail_on_missing: other.fail_on_missing.or(self.fail_on_missing),
            verbosity: other.verbosity.or(self.verbosity),
        }
    }

    /// Read options from a JSON config file.
    pub fn from_file(path: &Path) -> Result<ConvertOptions> {
        let content = fs::read_to_string(path).map_err(|e| {
            let problem = if e.kind() == ErrorKind::NotFound {
                "config file not found".to_string()
            } else {
                format!("cannot read config file: {}", e)
            };
            Error::config_invalid("config", problem, Some(path.display().to_string()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::config_invalid("config", e.to_string(), Some(path.display().to_string()))
        })
    }
}

/// Fully resolved configuration for one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub fail_on_missing: bool,
    pub verbosity: Verbosity,
}

impl ConvertConfig {
    pub fn resolve(options: ConvertOptions) -> ConvertConfig {
        ConvertConfig {
            input: options.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output: options.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            fail_on_missing: options.fail_on_missing.unwrap_or(false),
            verbosity: options.verbosity.unwrap_or_default(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::resolve(ConvertOptions::default())
    }
}
