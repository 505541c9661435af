//! Diagnostic records collected while converting.
//!
//! The conversion never prints. Every component receives a `&mut Diagnostics`
//! and records what it skipped, rejected, or did; the caller decides how to
//! surface the records (the CLI replays them through `tracing`).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Severity of a diagnostic record, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// How much detail to keep: 0 = warn/error, 1 = +info, 2 = +debug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);
    pub const INFO: Verbosity = Verbosity(1);
    pub const DEBUG: Verbosity = Verbosity(2);

    pub fn new(level: u8) -> Result<Self> {
        if level > Self::DEBUG.0 {
            return Err(Error::config_invalid(
                "verbosity",
                format!("expected 0, 1 or 2, got {}", level),
                None,
            ));
        }
        Ok(Self(level))
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Lowest level kept at this verbosity.
    pub fn threshold(self) -> Level {
        match self.0 {
            0 => Level::Warn,
            1 => Level::Info,
            _ => Level::Debug,
        }
    }

    pub fn allows(self, level: Level) -> bool {
        level >= self.threshold()
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Verbosity::new(level)
    }
}

impl From<Verbosity> for u8 {
    fn from(verbosity: Verbosity) -> u8 {
        verbosity.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// `group` or `group.key` the record is about, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    verbosity: Verbosity,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, origin: Option<String>) {
        if !self.verbosity.allows(level) {
            return;
        }
        self.records.push(Diagnostic {
            level,
            message: message.into(),
            origin,
        });
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.push(Level::Debug, message, None);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message, None);
    }

    pub fn warn(&mut self, origin: impl Into<String>, message: impl Into<String>) {
        self.push(Level::Warn, message, Some(origin.into()));
    }

    pub fn error(&mut self, origin: impl Into<String>, message: impl Into<String>) {
        self.push(Level::Error, message, Some(origin.into()));
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn at(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.level == level)
    }
}
