//! libinput log priority
//!
//! `Priority` mirrors `enum libinput_log_priority`. The bridge never
//! interprets it; values outside the three known tiers pass through intact.

use crate::constants::{PRIORITY_DEBUG, PRIORITY_ERROR, PRIORITY_INFO};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a libinput log message (ABI-compatible with the C enum)
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PriorityRepr", into = "PriorityRepr")]
pub struct Priority(u32);

impl Priority {
    pub const DEBUG: Self = Self(PRIORITY_DEBUG);
    pub const INFO: Self = Self(PRIORITY_INFO);
    pub const ERROR: Self = Self(PRIORITY_ERROR);

    /// Wrap a raw priority value as received from the library
    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Name of a known tier, `None` for any other value
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            PRIORITY_DEBUG => Some("debug"),
            PRIORITY_INFO => Some("info"),
            PRIORITY_ERROR => Some("error"),
            _ => None,
        }
    }

    /// `tracing` level used when re-emitting a message
    ///
    /// Unknown values map to WARN so they stay visible under the default filter.
    pub fn tracing_level(self) -> tracing::Level {
        match self.0 {
            PRIORITY_DEBUG => tracing::Level::DEBUG,
            PRIORITY_INFO => tracing::Level::INFO,
            PRIORITY_ERROR => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEBUG
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "priority({})", self.0),
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::DEBUG),
            "info" => Ok(Self::INFO),
            "error" => Ok(Self::ERROR),
            other => other
                .parse::<u32>()
                .map(Self)
                .map_err(|_| Error::InvalidPriority {
                    value: trimmed.to_string(),
                }),
        }
    }
}

/// Config representation: a tier name or a bare number
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PriorityRepr {
    Name(String),
    Value(u32),
}

impl TryFrom<PriorityRepr> for Priority {
    type Error = Error;

    fn try_from(repr: PriorityRepr) -> Result<Self, Self::Error> {
        match repr {
            PriorityRepr::Name(name) => name.parse(),
            PriorityRepr::Value(value) => Ok(Self(value)),
        }
    }
}

impl From<Priority> for PriorityRepr {
    fn from(priority: Priority) -> Self {
        match priority.name() {
            Some(name) => PriorityRepr::Name(name.to_string()),
            None => PriorityRepr::Value(priority.0),
        }
    }
}
