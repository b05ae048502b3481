//! Centralized error types for the crate
//!
//! Host-facing fallible operations (config, priority parsing) return `Error`.
//! Use `Result<T>` as shorthand for `std::result::Result<T, Error>`.
//!
//! The log path itself never produces an `Error`: dropped events are
//! absorbed inside the bridge (see `bridge::DropReason`).

use std::fmt;
use std::path::PathBuf;

/// All host-facing errors
#[derive(Debug)]
pub enum Error {
    // === Config ===
    /// Failed to read or write the config file
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    /// Config could not be serialized
    ConfigSerialize { source: toml::ser::Error },

    // === Values ===
    /// Unknown priority name
    InvalidPriority { value: String },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            Self::ConfigSerialize { source } => Some(source),
            Self::InvalidPriority { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigIo { path, .. } => write!(f, "Config IO error: {}", path.display()),
            Self::ConfigParse {
                path: Some(path), ..
            } => write!(f, "Invalid config file: {}", path.display()),
            Self::ConfigParse { path: None, .. } => write!(f, "Invalid config"),
            Self::ConfigSerialize { .. } => write!(f, "Cannot serialize config"),
            Self::InvalidPriority { value } => write!(
                f,
                "Invalid priority '{}' (expected debug, info, error or a number)",
                value
            ),
        }
    }
}

/// Alias for Result with Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_invalid_priority() {
        let err = Error::InvalidPriority {
            value: "loud".into(),
        };
        assert!(err.to_string().contains("'loud'"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_config_io_has_source() {
        let err = Error::ConfigIo {
            path: PathBuf::from("/nope/config.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nope/config.toml"));
        assert!(err.source().is_some());
    }
}
