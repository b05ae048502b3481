//! Configuration management
//!
//! Optional TOML file describing how a host wires the bridge:
//!
//! ```toml
//! [log]
//! priority = "debug"
//! verbose = false
//! forward_to_tracing = true
//! ```

use crate::bridge::Bridge;
use crate::error::{Error, Result};
use crate::logging::{self, Priority};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Lowest priority libinput should report
    ///
    /// The bridge itself never filters; `apply` hands this back for the host
    /// to pass to `libinput_log_set_priority`.
    pub priority: Priority,
    /// Debug-level output from `init_tracing`
    pub verbose: bool,
    /// Register `tracing_callback()` on `apply`
    pub forward_to_tracing: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            priority: Priority::DEBUG,
            verbose: false,
            forward_to_tracing: true,
        }
    }
}

impl Config {
    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: None,
            source: e,
        })
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: Some(path.to_path_buf()),
            source: e,
        })
    }

    /// Load from `path`, falling back to the defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigSerialize { source: e })?;
        fs::write(path, content).map_err(|e| Error::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Initialize tracing and, if enabled, forward messages to it
    ///
    /// Returns the priority to request from libinput.
    pub fn apply(&self, bridge: &Bridge) -> Priority {
        logging::init_tracing(self.log.verbose);
        if self.log.forward_to_tracing {
            bridge.set_callback(Some(logging::tracing_callback()));
        }
        debug!("Log bridge configured, libinput priority {}", self.log.priority);
        self.log.priority
    }
}

// ============================================================================
// Tests
// ============================================================================
