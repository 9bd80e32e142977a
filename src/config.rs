// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gate configuration from environment variables or a TOML file.
//!
//! Missing or empty values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `RUNTIME_GATE_MIN_BINARY_VERSION` | 0.13.0 | Minimum runtime binary version |
//! | `RUNTIME_GATE_RECOMMENDED_BINARY_VERSION` | 0.13.0 | Tested-against binary version |
//! | `RUNTIME_GATE_MIN_SPEC_VERSION` | 0.7.4 | Minimum image-spec version |
//! | `RUNTIME_GATE_MIN_API_VERSION` | 1.0.0-alpha | Minimum runtime API version |
//! | `RUNTIME_GATE_MIN_SERVICE_MANAGER_VERSION` | 219 | Minimum service-manager version |
//! | `RUNTIME_GATE_RECHECK_INTERVAL` | 60 | Periodic re-check interval (secs) |

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::gate::VersionRequirements;
use crate::version::SemanticVersion;

const DEFAULT_RECHECK_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid version for {key}: {value:?}")]
    InvalidVersion { key: &'static str, value: String },
}

/// Effective gate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub requirements: VersionRequirements,
    pub recheck_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            requirements: VersionRequirements::default(),
            recheck_interval: Duration::from_secs(DEFAULT_RECHECK_SECS),
        }
    }
}

impl GateConfig {
    /// Check every threshold parses before the gate runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.requirements;
        let strict = [
            ("min_binary", &r.min_binary),
            ("recommended_binary", &r.recommended_binary),
            ("min_spec", &r.min_spec),
            ("min_api", &r.min_api),
        ];
        for (key, value) in strict {
            SemanticVersion::parse(value).map_err(|_| ConfigError::InvalidVersion {
                key,
                value: value.clone(),
            })?;
        }
        SemanticVersion::parse_lenient(&r.min_service_manager).map_err(|_| {
            ConfigError::InvalidVersion {
                key: "min_service_manager",
                value: r.min_service_manager.clone(),
            }
        })?;
        Ok(())
    }
}

fn env_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
        _ => default.to_string(),
    }
}

fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load configuration from environment variables.
pub fn load() -> GateConfig {
    let d = VersionRequirements::default();
    let requirements = VersionRequirements {
        min_binary: env_string("RUNTIME_GATE_MIN_BINARY_VERSION", &d.min_binary),
        recommended_binary: env_string(
            "RUNTIME_GATE_RECOMMENDED_BINARY_VERSION",
            &d.recommended_binary,
        ),
        min_spec: env_string("RUNTIME_GATE_MIN_SPEC_VERSION", &d.min_spec),
        min_api: env_string("RUNTIME_GATE_MIN_API_VERSION", &d.min_api),
        min_service_manager: env_string(
            "RUNTIME_GATE_MIN_SERVICE_MANAGER_VERSION",
            &d.min_service_manager,
        ),
    };
    let secs = parse_u64("RUNTIME_GATE_RECHECK_INTERVAL", DEFAULT_RECHECK_SECS).max(1);

    GateConfig {
        requirements,
        recheck_interval: Duration::from_secs(secs),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    requirements: FileRequirements,
    recheck_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRequirements {
    min_binary: Option<String>,
    recommended_binary: Option<String>,
    min_spec: Option<String>,
    min_api: Option<String>,
    min_service_manager: Option<String>,
}

/// Parse configuration from TOML text and validate it.
///
/// ```toml
/// recheck_interval_secs = 30
///
/// [requirements]
/// min_binary = "1.2.0"
/// min_service_manager = "231"
/// ```
pub fn from_toml_str(text: &str) -> Result<GateConfig, ConfigError> {
    let file: FileConfig = toml::from_str(text)?;
    let d = VersionRequirements::default();
    let r = file.requirements;

    let config = GateConfig {
        requirements: VersionRequirements {
            min_binary: r.min_binary.unwrap_or(d.min_binary),
            recommended_binary: r.recommended_binary.unwrap_or(d.recommended_binary),
            min_spec: r.min_spec.unwrap_or(d.min_spec),
            min_api: r.min_api.unwrap_or(d.min_api),
            min_service_manager: r.min_service_manager.unwrap_or(d.min_service_manager),
        },
        recheck_interval: Duration::from_secs(
            file.recheck_interval_secs.unwrap_or(DEFAULT_RECHECK_SECS).max(1),
        ),
    };
    config.validate()?;
    Ok(config)
}

/// Read and parse a TOML config file.
pub fn from_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_toml_str(&text)
}
