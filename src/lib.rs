// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime Gate
//!
//! Admission check run before an orchestrator hands container lifecycle
//! operations to an external low-level container runtime. The runtime binary,
//! its API service, its image-spec version, and the host service manager must
//! all meet minimum versions before the integration is used.
//!
//! # Layout
//!
//! - [`version`]: semantic version parsing and three-way comparison
//! - [`provider`]: collaborator traits for the runtime info and service-manager queries
//! - [`gate`]: the ordered, fail-fast check and the shared state it commits to
//! - [`health`]: readiness derived from the last check
//! - [`recheck`]: periodic re-validation
//! - [`config`], [`telemetry`]: ambient configuration and logging
//!
//! The gate performs a single point-in-time check. It does not retry, cache
//! across restarts, or negotiate protocol versions.

pub mod config;
pub mod gate;
pub mod health;
pub mod provider;
pub mod recheck;
pub mod telemetry;
pub mod version;

use std::sync::Arc;

pub use config::{ConfigError, GateConfig};
pub use gate::{
    AdvisoryMismatch, CheckOutcome, CompatibilityError, CompatibilityGate, Component, Deviation,
    GateError, RuntimeCompatibilityState, SharedCompatibilityState, VersionRequirements,
};
pub use health::{HealthChecker, HealthReport, HealthState};
pub use provider::{InfoProvider, RuntimeInfo, ServiceManagerProvider, TransportError};
pub use recheck::PeriodicCheck;
pub use version::{compare_versions, ParseMode, SemanticVersion, VersionError};

/// Integration with the external runtime.
///
/// Owns the compatibility gate alongside the configuration it checks against.
/// The version state lives in its own [`SharedCompatibilityState`] handle,
/// mutated only by the gate.
pub struct RuntimeIntegration<I, S> {
    config: GateConfig,
    gate: Arc<CompatibilityGate<I, S>>,
    health: HealthChecker,
}

impl<I, S> RuntimeIntegration<I, S>
where
    I: InfoProvider + 'static,
    S: ServiceManagerProvider + 'static,
{
    /// Create an integration after validating the configured thresholds.
    pub fn new(config: GateConfig, info: I, service_manager: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            gate: Arc::new(CompatibilityGate::new(info, service_manager)),
            health: HealthChecker::new(),
        })
    }

    /// Run the version check against the configured requirements.
    pub async fn check_version(&self) -> Result<CheckOutcome, GateError> {
        self.gate.check_version(&self.config.requirements).await
    }

    /// Start periodic re-validation at the configured interval.
    pub fn spawn_recheck(&self) -> PeriodicCheck {
        PeriodicCheck::spawn(
            self.gate.clone(),
            self.config.requirements.clone(),
            self.config.recheck_interval,
        )
    }

    /// Committed runtime binary version, once verified.
    pub fn version(&self) -> Option<SemanticVersion> {
        self.gate.state().version()
    }

    /// Committed runtime API version, once verified.
    pub fn api_version(&self) -> Option<SemanticVersion> {
        self.gate.state().api_version()
    }

    pub fn state(&self) -> &Arc<SharedCompatibilityState> {
        self.gate.state()
    }

    pub fn is_ready(&self) -> bool {
        self.health.is_ready(self.gate.state())
    }

    pub fn health_report(&self) -> HealthReport {
        self.health.report(self.gate.state())
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
