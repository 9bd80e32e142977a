// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Health reporting derived from the compatibility state.
//!
//! Lets an orchestrator gate readiness on the last runtime version check.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gate::{LastCheck, SharedCompatibilityState};

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Detailed health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub state: HealthState,
    pub ready: bool,
    pub binary_version: Option<String>,
    pub api_version: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub failed_component: Option<String>,
    pub checks_total: u64,
    pub failures_total: u64,
    pub uptime_secs: u64,
}

impl HealthReport {
    /// Render as JSON for probes and status output.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Aggregates health information from the compatibility state.
pub struct HealthChecker {
    start_time: Instant,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Ready: versions have been committed and the last check did not find
    /// an incompatibility.
    pub fn is_ready(&self, state: &SharedCompatibilityState) -> bool {
        state.is_verified() && !matches!(state.last_check(), LastCheck::Incompatible(_))
    }

    /// Generate full health report.
    pub fn report(&self, state: &SharedCompatibilityState) -> HealthReport {
        let last = state.last_check();
        let snapshot = state.snapshot();

        HealthReport {
            state: compute_state(state.is_verified(), last),
            ready: self.is_ready(state),
            binary_version: snapshot.binary_version().map(ToString::to_string),
            api_version: snapshot.api_version().map(ToString::to_string),
            verified_at: state.verified_at(),
            failed_component: match last {
                LastCheck::Incompatible(c) => Some(c.as_str().to_string()),
                _ => None,
            },
            checks_total: state.checks_total(),
            failures_total: state.failures_total(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

fn compute_state(verified: bool, last: LastCheck) -> HealthState {
    match last {
        LastCheck::Never | LastCheck::Incompatible(_) => HealthState::Unhealthy,
        LastCheck::Passed { advisory: false } => HealthState::Healthy,
        LastCheck::Passed { advisory: true } => HealthState::Degraded,
        LastCheck::Unavailable if verified => HealthState::Degraded,
        LastCheck::Unavailable => HealthState::Unhealthy,
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}
