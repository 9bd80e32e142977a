// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compatibility gate for the external container runtime.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. service-manager version (before the runtime is contacted at all)
//! 2. runtime binary version against the minimum
//! 3. runtime binary version against the recommendation (advisory only)
//! 4. image-spec version
//! 5. runtime API version
//!
//! Versions are committed to the shared state only when every check passes.

pub mod error;
pub mod state;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::provider::{InfoProvider, ServiceManagerProvider};
use crate::version::SemanticVersion;

pub use error::{CompatibilityError, Component, GateError};
pub use state::{LastCheck, RuntimeCompatibilityState, SharedCompatibilityState, VerifiedVersions};

/// Minimum (and recommended) versions the runtime must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRequirements {
    pub min_binary: String,
    pub recommended_binary: String,
    pub min_spec: String,
    pub min_api: String,
    pub min_service_manager: String,
}

impl Default for VersionRequirements {
    fn default() -> Self {
        Self {
            min_binary: "0.13.0".to_string(),
            recommended_binary: "0.13.0".to_string(),
            min_spec: "0.7.4".to_string(),
            min_api: "1.0.0-alpha".to_string(),
            min_service_manager: "219".to_string(),
        }
    }
}

/// Which way the running binary deviates from the recommended one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Older,
    Newer,
}

/// The runtime binary differs from the version it was tested against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryMismatch {
    pub actual: String,
    pub recommended: String,
    pub direction: Deviation,
}

/// Successful check: the committed versions and any advisory raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub versions: VerifiedVersions,
    pub advisory: Option<AdvisoryMismatch>,
}

/// Point-in-time admission check against the runtime and the host.
pub struct CompatibilityGate<I, S> {
    info: I,
    service_manager: S,
    state: Arc<SharedCompatibilityState>,
    check_lock: Mutex<()>,
}

impl<I, S> CompatibilityGate<I, S>
where
    I: InfoProvider,
    S: ServiceManagerProvider,
{
    pub fn new(info: I, service_manager: S) -> Self {
        Self::with_state(info, service_manager, Arc::new(SharedCompatibilityState::new()))
    }

    /// Build a gate that commits into an existing state handle.
    pub fn with_state(info: I, service_manager: S, state: Arc<SharedCompatibilityState>) -> Self {
        Self {
            info,
            service_manager,
            state,
            check_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> &Arc<SharedCompatibilityState> {
        &self.state
    }

    /// Verify every component meets its minimum and commit the versions.
    ///
    /// Concurrent calls are serialized; a failed run leaves previously
    /// committed versions untouched.
    pub async fn check_version(
        &self,
        req: &VersionRequirements,
    ) -> Result<CheckOutcome, GateError> {
        let _guard = self.check_lock.lock().await;

        match self.run_checks(req).await {
            Ok(outcome) => {
                self.state
                    .commit(outcome.versions.clone(), outcome.advisory.is_some());
                tracing::info!(
                    binary = %outcome.versions.binary,
                    spec = %outcome.versions.spec,
                    api = %outcome.versions.api,
                    service_manager = %outcome.versions.service_manager,
                    "runtime version check passed"
                );
                Ok(outcome)
            }
            Err(e) => {
                let last = match &e {
                    GateError::Incompatible(c) => LastCheck::Incompatible(c.component()),
                    GateError::Parse(_) | GateError::Transport(_) => LastCheck::Unavailable,
                };
                self.state.record_failure(last);
                Err(e)
            }
        }
    }

    async fn run_checks(&self, req: &VersionRequirements) -> Result<CheckOutcome, GateError> {
        let sm_raw = self.service_manager.version().await?;
        let service_manager = SemanticVersion::parse_lenient(&sm_raw)?;
        if service_manager.compare(&req.min_service_manager)? < 0 {
            return Err(CompatibilityError::ServiceManagerTooOld {
                actual: sm_raw,
                required: req.min_service_manager.clone(),
            }
            .into());
        }
        tracing::debug!(version = %service_manager, "service manager version ok");

        let info = self.info.get_info().await?;

        let binary = SemanticVersion::parse(&info.binary_version)?;
        if binary.compare(&req.min_binary)? < 0 {
            return Err(CompatibilityError::BinaryTooOld {
                actual: info.binary_version,
                required: req.min_binary.clone(),
            }
            .into());
        }

        let advisory = match binary.compare(&req.recommended_binary)? {
            0 => None,
            r => Some(AdvisoryMismatch {
                actual: info.binary_version.clone(),
                recommended: req.recommended_binary.clone(),
                direction: if r < 0 {
                    Deviation::Older
                } else {
                    Deviation::Newer
                },
            }),
        };
        if let Some(a) = &advisory {
            tracing::warn!(
                "runtime: current binary version {:?} is not recommended (recommended version {:?})",
                a.actual,
                a.recommended
            );
        }

        let spec = SemanticVersion::parse(&info.spec_version)?;
        if spec.compare(&req.min_spec)? < 0 {
            return Err(CompatibilityError::SpecTooOld {
                actual: info.spec_version,
                required: req.min_spec.clone(),
            }
            .into());
        }

        let api = SemanticVersion::parse(&info.api_version)?;
        if api.compare(&req.min_api)? < 0 {
            return Err(CompatibilityError::ApiTooOld {
                actual: info.api_version,
                required: req.min_api.clone(),
            }
            .into());
        }

        Ok(CheckOutcome {
            versions: VerifiedVersions {
                binary,
                spec,
                api,
                service_manager,
            },
            advisory,
        })
    }
}
