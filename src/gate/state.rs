// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared record of the last verified runtime versions.
//!
//! All four versions are replaced together under one write lock. Only the
//! gate commits; everyone else reads snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::error::Component;
use crate::version::SemanticVersion;

/// Versions that passed every check in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedVersions {
    pub binary: SemanticVersion,
    pub spec: SemanticVersion,
    pub api: SemanticVersion,
    pub service_manager: SemanticVersion,
}

/// Last committed versions; every field is unset until the first success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeCompatibilityState {
    binary_version: Option<SemanticVersion>,
    spec_version: Option<SemanticVersion>,
    api_version: Option<SemanticVersion>,
    service_manager_version: Option<SemanticVersion>,
}

impl RuntimeCompatibilityState {
    pub fn binary_version(&self) -> Option<&SemanticVersion> {
        self.binary_version.as_ref()
    }

    pub fn spec_version(&self) -> Option<&SemanticVersion> {
        self.spec_version.as_ref()
    }

    pub fn api_version(&self) -> Option<&SemanticVersion> {
        self.api_version.as_ref()
    }

    pub fn service_manager_version(&self) -> Option<&SemanticVersion> {
        self.service_manager_version.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.binary_version.is_some()
    }
}

impl From<VerifiedVersions> for RuntimeCompatibilityState {
    fn from(v: VerifiedVersions) -> Self {
        Self {
            binary_version: Some(v.binary),
            spec_version: Some(v.spec),
            api_version: Some(v.api),
            service_manager_version: Some(v.service_manager),
        }
    }
}

/// Result of the most recent check, kept for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastCheck {
    #[default]
    Never,
    Passed { advisory: bool },
    Incompatible(Component),
    /// Transport or parse failure; the check could not be performed.
    Unavailable,
}

#[derive(Debug, Default)]
struct Inner {
    versions: RuntimeCompatibilityState,
    verified_at: Option<DateTime<Utc>>,
    last_check: LastCheck,
}

/// Thread-safe holder for [`RuntimeCompatibilityState`].
#[derive(Debug, Default)]
pub struct SharedCompatibilityState {
    inner: RwLock<Inner>,
    checks_total: AtomicU64,
    failures_total: AtomicU64,
}

impl SharedCompatibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent copy of all four versions.
    pub fn snapshot(&self) -> RuntimeCompatibilityState {
        self.inner.read().versions.clone()
    }

    /// Committed runtime binary version.
    pub fn version(&self) -> Option<SemanticVersion> {
        self.inner.read().versions.binary_version.clone()
    }

    /// Committed runtime API version.
    pub fn api_version(&self) -> Option<SemanticVersion> {
        self.inner.read().versions.api_version.clone()
    }

    pub fn is_verified(&self) -> bool {
        self.inner.read().versions.is_set()
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().verified_at
    }

    pub fn last_check(&self) -> LastCheck {
        self.inner.read().last_check
    }

    pub fn checks_total(&self) -> u64 {
        self.checks_total.load(Ordering::Relaxed)
    }

    pub fn failures_total(&self) -> u64 {
        self.failures_total.load(Ordering::Relaxed)
    }

    pub(crate) fn commit(&self, versions: VerifiedVersions, advisory: bool) {
        let mut inner = self.inner.write();
        inner.versions = versions.into();
        inner.verified_at = Some(Utc::now());
        inner.last_check = LastCheck::Passed { advisory };
        drop(inner);
        self.checks_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed run. Committed versions are left untouched.
    pub(crate) fn record_failure(&self, outcome: LastCheck) {
        self.inner.write().last_check = outcome;
        self.checks_total.fetch_add(1, Ordering::Relaxed);
        self.failures_total.fetch_add(1, Ordering::Relaxed);
    }
}
