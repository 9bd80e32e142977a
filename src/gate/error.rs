// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the compatibility gate.

use thiserror::Error;

use crate::provider::TransportError;
use crate::version::VersionError;

/// A queried version is strictly below the required minimum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatibilityError {
    #[error("runtime: service manager version({actual}) is too old, requires at least {required}")]
    ServiceManagerTooOld { actual: String, required: String },

    #[error("runtime: binary version is too old({actual}), requires at least {required}")]
    BinaryTooOld { actual: String, required: String },

    #[error("runtime: image spec version is too old({actual}), requires at least {required}")]
    SpecTooOld { actual: String, required: String },

    #[error("runtime: API version is too old({actual}), requires at least {required}")]
    ApiTooOld { actual: String, required: String },
}

impl CompatibilityError {
    /// The component whose version failed the check.
    pub fn component(&self) -> Component {
        match self {
            Self::ServiceManagerTooOld { .. } => Component::ServiceManager,
            Self::BinaryTooOld { .. } => Component::Binary,
            Self::SpecTooOld { .. } => Component::Spec,
            Self::ApiTooOld { .. } => Component::Api,
        }
    }

    pub fn actual(&self) -> &str {
        match self {
            Self::ServiceManagerTooOld { actual, .. }
            | Self::BinaryTooOld { actual, .. }
            | Self::SpecTooOld { actual, .. }
            | Self::ApiTooOld { actual, .. } => actual,
        }
    }

    pub fn required(&self) -> &str {
        match self {
            Self::ServiceManagerTooOld { required, .. }
            | Self::BinaryTooOld { required, .. }
            | Self::SpecTooOld { required, .. }
            | Self::ApiTooOld { required, .. } => required,
        }
    }
}

/// Components checked by the gate, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    ServiceManager,
    Binary,
    Spec,
    Api,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceManager => "service_manager",
            Self::Binary => "binary",
            Self::Spec => "spec",
            Self::Api => "api",
        }
    }
}

/// Everything `check_version` can fail with.
///
/// `Parse` and `Transport` mean the check could not be performed;
/// `Incompatible` means it was performed and a requirement was unmet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Parse(#[from] VersionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Incompatible(#[from] CompatibilityError),
}

impl GateError {
    /// True when requirements were checked and found unmet.
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::Incompatible(_))
    }

    pub fn as_compatibility(&self) -> Option<&CompatibilityError> {
        match self {
            Self::Incompatible(e) => Some(e),
            _ => None,
        }
    }
}
