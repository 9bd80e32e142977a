// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Collaborator contracts consumed by the compatibility gate.
//!
//! Transports (API service client, service-manager bus) live outside this
//! crate; they only need to hand back raw version strings.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version strings reported by the runtime's API service.
///
/// Example: `binary_version: "0.10.0+gitb7349b1"`, `spec_version: "0.7.1"`,
/// `api_version: "1.0.0-alpha"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub binary_version: String,
    pub spec_version: String,
    pub api_version: String,
}

/// A collaborator call could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of runtime binary, image-spec, and API versions.
#[async_trait]
pub trait InfoProvider: Send + Sync {
    async fn get_info(&self) -> Result<RuntimeInfo, TransportError>;
}

/// Source of the host service-manager (init system) version.
#[async_trait]
pub trait ServiceManagerProvider: Send + Sync {
    async fn version(&self) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: InfoProvider + ?Sized> InfoProvider for Arc<T> {
    async fn get_info(&self) -> Result<RuntimeInfo, TransportError> {
        (**self).get_info().await
    }
}

#[async_trait]
impl<T: ServiceManagerProvider + ?Sized> ServiceManagerProvider for Arc<T> {
    async fn version(&self) -> Result<String, TransportError> {
        (**self).version().await
    }
}
