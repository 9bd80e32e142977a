// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Periodic re-validation of runtime versions.
//!
//! Each tick runs a full `check_version`. Failures are logged and leave the
//! previously committed versions in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::gate::{CompatibilityGate, GateError, VersionRequirements};
use crate::provider::{InfoProvider, ServiceManagerProvider};

/// Handle to a background re-check loop.
pub struct PeriodicCheck {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicCheck {
    /// Spawn the loop. The first check runs immediately.
    pub fn spawn<I, S>(
        gate: Arc<CompatibilityGate<I, S>>,
        requirements: VersionRequirements,
        interval: Duration,
    ) -> Self
    where
        I: InfoProvider + 'static,
        S: ServiceManagerProvider + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            recheck_loop(&gate, &requirements, interval, token).await;
        });
        Self { shutdown, handle }
    }

    /// Stop the loop and wait for an in-flight check to finish.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("recheck: task ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

async fn recheck_loop<I, S>(
    gate: &CompatibilityGate<I, S>,
    requirements: &VersionRequirements,
    interval: Duration,
    shutdown: CancellationToken,
) where
    I: InfoProvider,
    S: ServiceManagerProvider,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                tracing::info!("recheck: shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                log_result(gate.check_version(requirements).await.map(|o| o.advisory.is_some()));
            }
        }
    }
}

fn log_result(result: Result<bool, GateError>) {
    match result {
        Ok(advisory) => tracing::debug!(advisory, "recheck: runtime versions verified"),
        Err(GateError::Incompatible(e)) => {
            tracing::error!(component = e.component().as_str(), "recheck: {}", e)
        }
        Err(e) => tracing::warn!("recheck: version check could not run: {}", e),
    }
}
