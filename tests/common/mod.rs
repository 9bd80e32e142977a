//! Fake collaborators shared by integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use runtime_gate::{
    CompatibilityGate, InfoProvider, RuntimeInfo, ServiceManagerProvider, TransportError,
    VersionRequirements,
};

/// Counts overlapping calls and keeps the highest overlap seen.
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
    delay: Mutex<Duration>,
}

impl InFlight {
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Info provider returning a scripted response and counting calls.
pub struct FakeInfo {
    response: Mutex<Result<RuntimeInfo, TransportError>>,
    calls: AtomicUsize,
    pub in_flight: InFlight,
}

impl FakeInfo {
    pub fn new(binary: &str, spec: &str, api: &str) -> Self {
        Self {
            response: Mutex::new(Ok(RuntimeInfo {
                binary_version: binary.to_string(),
                spec_version: spec.to_string(),
                api_version: api.to_string(),
            })),
            calls: AtomicUsize::new(0),
            in_flight: InFlight::default(),
        }
    }

    pub fn set(&self, response: Result<RuntimeInfo, TransportError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InfoProvider for FakeInfo {
    async fn get_info(&self) -> Result<RuntimeInfo, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter().await;
        self.response.lock().unwrap().clone()
    }
}

/// Service-manager provider returning a scripted version.
pub struct FakeServiceManager {
    response: Mutex<Result<String, TransportError>>,
    calls: AtomicUsize,
    pub in_flight: InFlight,
}

impl FakeServiceManager {
    pub fn new(version: &str) -> Self {
        Self {
            response: Mutex::new(Ok(version.to_string())),
            calls: AtomicUsize::new(0),
            in_flight: InFlight::default(),
        }
    }

    pub fn set(&self, response: Result<String, TransportError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceManagerProvider for FakeServiceManager {
    async fn version(&self) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter().await;
        self.response.lock().unwrap().clone()
    }
}

pub type FakeGate = CompatibilityGate<Arc<FakeInfo>, Arc<FakeServiceManager>>;

/// binary="1.2.3+git", spec="1.2.4+git", api="1.2.6-alpha", service manager="100".
pub fn reference_gate() -> (FakeGate, Arc<FakeInfo>, Arc<FakeServiceManager>) {
    let info = Arc::new(FakeInfo::new("1.2.3+git", "1.2.4+git", "1.2.6-alpha"));
    let sm = Arc::new(FakeServiceManager::new("100"));
    (CompatibilityGate::new(info.clone(), sm.clone()), info, sm)
}

/// Requirements exactly matching the reference versions.
pub fn exact_requirements() -> VersionRequirements {
    VersionRequirements {
        min_binary: "1.2.3+git".to_string(),
        recommended_binary: "1.2.3+git".to_string(),
        min_spec: "1.2.4+git".to_string(),
        min_api: "1.2.6-alpha".to_string(),
        min_service_manager: "100".to_string(),
    }
}
