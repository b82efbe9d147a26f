//! Shared application state for the spamguard gateway.
//!
//! Builds the policy runtime once at startup (failing closed if the initial
//! rules cannot be loaded) and wires its observer into the metrics registry.

use std::sync::Arc;

use spamguard_core::error::Result;

use crate::config::GatewayConfig;
use crate::obs::{MetricsObserver, PolicyMetrics};
use crate::policy::{PolicyObserver, SpamPolicy, TracingObserver};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    policy: Arc<SpamPolicy>,
    metrics: Arc<PolicyMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can report a bad rules file instead of panicking.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let metrics = Arc::new(PolicyMetrics::default());
        let observer: Arc<dyn PolicyObserver> = Arc::new(MetricsObserver::new(
            Arc::clone(&metrics),
            Arc::new(TracingObserver),
        ));
        let policy = Arc::new(SpamPolicy::with_observer(&cfg.policy, observer)?);

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, policy, metrics }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn policy(&self) -> Arc<SpamPolicy> {
        Arc::clone(&self.inner.policy)
    }

    pub fn metrics(&self) -> &PolicyMetrics {
        &self.inner.metrics
    }
}
