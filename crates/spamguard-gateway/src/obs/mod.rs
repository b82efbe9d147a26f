//! Lightweight in-process metrics (dependency-free).
//!
//! Policy counters are stored as atomics, fed by [`MetricsObserver`], and
//! rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;
pub mod observer;

pub use metrics::PolicyMetrics;
pub use observer::MetricsObserver;
