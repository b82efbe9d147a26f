//! Policy layer (spam verdicts, invite checks, live reload).
//!
//! Holds the installed rule set behind a swappable pointer and exposes the
//! host decision contract on top of it.

pub mod engine;
pub mod observer;

pub use engine::SpamPolicy;
pub use observer::{NoopObserver, PolicyObserver, TracingObserver};
