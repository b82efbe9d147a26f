//! Top-level facade crate for spamguard.
//!
//! Re-exports the rule primitives and the policy/gateway library so hosts can
//! depend on a single crate.

pub mod core {
    pub use spamguard_core::*;
}

pub mod gateway {
    pub use spamguard_gateway::*;
}
