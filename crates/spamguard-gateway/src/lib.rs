//! spamguard gateway library entry.
//!
//! This crate loads rules files, runs the spam policy with live reload, and
//! exposes it over HTTP together with health and metrics endpoints. It is
//! intended to be consumed by the binary (`main.rs`), by hosts embedding
//! [`policy::SpamPolicy`] directly, and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod reload;
pub mod router;
