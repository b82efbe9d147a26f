//! spamguard core: block rules, event accessors, verdicts, and the error type.
//!
//! This crate holds the immutable [`rules::RuleSet`] snapshot and the narrow
//! [`event::EventFields`] capability the policy engine reads events through.
//! It intentionally carries no I/O or runtime dependencies so rule sets can be
//! compiled and matched in any host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A bad rules document or a hostile event surfaces as `SpamError`/`Result`
//! or as a plain "no match", never as a crash in the host.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod event;
pub mod rules;
pub mod verdict;

/// Shared result type.
pub use error::{ErrorCode, Result, SpamError};
pub use event::{EventFields, Invite, MessageEvent};
pub use rules::{RuleCounts, RuleSet, RulesDocument};
pub use verdict::{MatchedRule, Verdict};
