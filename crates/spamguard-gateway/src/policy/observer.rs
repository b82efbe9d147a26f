//! Injected observability sink for the policy engine.
//!
//! `SpamPolicy` never logs through global state of its own; it reports to a
//! `PolicyObserver` handed in at construction. All hooks default to no-ops.

use std::path::Path;

use spamguard_core::error::SpamError;
use spamguard_core::rules::RuleCounts;
use spamguard_core::verdict::Verdict;

pub trait PolicyObserver: Send + Sync {
    /// Called once per evaluated event, spam or not.
    fn on_event(&self, _event_id: Option<&str>, _sender: &str, _verdict: Verdict) {}

    /// The event was annotated as soft-failed because `homeserver` is blocked.
    fn on_soft_fail(&self, _event_id: Option<&str>, _sender: &str, _homeserver: &str) {}

    fn on_invite_denied(&self, _inviter: &str, _room_id: &str, _homeserver: &str) {}

    /// A new rule set was installed (initial load included).
    fn on_reload(&self, _rules_file: &Path, _counts: &RuleCounts) {}

    /// A reload failed; the previous rule set is still active.
    fn on_reload_failed(&self, _rules_file: &Path, _err: &SpamError) {}
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl PolicyObserver for NoopObserver {}

/// Structured logs via `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PolicyObserver for TracingObserver {
    fn on_event(&self, event_id: Option<&str>, sender: &str, verdict: Verdict) {
        let Verdict::Spam(rule) = verdict else {
            return;
        };
        let event_id = event_id.unwrap_or("-");
        tracing::debug!(%event_id, %sender, rule = rule.as_str(), "event rejected as spam");
    }

    fn on_soft_fail(&self, event_id: Option<&str>, sender: &str, homeserver: &str) {
        let event_id = event_id.unwrap_or("-");
        tracing::info!(
            %event_id,
            %sender,
            %homeserver,
            "soft-failing event from blocked homeserver"
        );
    }

    fn on_invite_denied(&self, inviter: &str, room_id: &str, homeserver: &str) {
        tracing::debug!(%inviter, %room_id, %homeserver, "invite denied");
    }

    fn on_reload(&self, rules_file: &Path, counts: &RuleCounts) {
        tracing::info!(
            path = %rules_file.display(),
            sender_homeservers = counts.sender_homeservers,
            senders = counts.senders,
            sender_patterns = counts.sender_patterns,
            bodies = counts.bodies,
            body_patterns = counts.body_patterns,
            invite_homeservers = counts.invite_homeservers,
            "spam rules loaded"
        );
    }

    fn on_reload_failed(&self, rules_file: &Path, err: &SpamError) {
        tracing::warn!(
            path = %rules_file.display(),
            error = %err,
            code = err.code().as_str(),
            "spam rules reload failed, keeping previous rules"
        );
    }
}
