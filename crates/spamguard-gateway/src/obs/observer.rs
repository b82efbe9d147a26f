//! Observer that feeds [`PolicyMetrics`] and forwards to an inner observer.

use std::path::Path;
use std::sync::Arc;

use spamguard_core::error::SpamError;
use spamguard_core::rules::RuleCounts;
use spamguard_core::verdict::Verdict;

use crate::policy::PolicyObserver;

use super::metrics::PolicyMetrics;

pub struct MetricsObserver {
    metrics: Arc<PolicyMetrics>,
    inner: Arc<dyn PolicyObserver>,
}

impl MetricsObserver {
    pub fn new(metrics: Arc<PolicyMetrics>, inner: Arc<dyn PolicyObserver>) -> Self {
        Self { metrics, inner }
    }
}

impl PolicyObserver for MetricsObserver {
    fn on_event(&self, event_id: Option<&str>, sender: &str, verdict: Verdict) {
        self.metrics.events_checked.inc(&[]);
        if let Some(rule) = verdict.rule() {
            self.metrics.spam.inc(&[("rule", rule.as_str())]);
        }
        self.inner.on_event(event_id, sender, verdict);
    }

    fn on_soft_fail(&self, event_id: Option<&str>, sender: &str, homeserver: &str) {
        self.metrics.soft_failed.inc(&[]);
        self.inner.on_soft_fail(event_id, sender, homeserver);
    }

    fn on_invite_denied(&self, inviter: &str, room_id: &str, homeserver: &str) {
        self.metrics.invites_denied.inc(&[]);
        self.inner.on_invite_denied(inviter, room_id, homeserver);
    }

    fn on_reload(&self, rules_file: &Path, counts: &RuleCounts) {
        self.metrics.reloads.inc(&[("result", "ok")]);
        for (category, n) in counts.by_category() {
            self.metrics.rules.set(&[("category", category)], n as i64);
        }
        self.inner.on_reload(rules_file, counts);
    }

    fn on_reload_failed(&self, rules_file: &Path, err: &SpamError) {
        self.metrics
            .reloads
            .inc(&[("result", "error"), ("code", err.code().as_str())]);
        self.inner.on_reload_failed(rules_file, err);
    }
}
