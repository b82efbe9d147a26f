//! Shared fixtures: rules files on disk and a recording observer.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use spamguard_core::error::SpamError;
use spamguard_core::rules::RuleCounts;
use spamguard_core::verdict::Verdict;
use spamguard_gateway::config::PolicyConfig;
use spamguard_gateway::policy::{PolicyObserver, SpamPolicy};
use tempfile::TempDir;

pub const RULES: &str = r#"
blocked_messages_by_homeserver:
  - evil.org
blocked_messages_by_user:
  - "@spammer:example.org"
blocked_messages_by_user_pattern:
  - "^@bot[0-9]+:"
blocked_messages_by_content:
  - "BUY NOW"
blocked_messages_by_content_pattern:
  - "(?i)free\\s+crypto"
blocked_invites_by_homeserver:
  - invites.bad
"#;

pub struct RulesDir {
    pub dir: TempDir,
}

impl RulesDir {
    pub fn new(rules: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rules.yaml"), rules).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("rules.yaml")
    }

    /// Replace the rules file atomically so a concurrent reload never reads a half-written file.
    pub fn write(&self, rules: &str) {
        let tmp = self.dir.path().join(".rules.yaml.tmp");
        fs::write(&tmp, rules).unwrap();
        fs::rename(&tmp, self.path()).unwrap();
    }

    pub fn config(&self) -> PolicyConfig {
        PolicyConfig::new(self.path())
    }

    pub fn policy(&self) -> SpamPolicy {
        SpamPolicy::new(&self.config()).unwrap()
    }
}

#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<Verdict>>,
    pub reloads: Mutex<Vec<RuleCounts>>,
    pub failures: Mutex<Vec<String>>,
    pub invites_denied: Mutex<Vec<String>>,
    pub soft_fails: Mutex<Vec<(Option<String>, String)>>,
}

impl PolicyObserver for Recorder {
    fn on_event(&self, _event_id: Option<&str>, _sender: &str, verdict: Verdict) {
        self.events.lock().unwrap().push(verdict);
    }

    fn on_soft_fail(&self, event_id: Option<&str>, _sender: &str, homeserver: &str) {
        self.soft_fails
            .lock()
            .unwrap()
            .push((event_id.map(str::to_string), homeserver.to_string()));
    }

    fn on_invite_denied(&self, inviter: &str, _room_id: &str, _homeserver: &str) {
        self.invites_denied.lock().unwrap().push(inviter.to_string());
    }

    fn on_reload(&self, _rules_file: &Path, counts: &RuleCounts) {
        self.reloads.lock().unwrap().push(*counts);
    }

    fn on_reload_failed(&self, _rules_file: &Path, err: &SpamError) {
        self.failures.lock().unwrap().push(err.code().as_str().to_string());
    }
}

pub fn recorder() -> Arc<Recorder> {
    Arc::new(Recorder::default())
}
