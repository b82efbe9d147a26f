use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use spamguard_core::error::Result;
use spamguard_core::event::EventFields;
use spamguard_core::rules::RuleSet;
use spamguard_core::verdict::{MatchedRule, Verdict};

use crate::config::{self, PolicyConfig};

use super::observer::{PolicyObserver, TracingObserver};

/// Spam policy runtime.
/// Construct once at startup, then share via Arc.
///
/// Decisions read the installed [`RuleSet`] through a single `Arc` clone;
/// reloads compile a new set off to the side and swap the pointer, so a
/// decision sees either the old rules or the new ones, never a mix.
pub struct SpamPolicy {
    rules_file: PathBuf,
    current: RwLock<Arc<RuleSet>>,
    // Serializes reloads so a slow read cannot install stale rules over a newer one.
    reload_gate: Mutex<()>,
    observer: Arc<dyn PolicyObserver>,
}

impl SpamPolicy {
    /// Load the rules file and build the policy. Fails closed: no policy
    /// without an initial rule set.
    pub fn new(cfg: &PolicyConfig) -> Result<Self> {
        Self::with_observer(cfg, Arc::new(TracingObserver))
    }

    pub fn with_observer(cfg: &PolicyConfig, observer: Arc<dyn PolicyObserver>) -> Result<Self> {
        let rules = config::load_rules_file(&cfg.rules_file)?;
        observer.on_reload(&cfg.rules_file, &rules.counts());

        Ok(Self {
            rules_file: cfg.rules_file.clone(),
            current: RwLock::new(Arc::new(rules)),
            reload_gate: Mutex::new(()),
            observer,
        })
    }

    pub fn rules_file(&self) -> &Path {
        &self.rules_file
    }

    /// Currently installed rule set.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        // The slot only ever holds a complete Arc, so a poisoned lock still has a valid value.
        let g = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*g)
    }

    fn install(&self, rules: RuleSet) {
        let next = Arc::new(rules);
        let mut g = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *g = next;
    }

    /// Re-read the rules file and swap in the result.
    /// On error the previous rules stay active and the error is returned.
    pub fn reload(&self) -> Result<()> {
        let _gate = self.reload_gate.lock().unwrap_or_else(PoisonError::into_inner);

        match config::load_rules_file(&self.rules_file) {
            Ok(rules) => {
                let counts = rules.counts();
                self.install(rules);
                self.observer.on_reload(&self.rules_file, &counts);
                Ok(())
            }
            Err(e) => {
                self.observer.on_reload_failed(&self.rules_file, &e);
                Err(e)
            }
        }
    }

    /// Evaluate an event without touching it. First matching category wins:
    /// sender homeserver, sender, sender pattern, body, body pattern.
    pub fn check_event<E: EventFields + ?Sized>(&self, event: &E) -> Verdict {
        let rules = self.snapshot();
        self.decide(&rules, event).0
    }

    /// Evaluate an event and apply the soft-fail annotation when a homeserver
    /// block fired.
    pub fn evaluate<E: EventFields + ?Sized>(&self, event: &mut E) -> Verdict {
        let rules = self.snapshot();
        let (verdict, blocked_hs) = self.decide(&rules, &*event);
        if let Some(hs) = blocked_hs {
            event.mark_soft_failed();
            self.observer.on_soft_fail(event.event_id(), event.sender(), hs);
        }
        verdict
    }

    fn decide<'r, E: EventFields + ?Sized>(
        &self,
        rules: &'r RuleSet,
        event: &E,
    ) -> (Verdict, Option<&'r str>) {
        let (verdict, blocked_hs) =
            first_matching_rule(rules, event.sender(), event.body().unwrap_or(""));
        self.observer.on_event(event.event_id(), event.sender(), verdict);
        (verdict, blocked_hs)
    }

    /// `true` = spam (reject). Homeserver blocks also soft-fail the event.
    pub fn check_event_for_spam<E: EventFields + ?Sized>(&self, event: &mut E) -> bool {
        self.evaluate(event).is_spam()
    }

    /// `false` iff the inviter's homeserver is blocked for invites.
    /// `invitee` and `room_id` are part of the host contract but not consulted.
    pub fn user_may_invite(&self, inviter: &str, _invitee: &str, room_id: &str) -> bool {
        let rules = self.snapshot();
        match rules.invite_homeserver_match(inviter) {
            Some(hs) => {
                self.observer.on_invite_denied(inviter, room_id, hs);
                false
            }
            None => true,
        }
    }

    /// Always allowed; no room-creation rules exist yet.
    pub fn user_may_create_room(&self, _user_id: &str) -> bool {
        true
    }

    /// Always allowed; no alias rules exist yet.
    pub fn user_may_create_room_alias(&self, _user_id: &str, _alias: &str) -> bool {
        true
    }

    /// Always allowed; no directory-publish rules exist yet.
    pub fn user_may_publish_room(&self, _user_id: &str, _room_id: &str) -> bool {
        true
    }
}

/// Verdict plus the blocked homeserver when that rule fired.
fn first_matching_rule<'r>(
    rules: &'r RuleSet,
    sender: &str,
    body: &str,
) -> (Verdict, Option<&'r str>) {
    if let Some(hs) = rules.sender_homeserver_match(sender) {
        return (Verdict::Spam(MatchedRule::SenderHomeserver), Some(hs));
    }
    let verdict = if rules.is_blocked_sender(sender) {
        Verdict::Spam(MatchedRule::Sender)
    } else if rules.sender_pattern_match(sender).is_some() {
        Verdict::Spam(MatchedRule::SenderPattern)
    } else if rules.is_blocked_body(body) {
        Verdict::Spam(MatchedRule::Body)
    } else if rules.body_pattern_match(body).is_some() {
        Verdict::Spam(MatchedRule::BodyPattern)
    } else {
        Verdict::NotSpam
    };
    (verdict, None)
}
