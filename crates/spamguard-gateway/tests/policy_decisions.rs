//! Decision contract: event verdicts, rule order, soft-fail, invite checks.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use serde_json::json;

use spamguard_core::event::{json_is_soft_failed, MessageEvent};
use spamguard_core::verdict::{MatchedRule, Verdict};
use spamguard_gateway::config::PolicyConfig;
use spamguard_gateway::policy::{NoopObserver, SpamPolicy};

use common::{recorder, RulesDir, RULES};

#[test]
fn empty_rules_allow_everything() {
    let rules = RulesDir::new("");
    let policy = rules.policy();

    let mut ev = MessageEvent::new("@anyone:evil.org", Some("BUY NOW"));
    assert!(!policy.check_event_for_spam(&mut ev));
    assert!(!ev.is_soft_failed());

    let mut no_body = json!({ "sender": "@x:y" });
    assert!(!policy.check_event_for_spam(&mut no_body));

    assert!(policy.user_may_invite("@a:invites.bad", "@b:c", "!r:c"));
    assert!(policy.user_may_create_room("@a:b"));
    assert!(policy.user_may_create_room_alias("@a:b", "#x:b"));
    assert!(policy.user_may_publish_room("@a:b", "!r:b"));
}

#[test]
fn homeserver_block_soft_fails() {
    let rules = RulesDir::new(RULES);
    let rec = recorder();
    let policy = SpamPolicy::with_observer(&rules.config(), rec.clone()).unwrap();

    let mut ev = MessageEvent::new("@x:evil.org", Some("hello")).with_event_id("$e1");
    assert!(policy.check_event_for_spam(&mut ev));
    assert!(ev.is_soft_failed());

    let mut ev = json!({ "sender": "@x:evil.org", "content": { "body": "hello" } });
    assert!(policy.check_event_for_spam(&mut ev));
    assert!(json_is_soft_failed(&ev));

    let soft_fails = rec.soft_fails.lock().unwrap();
    assert_eq!(
        *soft_fails,
        vec![
            (Some("$e1".to_string()), "evil.org".to_string()),
            (None, "evil.org".to_string()),
        ]
    );
}

#[test]
fn homeserver_block_needs_colon_boundary() {
    let policy = RulesDir::new(RULES).policy();

    for sender in ["@x:evil.orgy", "@x:notevil.org", "@xevil.org"] {
        let mut ev = MessageEvent::new(sender, Some("hello"));
        assert!(!policy.check_event_for_spam(&mut ev), "{sender} must not match");
        assert!(!ev.is_soft_failed());
    }
}

#[test]
fn exact_sender_block() {
    let policy = RulesDir::new(RULES).policy();

    let mut ev = json!({ "sender": "@spammer:example.org", "content": {} });
    assert!(policy.check_event_for_spam(&mut ev));
    assert!(!json_is_soft_failed(&ev));

    let mut ev = json!({ "sender": "@spammer:example.orgx", "content": {} });
    assert!(!policy.check_event_for_spam(&mut ev));
}

#[test]
fn rule_order_is_preserved() {
    let policy = RulesDir::new(RULES).policy();

    // Matches homeserver and body rules; homeserver wins.
    let ev = MessageEvent::new("@bot1:evil.org", Some("BUY NOW"));
    assert_eq!(policy.check_event(&ev), Verdict::Spam(MatchedRule::SenderHomeserver));

    // Sender pattern only (plus body); sender pattern wins, no soft-fail.
    let mut ev = MessageEvent::new("@bot42:example.org", Some("BUY NOW"));
    assert_eq!(policy.evaluate(&mut ev), Verdict::Spam(MatchedRule::SenderPattern));
    assert!(!ev.is_soft_failed());

    let ev = MessageEvent::new("@spammer:example.org", Some("free crypto"));
    assert_eq!(policy.check_event(&ev), Verdict::Spam(MatchedRule::Sender));

    let ev = MessageEvent::new("@alice:example.org", Some("BUY NOW"));
    assert_eq!(policy.check_event(&ev), Verdict::Spam(MatchedRule::Body));

    let ev = MessageEvent::new("@alice:example.org", Some("get FREE   crypto today"));
    assert_eq!(policy.check_event(&ev), Verdict::Spam(MatchedRule::BodyPattern));

    let ev = MessageEvent::new("@alice:example.org", Some("buy now"));
    assert_eq!(policy.check_event(&ev), Verdict::NotSpam);
}

#[test]
fn check_event_does_not_annotate() {
    let rules = RulesDir::new(RULES);
    let rec = recorder();
    let policy = SpamPolicy::with_observer(&rules.config(), rec.clone()).unwrap();
    let ev = MessageEvent::new("@x:evil.org", None);
    assert!(policy.check_event(&ev).soft_fails());
    assert!(!ev.is_soft_failed());
    assert!(rec.soft_fails.lock().unwrap().is_empty());
}

#[test]
fn silent_observer_still_decides() {
    let rules = RulesDir::new(RULES);
    let policy = SpamPolicy::with_observer(&rules.config(), Arc::new(NoopObserver)).unwrap();

    let mut ev = MessageEvent::new("@x:evil.org", Some("hi"));
    assert!(policy.check_event_for_spam(&mut ev));
    assert!(ev.is_soft_failed());
    assert!(!policy.user_may_invite("@a:invites.bad", "@b:c", "!r:c"));
}

#[test]
fn missing_body_is_empty_string() {
    let rules = RulesDir::new(
        r#"
blocked_messages_by_content: [""]
"#,
    );
    let policy = rules.policy();
    let mut ev = json!({ "sender": "@a:b" });
    assert!(policy.check_event_for_spam(&mut ev));

    let rules = RulesDir::new(
        r#"
blocked_messages_by_content_pattern: ["^$"]
"#,
    );
    let policy = rules.policy();
    let mut ev = json!({ "sender": "@a:b", "content": {} });
    assert_eq!(policy.evaluate(&mut ev), Verdict::Spam(MatchedRule::BodyPattern));

    let mut ev = MessageEvent::new("@a:b", Some("text"));
    assert!(!policy.check_event_for_spam(&mut ev));
}

#[test]
fn invites_from_blocked_homeserver_are_denied() {
    let rules = RulesDir::new(RULES);
    let rec = recorder();
    let policy = SpamPolicy::with_observer(&rules.config(), rec.clone()).unwrap();

    assert!(!policy.user_may_invite("@a:invites.bad", "@b:example.org", "!room:example.org"));
    assert!(!policy.user_may_invite("@a:invites.bad", "@other:else", "!other:else"));
    assert!(policy.user_may_invite("@a:invites.bad.org", "@b:example.org", "!room:example.org"));
    // message homeserver blocks do not apply to invites
    assert!(policy.user_may_invite("@a:evil.org", "@b:example.org", "!room:example.org"));

    assert_eq!(rec.invites_denied.lock().unwrap().len(), 2);
}

#[test]
fn observer_sees_every_event_and_initial_load() {
    let rules = RulesDir::new(RULES);
    let rec = recorder();
    let policy = SpamPolicy::with_observer(&rules.config(), rec.clone()).unwrap();

    policy.check_event(&MessageEvent::new("@alice:example.org", Some("hi")));
    policy.check_event(&MessageEvent::new("@alice:example.org", Some("BUY NOW")));

    let events = rec.events.lock().unwrap();
    assert_eq!(*events, vec![Verdict::NotSpam, Verdict::Spam(MatchedRule::Body)]);

    let reloads = rec.reloads.lock().unwrap();
    assert_eq!(reloads.len(), 1);
    assert_eq!(reloads[0].total(), 6);
}

#[test]
fn construction_fails_closed() {
    let err = SpamPolicy::new(&PolicyConfig::new("/no/such/rules.yaml")).err().unwrap();
    assert_eq!(err.code().as_str(), "CONFIG_UNREADABLE");

    let rules = RulesDir::new("blocked_messages_by_user_pattern: [\"(\"]\n");
    let err = SpamPolicy::new(&rules.config()).err().unwrap();
    assert_eq!(err.code().as_str(), "INVALID_PATTERN");
}
