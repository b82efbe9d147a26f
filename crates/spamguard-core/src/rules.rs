//! Block rule compilation and matching utilities.
//!
//! A [`RulesDocument`] is the raw, deserialized rules file. [`RuleSet::compile`]
//! turns it into an immutable snapshot: exact lists become hash sets and
//! pattern lists become compiled regexes. Nothing here is mutated after
//! construction; a reload always builds a fresh `RuleSet`.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SpamError};

/// Raw rules file. Every key is optional; unknown keys are ignored.
///
/// Two spellings are in the wild for the body lists, so
/// `blocked_messages_by_text` and `blocked_messages_by_pattern` are accepted as
/// aliases. Supplying both spellings of the same list is a duplicate-field error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocked_messages_by_homeserver: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocked_messages_by_user: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocked_messages_by_user_pattern: Vec<String>,

    #[serde(default, alias = "blocked_messages_by_text", deserialize_with = "null_as_empty")]
    pub blocked_messages_by_content: Vec<String>,

    #[serde(default, alias = "blocked_messages_by_pattern", deserialize_with = "null_as_empty")]
    pub blocked_messages_by_content_pattern: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocked_invites_by_homeserver: Vec<String>,
}

// `key:` with no value parses as null; treat it like an absent list.
fn null_as_empty<'de, D>(d: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

/// Set of homeserver domains matched against the suffix of a user id.
#[derive(Debug, Clone, Default)]
pub struct HomeserverSet {
    domains: HashSet<String>,
}

impl HomeserverSet {
    pub fn new(raw: &[String]) -> Self {
        Self {
            domains: raw.iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Returns the blocked domain `d` such that `user_id` ends with `":" + d`.
    ///
    /// Every `:` in the id is a candidate split point, so entries that
    /// themselves contain a colon (`host:8448`) still match.
    pub fn matches<'a>(&'a self, user_id: &str) -> Option<&'a str> {
        if self.domains.is_empty() {
            return None;
        }
        user_id
            .match_indices(':')
            .find_map(|(i, _)| self.domains.get(&user_id[i + 1..]))
            .map(String::as_str)
    }
}

/// Compile one pattern list. The first bad pattern fails the whole list.
pub fn compile_patterns(category: &'static str, raw: &[String]) -> Result<Vec<Regex>> {
    let mut out = Vec::with_capacity(raw.len());
    for p in raw {
        let re = Regex::new(p).map_err(|source| SpamError::InvalidPattern {
            category,
            pattern: p.clone(),
            source,
        })?;
        out.push(re);
    }
    Ok(out)
}

/// First pattern with a match anywhere in `text` (unanchored search).
pub fn first_match<'a>(patterns: &'a [Regex], text: &str) -> Option<&'a Regex> {
    patterns.iter().find(|re| re.is_match(text))
}

/// Immutable snapshot of all configured block rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    sender_homeservers: HomeserverSet,
    senders: HashSet<String>,
    sender_patterns: Vec<Regex>,
    bodies: HashSet<String>,
    body_patterns: Vec<Regex>,
    invite_homeservers: HomeserverSet,
}

impl RuleSet {
    /// Compile a rules document. Fails on the first invalid pattern; no
    /// partially compiled rule set is ever returned.
    pub fn compile(doc: &RulesDocument) -> Result<Self> {
        let sender_patterns = compile_patterns(
            "blocked_messages_by_user_pattern",
            &doc.blocked_messages_by_user_pattern,
        )?;
        let body_patterns = compile_patterns(
            "blocked_messages_by_content_pattern",
            &doc.blocked_messages_by_content_pattern,
        )?;

        Ok(Self {
            sender_homeservers: HomeserverSet::new(&doc.blocked_messages_by_homeserver),
            senders: doc.blocked_messages_by_user.iter().cloned().collect(),
            sender_patterns,
            bodies: doc.blocked_messages_by_content.iter().cloned().collect(),
            body_patterns,
            invite_homeservers: HomeserverSet::new(&doc.blocked_invites_by_homeserver),
        })
    }

    /// Blocked homeserver the sender belongs to, if any.
    pub fn sender_homeserver_match<'a>(&'a self, sender: &str) -> Option<&'a str> {
        self.sender_homeservers.matches(sender)
    }

    pub fn is_blocked_sender(&self, sender: &str) -> bool {
        self.senders.contains(sender)
    }

    pub fn sender_pattern_match<'a>(&'a self, sender: &str) -> Option<&'a Regex> {
        first_match(&self.sender_patterns, sender)
    }

    pub fn is_blocked_body(&self, body: &str) -> bool {
        self.bodies.contains(body)
    }

    pub fn body_pattern_match<'a>(&'a self, body: &str) -> Option<&'a Regex> {
        first_match(&self.body_patterns, body)
    }

    /// Blocked invite homeserver the inviter belongs to, if any.
    pub fn invite_homeserver_match<'a>(&'a self, inviter: &str) -> Option<&'a str> {
        self.invite_homeservers.matches(inviter)
    }

    pub fn counts(&self) -> RuleCounts {
        RuleCounts {
            sender_homeservers: self.sender_homeservers.len(),
            senders: self.senders.len(),
            sender_patterns: self.sender_patterns.len(),
            bodies: self.bodies.len(),
            body_patterns: self.body_patterns.len(),
            invite_homeservers: self.invite_homeservers.len(),
        }
    }
}

/// Per-category rule counts (for logs, metrics, and the reload response).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounts {
    pub sender_homeservers: usize,
    pub senders: usize,
    pub sender_patterns: usize,
    pub bodies: usize,
    pub body_patterns: usize,
    pub invite_homeservers: usize,
}

impl RuleCounts {
    pub fn total(&self) -> usize {
        self.sender_homeservers
            + self.senders
            + self.sender_patterns
            + self.bodies
            + self.body_patterns
            + self.invite_homeservers
    }

    /// `(category, count)` pairs in evaluation order.
    pub fn by_category(&self) -> [(&'static str, usize); 6] {
        [
            ("sender_homeservers", self.sender_homeservers),
            ("senders", self.senders),
            ("sender_patterns", self.sender_patterns),
            ("bodies", self.bodies),
            ("body_patterns", self.body_patterns),
            ("invite_homeservers", self.invite_homeservers),
        ]
    }
}
