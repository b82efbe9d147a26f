//! Spam verdicts and rule attribution.

use serde::Serialize;

/// Rule category that flagged an event, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    /// Sender's homeserver is blocked (suffix match).
    SenderHomeserver,
    /// Sender is blocked by exact id.
    Sender,
    /// Sender matches a blocked pattern.
    SenderPattern,
    /// Body equals a blocked body.
    Body,
    /// Body matches a blocked pattern.
    BodyPattern,
}

impl MatchedRule {
    /// Label used in logs, metrics, and JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchedRule::SenderHomeserver => "sender_homeserver",
            MatchedRule::Sender => "sender",
            MatchedRule::SenderPattern => "sender_pattern",
            MatchedRule::Body => "body",
            MatchedRule::BodyPattern => "body_pattern",
        }
    }

    /// Only homeserver blocks soft-fail the event; every other hit is a plain reject.
    pub fn soft_fails(self) -> bool {
        matches!(self, MatchedRule::SenderHomeserver)
    }
}

/// Outcome of evaluating one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NotSpam,
    Spam(MatchedRule),
}

impl Verdict {
    pub fn is_spam(self) -> bool {
        matches!(self, Verdict::Spam(_))
    }

    pub fn rule(self) -> Option<MatchedRule> {
        match self {
            Verdict::Spam(r) => Some(r),
            Verdict::NotSpam => None,
        }
    }

    pub fn soft_fails(self) -> bool {
        self.rule().map(MatchedRule::soft_fails).unwrap_or(false)
    }
}
