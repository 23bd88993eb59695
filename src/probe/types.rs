use std::fmt;

use serde::Serialize;

pub const COULD_NOT_CONNECT: &str = "could not connect";
pub const SENDER_NOT_ACCEPTED: &str = "sender not accepted";
pub const MAILBOX_REJECTED: &str = "mailbox does not exist or explicitly rejected";

/// A raw SMTP reply, preserving the numeric status code and message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// What the most-preferred mail exchange said about the recipient.
///
/// Transport faults and protocol answers never share a variant: a dropped
/// connection is `TimedOut`, never `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Accepted,
    Rejected { code: Option<u16>, reason: String },
    TimedOut { detail: String },
    Inconclusive { detail: String },
}

impl ProbeOutcome {
    pub(crate) fn rejected(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            reason: reason.into(),
        }
    }

    pub(crate) fn timed_out(detail: impl Into<String>) -> Self {
        Self::TimedOut {
            detail: detail.into(),
        }
    }

    pub(crate) fn inconclusive(detail: impl Into<String>) -> Self {
        Self::Inconclusive {
            detail: detail.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Accepted => "recipient accepted",
            Self::Rejected { reason, .. } => reason,
            Self::TimedOut { detail } | Self::Inconclusive { detail } => detail,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected {
                code: Some(code),
                reason,
            } => write!(f, "rejected ({code} {reason})"),
            Self::Rejected { code: None, reason } => write!(f, "rejected ({reason})"),
            Self::TimedOut { detail } => write!(f, "timed out ({detail})"),
            Self::Inconclusive { detail } => write!(f, "inconclusive ({detail})"),
        }
    }
}
