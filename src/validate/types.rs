use std::fmt;

use serde::Serialize;

use crate::probe::ProbeOutcome;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Blacklist,
    TldShape,
    MxResolution,
    SmtpProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtpCheckStatus {
    Success,
    Refused,
    Timeout,
    /// Probing disabled, or the pipeline stopped before reaching it.
    Skipped,
    /// The probe ran but could not conclude.
    Unknown,
}

impl SmtpCheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Refused => "refused",
            Self::Timeout => "timeout",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&ProbeOutcome> for SmtpCheckStatus {
    fn from(outcome: &ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Accepted => Self::Success,
            ProbeOutcome::Rejected { .. } => Self::Refused,
            ProbeOutcome::TimedOut { .. } => Self::Timeout,
            ProbeOutcome::Inconclusive { .. } => Self::Unknown,
        }
    }
}

impl fmt::Display for SmtpCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final answer for one address. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub email: String,
    pub domain: String,
    pub is_valid_format: bool,
    pub domain_exists: bool,
    pub is_blacklisted: bool,
    pub is_role_based: bool,
    pub smtp_check_status: SmtpCheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_outcome: Option<ProbeOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx_hosts: Option<Vec<String>>,
    pub message: String,
    /// Stage whose outcome ended the pipeline.
    pub decided_at: Stage,
}

impl ValidationResult {
    /// No check failed. Addresses whose mailbox was not probed count as passing.
    pub fn passed(&self) -> bool {
        !self.is_blacklisted
            && self.domain_exists
            && self.mx_hosts.is_some()
            && matches!(
                self.smtp_check_status,
                SmtpCheckStatus::Success | SmtpCheckStatus::Skipped
            )
    }
}
