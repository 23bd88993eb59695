use crate::probe::ProbeOutcome;

pub(crate) fn blacklisted(domain: &str) -> String {
    format!("The domain '{domain}' is blacklisted and should not be used.")
}

pub(crate) fn invalid_tld(domain: &str) -> String {
    format!("The domain '{domain}' does not appear to have a valid Top-Level Domain.")
}

pub(crate) fn domain_absent(domain: &str) -> String {
    format!("The domain '{domain}' does not exist (NXDOMAIN).")
}

pub(crate) fn no_mail_route(domain: &str) -> String {
    format!("The domain '{domain}' exists, but no Mail Exchange (MX) records were found.")
}

pub(crate) fn not_verified() -> String {
    "Basic validation successful. Domain is valid, but mailbox existence was not verified (SMTP check skipped).".to_string()
}

pub(crate) fn for_probe(email: &str, outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Accepted => format!("Email '{email}' is valid and the mailbox exists."),
        ProbeOutcome::Rejected { reason, .. } => format!(
            "Domain exists, but the mail server explicitly rejected the address. It is likely invalid. Detail: {reason}"
        ),
        ProbeOutcome::TimedOut { .. } => {
            "Domain exists, but the mail server timed out. Mailbox existence is uncertain."
                .to_string()
        }
        ProbeOutcome::Inconclusive { detail } => {
            format!("Validation failed due to an unexpected server error. Detail: {detail}")
        }
    }
}
