mod error;

pub use error::AddressError;

use std::fmt;

use serde::Serialize;

/// An address already accepted by the upstream format validator, split into its
/// parts. The domain is kept both lowercased (for policy checks) and in its
/// IDNA ASCII form (for DNS and the SMTP envelope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress {
    original: String,
    local: String,
    domain: String,
    ascii_domain: String,
}

impl EmailAddress {
    /// Splits `input` on its last `@`. Only the precondition the pipeline relies
    /// on is enforced here; full RFC syntax is the upstream validator's job.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        let (local, domain) = trimmed.rsplit_once('@').ok_or(AddressError::MissingAt)?;

        if local.is_empty() {
            return Err(AddressError::EmptyLocalPart);
        }
        let domain = domain.trim_end_matches('.').to_lowercase();
        if domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }
        let ascii_domain = idna::domain_to_ascii(&domain).map_err(AddressError::idna)?;
        if ascii_domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }

        Ok(Self {
            original: trimmed.to_string(),
            local: local.to_string(),
            domain,
            ascii_domain,
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn ascii_domain(&self) -> &str {
        &self.ascii_domain
    }

    /// Mailbox as written in the `RCPT TO` envelope.
    pub fn envelope(&self) -> String {
        format!("{}@{}", self.local, self.ascii_domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
