//! Static domain policy: blacklist membership, role accounts and TLD shape.
//!
//! Everything here is pure and synchronous. A negative answer is a normal
//! outcome, not an error.

mod blacklist;
mod error;
mod role;
mod tld;

pub use blacklist::Blacklist;
pub use error::PolicyError;
pub use role::is_role_based;
pub use tld::is_valid_tld;

use serde::Serialize;

use crate::address::EmailAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyVerdict {
    pub is_blacklisted: bool,
    pub is_role_based: bool,
    pub is_valid_tld: bool,
}

/// Immutable policy sets, built once and shared read-only by every validation.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    blacklist: Blacklist,
}

impl DomainPolicy {
    pub fn new(blacklist: Blacklist) -> Self {
        Self { blacklist }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn is_blacklisted(&self, domain: &str) -> bool {
        self.blacklist.contains(domain)
    }

    pub fn check(&self, address: &EmailAddress) -> PolicyVerdict {
        PolicyVerdict {
            is_blacklisted: self.is_blacklisted(address.domain()),
            is_role_based: is_role_based(address.local()),
            is_valid_tld: is_valid_tld(address.domain()),
        }
    }
}
