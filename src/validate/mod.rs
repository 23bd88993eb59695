//! Validation orchestrator.
//!
//! Runs Blacklist → TldShape → MxResolution → SmtpProbe and stops at the first
//! stage that produces a terminal outcome. Each call is independent; the only
//! state shared between calls is the read-only [`DomainPolicy`].

mod message;
mod types;

pub use types::{SmtpCheckStatus, Stage, ValidationResult};

use std::sync::Arc;

use rayon::prelude::*;

use crate::address::{AddressError, EmailAddress};
use crate::mx::{LookupMx, PublicResolver, ResolutionOutcome, ResolverOptions, resolve_with};
use crate::policy::DomainPolicy;
use crate::probe::{ProbeOptions, Prober, SmtpProber};

pub struct Validator<R = PublicResolver, P = SmtpProber> {
    policy: Arc<DomainPolicy>,
    resolver: R,
    prober: P,
}

impl Validator {
    /// Public nameservers and the default SMTP probe.
    pub fn new(policy: DomainPolicy) -> Self {
        Self::with_options(policy, &ResolverOptions::default(), ProbeOptions::default())
    }

    pub fn with_options(
        policy: DomainPolicy,
        resolver: &ResolverOptions,
        probe: ProbeOptions,
    ) -> Self {
        Self::with_components(
            Arc::new(policy),
            PublicResolver::new(resolver),
            SmtpProber::with_resolver(probe, PublicResolver::new(resolver)),
        )
    }
}

impl<R, P> Validator<R, P>
where
    R: LookupMx,
    P: Prober,
{
    pub fn with_components(policy: Arc<DomainPolicy>, resolver: R, prober: P) -> Self {
        Self {
            policy,
            resolver,
            prober,
        }
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }

    /// Fails only when `email` cannot be split into a local part and a domain.
    /// DNS and SMTP faults are always folded into the returned result.
    pub fn validate(
        &self,
        email: &str,
        enable_smtp_probe: bool,
    ) -> Result<ValidationResult, AddressError> {
        let address = EmailAddress::parse(email)?;
        Ok(self.validate_address(&address, enable_smtp_probe))
    }

    pub fn validate_address(
        &self,
        address: &EmailAddress,
        enable_smtp_probe: bool,
    ) -> ValidationResult {
        let span = tracing::debug_span!("validate", email = %address);
        let _guard = span.enter();

        let verdict = self.policy.check(address);
        let domain = address.domain();
        let mut draft = Draft::new(address, verdict.is_role_based);

        if verdict.is_blacklisted {
            draft.is_blacklisted = true;
            return draft.finish(Stage::Blacklist, message::blacklisted(domain));
        }

        if !verdict.is_valid_tld {
            return draft.finish(Stage::TldShape, message::invalid_tld(domain));
        }

        let hosts = match resolve_with(&self.resolver, address.ascii_domain()) {
            ResolutionOutcome::Absent => {
                return draft.finish(Stage::MxResolution, message::domain_absent(domain));
            }
            ResolutionOutcome::NoRoute => {
                draft.domain_exists = true;
                return draft.finish(Stage::MxResolution, message::no_mail_route(domain));
            }
            routed @ ResolutionOutcome::Routed(_) => routed.hosts(),
        };
        draft.domain_exists = true;
        draft.mx_hosts = Some(hosts.clone());

        if !enable_smtp_probe {
            return draft.finish(Stage::MxResolution, message::not_verified());
        }

        let outcome = self.prober.probe(address, &hosts);
        let text = message::for_probe(address.original(), &outcome);
        draft.smtp_check_status = SmtpCheckStatus::from(&outcome);
        draft.probe_outcome = Some(outcome);
        draft.finish(Stage::SmtpProbe, text)
    }
}

impl<R, P> Validator<R, P>
where
    R: LookupMx + Sync,
    P: Prober + Sync,
{
    /// Validates every address on the current rayon pool. Output order matches
    /// input order.
    pub fn validate_all<S>(
        &self,
        emails: &[S],
        enable_smtp_probe: bool,
    ) -> Vec<Result<ValidationResult, AddressError>>
    where
        S: AsRef<str> + Sync,
    {
        emails
            .par_iter()
            .map(|email| self.validate(email.as_ref(), enable_smtp_probe))
            .collect()
    }
}

/// Result under construction; only `finish` hands it out.
struct Draft {
    email: String,
    domain: String,
    domain_exists: bool,
    is_blacklisted: bool,
    is_role_based: bool,
    smtp_check_status: SmtpCheckStatus,
    probe_outcome: Option<crate::probe::ProbeOutcome>,
    mx_hosts: Option<Vec<String>>,
}

impl Draft {
    fn new(address: &EmailAddress, is_role_based: bool) -> Self {
        Self {
            email: address.original().to_string(),
            domain: address.domain().to_string(),
            domain_exists: false,
            is_blacklisted: false,
            is_role_based,
            smtp_check_status: SmtpCheckStatus::Skipped,
            probe_outcome: None,
            mx_hosts: None,
        }
    }

    fn finish(self, stage: Stage, message: String) -> ValidationResult {
        tracing::debug!(?stage, status = %self.smtp_check_status, "validation finished");
        ValidationResult {
            email: self.email,
            domain: self.domain,
            is_valid_format: true,
            domain_exists: self.domain_exists,
            is_blacklisted: self.is_blacklisted,
            is_role_based: self.is_role_based,
            smtp_check_status: self.smtp_check_status,
            probe_outcome: self.probe_outcome,
            mx_hosts: self.mx_hosts,
            message,
            decided_at: stage,
        }
    }
}

#[cfg(test)]
mod tests;
