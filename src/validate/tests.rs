use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::mx::tests::StubResolver;
use crate::mx::{Error as MxError, MxRecord};
use crate::policy::Blacklist;
use crate::probe::{COULD_NOT_CONNECT, MAILBOX_REJECTED, ProbeOutcome};

/// Counts lookups so tests can prove a stage never ran.
struct CountingResolver {
    inner: StubResolver,
    calls: AtomicUsize,
}

impl CountingResolver {
    fn new(inner: StubResolver) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LookupMx for CountingResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, MxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_mx(domain)
    }
}

type ProbeFn = dyn Fn(&EmailAddress, &[String]) -> ProbeOutcome + Send + Sync;

struct StubProber {
    on_probe: Box<ProbeFn>,
    calls: AtomicUsize,
}

impl StubProber {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&EmailAddress, &[String]) -> ProbeOutcome + Send + Sync + 'static,
    {
        Self {
            on_probe: Box::new(f),
            calls: AtomicUsize::new(0),
        }
    }

    fn answering(outcome: ProbeOutcome) -> Self {
        Self::new(move |_, _| outcome.clone())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for StubProber {
    fn probe(&self, address: &EmailAddress, hosts: &[String]) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.on_probe)(address, hosts)
    }
}

fn routed() -> StubResolver {
    StubResolver::new(|_| {
        Ok(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
        ])
    })
}

fn validator(
    resolver: StubResolver,
    prober: StubProber,
) -> Validator<CountingResolver, StubProber> {
    let policy = DomainPolicy::new(Blacklist::new(["mailinator.com", "spam.test"]));
    Validator::with_components(Arc::new(policy), CountingResolver::new(resolver), prober)
}

#[test]
fn blacklisted_domain_never_reaches_resolver() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    for email in ["joe@mailinator.com", "admin+x@MAILINATOR.COM", "a@spam.test"] {
        let result = v.validate(email, true).unwrap();
        assert!(result.is_blacklisted, "{email}");
        assert!(!result.domain_exists);
        assert_eq!(result.decided_at, Stage::Blacklist);
        assert_eq!(result.smtp_check_status, SmtpCheckStatus::Skipped);
        assert!(result.mx_hosts.is_none());
        assert!(result.probe_outcome.is_none());
    }
    assert_eq!(v.resolver.calls(), 0);
    assert_eq!(v.prober.calls(), 0);
}

#[test]
fn role_based_flag_is_reported_even_when_short_circuited() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    let result = v.validate("admin+test@mailinator.com", false).unwrap();
    assert!(result.is_role_based);

    let result = v.validate("admin+test@example.com", false).unwrap();
    assert!(result.is_role_based);

    let result = v.validate("alice@example.com", false).unwrap();
    assert!(!result.is_role_based);
}

#[test]
fn invalid_tld_stops_before_dns() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    let result = v.validate("user@example.zzz", true).unwrap();
    assert_eq!(result.decided_at, Stage::TldShape);
    assert!(!result.domain_exists);
    insta::assert_snapshot!(
        result.message,
        @"The domain 'example.zzz' does not appear to have a valid Top-Level Domain."
    );
    assert_eq!(v.resolver.calls(), 0);
}

#[test]
fn nxdomain_is_terminal_with_domain_missing() {
    let v = validator(
        StubResolver::new(|_| Err(MxError::NxDomain)),
        StubProber::answering(ProbeOutcome::Accepted),
    );
    let result = v.validate("user@nope-nope.com", true).unwrap();
    assert!(!result.domain_exists);
    assert_eq!(result.decided_at, Stage::MxResolution);
    assert_eq!(result.smtp_check_status, SmtpCheckStatus::Skipped);
    assert!(result.mx_hosts.is_none());
    insta::assert_snapshot!(result.message, @"The domain 'nope-nope.com' does not exist (NXDOMAIN).");
    assert_eq!(v.resolver.calls(), 1);
    assert_eq!(v.prober.calls(), 0);
}

#[test]
fn no_route_marks_domain_existing_without_hosts() {
    let v = validator(
        StubResolver::new(|_| Ok(Vec::new())),
        StubProber::answering(ProbeOutcome::Accepted),
    );
    let result = v.validate("user@example.org", true).unwrap();
    assert!(result.domain_exists);
    assert!(result.mx_hosts.is_none());
    assert_eq!(result.decided_at, Stage::MxResolution);
    assert_eq!(v.prober.calls(), 0);
    assert!(!result.passed());
}

#[test]
fn probe_disabled_reports_not_verified() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    let result = v.validate("user@example.com", false).unwrap();
    assert!(result.domain_exists);
    assert_eq!(
        result.mx_hosts,
        Some(vec!["mx1.example.com".to_string(), "mx2.example.com".to_string()])
    );
    assert_eq!(result.smtp_check_status, SmtpCheckStatus::Skipped);
    assert!(result.probe_outcome.is_none());
    insta::assert_snapshot!(
        result.message,
        @"Basic validation successful. Domain is valid, but mailbox existence was not verified (SMTP check skipped)."
    );
    assert_eq!(v.prober.calls(), 0);
    assert!(result.passed());
}

#[test]
fn probe_receives_hosts_in_preference_order() {
    let prober = StubProber::new(|address, hosts| {
        assert_eq!(address.envelope(), "user@example.com");
        assert_eq!(hosts, ["mx1.example.com", "mx2.example.com"]);
        ProbeOutcome::Accepted
    });
    let v = validator(routed(), prober);
    let result = v.validate("user@Example.com", true).unwrap();
    assert_eq!(result.smtp_check_status, SmtpCheckStatus::Success);
    assert_eq!(result.probe_outcome, Some(ProbeOutcome::Accepted));
    assert_eq!(result.decided_at, Stage::SmtpProbe);
    insta::assert_snapshot!(result.message, @"Email 'user@Example.com' is valid and the mailbox exists.");
    assert!(result.passed());
}

#[test]
fn probe_outcomes_map_to_status() {
    let cases = [
        (
            ProbeOutcome::Rejected {
                code: Some(550),
                reason: MAILBOX_REJECTED.to_string(),
            },
            SmtpCheckStatus::Refused,
        ),
        (
            ProbeOutcome::Rejected {
                code: None,
                reason: COULD_NOT_CONNECT.to_string(),
            },
            SmtpCheckStatus::Refused,
        ),
        (
            ProbeOutcome::TimedOut {
                detail: "connection to the mail server (mx1.example.com) timed out".to_string(),
            },
            SmtpCheckStatus::Timeout,
        ),
        (
            ProbeOutcome::Inconclusive {
                detail: "garbage".to_string(),
            },
            SmtpCheckStatus::Unknown,
        ),
    ];

    for (outcome, expected) in cases {
        let v = validator(routed(), StubProber::answering(outcome.clone()));
        let result = v.validate("user@example.com", true).unwrap();
        assert_eq!(result.smtp_check_status, expected);
        assert_eq!(result.probe_outcome.as_ref(), Some(&outcome));
        assert!(!result.message.is_empty());
        assert!(!result.passed());
    }
}

#[test]
fn malformed_input_is_the_only_error() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    assert!(matches!(v.validate("no-at", true), Err(AddressError::MissingAt)));
    assert!(matches!(v.validate("user@", true), Err(AddressError::EmptyDomain)));
    assert_eq!(v.resolver.calls(), 0);
}

#[test]
fn repeated_calls_are_identical() {
    let v = validator(
        routed(),
        StubProber::answering(ProbeOutcome::Rejected {
            code: Some(550),
            reason: MAILBOX_REJECTED.to_string(),
        }),
    );
    let first = v.validate("someone@example.com", true).unwrap();
    let second = v.validate("someone@example.com", true).unwrap();
    assert_eq!(first, second);
    assert_eq!(v.resolver.calls(), 2);
}

#[test]
fn concurrent_validations_do_not_interfere() {
    let resolver = StubResolver::new(|domain| match domain {
        "alpha.com" => Ok(vec![MxRecord::new(5, "mx.alpha.com")]),
        "beta.net" => Ok(vec![MxRecord::new(5, "mx.beta.net")]),
        other => panic!("unexpected lookup {other}"),
    });
    let prober = StubProber::new(|_, hosts| match hosts[0].as_str() {
        "mx.alpha.com" => ProbeOutcome::Accepted,
        _ => ProbeOutcome::Rejected {
            code: Some(550),
            reason: MAILBOX_REJECTED.to_string(),
        },
    });
    let v = validator(resolver, prober);

    std::thread::scope(|scope| {
        let alpha = scope.spawn(|| {
            (0..50)
                .map(|_| v.validate("a@alpha.com", true).unwrap())
                .collect::<Vec<_>>()
        });
        let beta = scope.spawn(|| {
            (0..50)
                .map(|_| v.validate("b@beta.net", true).unwrap())
                .collect::<Vec<_>>()
        });

        for result in alpha.join().unwrap() {
            assert_eq!(result.smtp_check_status, SmtpCheckStatus::Success);
            assert_eq!(result.mx_hosts, Some(vec!["mx.alpha.com".to_string()]));
        }
        for result in beta.join().unwrap() {
            assert_eq!(result.smtp_check_status, SmtpCheckStatus::Refused);
            assert_eq!(result.mx_hosts, Some(vec!["mx.beta.net".to_string()]));
        }
    });
    assert_eq!(v.resolver.calls(), 100);
}

#[test]
fn validate_all_keeps_input_order() {
    let v = validator(routed(), StubProber::answering(ProbeOutcome::Accepted));
    let emails = ["a@example.com", "broken", "b@mailinator.com", "c@example.zzz"];
    let results = v.validate_all(&emails, false);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().email, "a@example.com");
    assert!(results[1].is_err());
    assert!(results[2].as_ref().unwrap().is_blacklisted);
    assert_eq!(results[3].as_ref().unwrap().decided_at, Stage::TldShape);
}
