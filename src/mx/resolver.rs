use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;

use super::{Error, MxRecord, ResolutionOutcome};

/// Cloudflare, Google and Quad9. Queried instead of the host configuration so a
/// broken local resolver cannot make every domain look absent.
pub const PUBLIC_NAMESERVERS: [IpAddr; 3] = [
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub nameservers: Vec<IpAddr>,
    pub port: u16,
    /// Deadline for a single query to a single nameserver, not for a whole
    /// lookup. Each address is registered over UDP and TCP and queried once, so
    /// an unresponsive set of nameservers can take a few multiples of this
    /// before the lookup gives up.
    pub timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            nameservers: PUBLIC_NAMESERVERS.to_vec(),
            port: 53,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Raw MX lookup seam. Implementations report NXDOMAIN as
/// [`Error::NxDomain`] and an empty answer as `Ok(vec![])`.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

/// Address lookup for mail exchange hostnames, so the SMTP probe never falls
/// back to the host's own resolver.
pub trait LookupHost {
    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, Error>;
}

/// Resolves through a fixed set of public nameservers.
///
/// A fresh [`Resolver`] is built for every lookup, so concurrent lookups for
/// independent domains share nothing mutable.
#[derive(Debug, Clone)]
pub struct PublicResolver {
    config: ResolverConfig,
    opts: ResolverOpts,
}

impl PublicResolver {
    pub fn new(options: &ResolverOptions) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(&options.nameservers, options.port, true);
        let config = ResolverConfig::from_parts(None, Vec::new(), group);
        let mut opts = ResolverOpts::default();
        opts.timeout = options.timeout;
        opts.attempts = 1;
        Self { config, opts }
    }
}

impl Default for PublicResolver {
    fn default() -> Self {
        Self::new(&ResolverOptions::default())
    }
}

impl PublicResolver {
    fn build(&self) -> Result<Resolver, Error> {
        Resolver::new(self.config.clone(), self.opts.clone()).map_err(Error::resolver_init)
    }
}

impl LookupMx for PublicResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let resolver = self.build()?;
        let lookup = match resolver.mx_lookup(domain) {
            Ok(lookup) => lookup,
            Err(err) => return classify_failure(err),
        };
        let records = lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect();
        Ok(records)
    }
}

impl LookupHost for PublicResolver {
    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, Error> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }
        let resolver = self.build()?;
        match resolver.lookup_ip(host) {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(err) => classify_failure(err),
        }
    }
}

fn classify_failure<T>(err: ResolveError) -> Result<Vec<T>, Error> {
    let response_code = match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => *response_code,
        ResolveErrorKind::Timeout => return Err(Error::Timeout),
        _ => return Err(Error::lookup(err)),
    };
    match response_code {
        ResponseCode::NoError => Ok(Vec::new()),
        ResponseCode::NXDomain => Err(Error::NxDomain),
        _ => Err(Error::lookup(err)),
    }
}

/// Lookup MX records for `ascii_domain` against the public nameservers.
pub fn resolve(ascii_domain: &str) -> ResolutionOutcome {
    resolve_with(&PublicResolver::default(), ascii_domain)
}

/// Classifies a lookup into a [`ResolutionOutcome`]. Every failure maps to
/// `Absent`; this never retries.
pub fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> ResolutionOutcome
where
    R: LookupMx + ?Sized,
{
    let mut records = match resolver.lookup_mx(ascii_domain) {
        Ok(records) => records,
        Err(Error::NxDomain) => {
            tracing::debug!(domain = ascii_domain, "NXDOMAIN");
            return ResolutionOutcome::Absent;
        }
        Err(err) => {
            tracing::warn!(domain = ascii_domain, error = %err, "MX lookup failed, treating domain as absent");
            return ResolutionOutcome::Absent;
        }
    };

    // null MX (RFC 7505) advertises that the domain accepts no mail
    records.retain(|r| !r.exchange.is_empty());
    if records.is_empty() {
        return ResolutionOutcome::NoRoute;
    }

    // stable: equal preferences keep resolver order
    records.sort_by_key(|r| r.preference);
    tracing::debug!(domain = ascii_domain, count = records.len(), "MX records resolved");
    ResolutionOutcome::Routed(records)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
