use thiserror::Error;

/// Failures of a single MX lookup. None of these reach the caller of
/// [`crate::Validator::validate`]; they are folded into
/// [`ResolutionOutcome::Absent`](super::ResolutionOutcome::Absent).
#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain does not exist (NXDOMAIN)")]
    NxDomain,
    #[error("DNS query timed out")]
    Timeout,
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("MX lookup failed: {source}")]
    Lookup {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl MxError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn lookup(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::Lookup { source }
    }
}
