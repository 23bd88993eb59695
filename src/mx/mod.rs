//! DNS MX resolution.
//!
//! [`resolve`] queries a fixed set of public nameservers with a bounded
//! per-query timeout and returns a [`ResolutionOutcome`]. Lookup failures never
//! escape as errors: anything other than a successful answer is `Absent`.

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{
    LookupHost, LookupMx, PUBLIC_NAMESERVERS, PublicResolver, ResolverOptions, resolve,
    resolve_with,
};
pub use types::{MxRecord, ResolutionOutcome};
