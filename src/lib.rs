#![forbid(unsafe_code)]
//! mailprobe_lib: email deliverability probing without sending mail.
//!
//! The pipeline checks static domain policy, resolves MX records through public
//! nameservers and asks the preferred mail exchange whether it would accept the
//! recipient. See [`Validator::validate`].

pub mod address;
pub mod config;
pub mod mx;
pub mod policy;
pub mod probe;
pub mod validate;

pub use address::{AddressError, EmailAddress};
pub use config::{ConfigError, ConfigFile};
pub use mx::{
    Error as MxError, LookupHost, LookupMx, MxRecord, PublicResolver, ResolutionOutcome,
    ResolverOptions,
};
pub use policy::{Blacklist, DomainPolicy, PolicyError, PolicyVerdict};
pub use probe::{ProbeOptions, ProbeOutcome, Prober, SmtpProber};
pub use validate::{SmtpCheckStatus, Stage, ValidationResult, Validator};
