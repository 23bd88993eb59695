use thiserror::Error;

/// Raised when the input cannot even be split into a local part and a domain.
/// This is a precondition violation, never a network fault.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address must contain an '@'")]
    MissingAt,
    #[error("local part is empty")]
    EmptyLocalPart,
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
}

impl AddressError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }
}
