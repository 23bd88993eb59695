use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Classification of an MX lookup. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// NXDOMAIN, or any resolver failure (fail closed).
    Absent,
    /// The domain exists but publishes no MX records.
    NoRoute,
    /// Records sorted by ascending preference, ties in resolver order.
    Routed(Vec<MxRecord>),
}

impl ResolutionOutcome {
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Routed(records) => records.as_slice(),
            Self::Absent | Self::NoRoute => &[],
        }
    }

    pub fn domain_exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    pub fn hosts(&self) -> Vec<String> {
        self.records().iter().map(|r| r.exchange.clone()).collect()
    }
}
