use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::PolicyError;

/// Read-only set of disallowed domains, lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: HashSet<String>,
}

impl Blacklist {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .filter_map(|d| normalize_entry(d.as_ref()))
            .collect();
        Self { domains }
    }

    /// One domain per line; surrounding whitespace and blank lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut domains = HashSet::new();
        for line in reader.lines() {
            if let Some(domain) = normalize_entry(&line?) {
                domains.insert(domain);
            }
        }
        Ok(Self { domains })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PolicyError::missing(path)
            } else {
                PolicyError::read(path, source)
            }
        })?;
        let blacklist =
            Self::from_reader(BufReader::new(file)).map_err(|e| PolicyError::read(path, e))?;
        tracing::debug!(path = %path.display(), entries = blacklist.len(), "blacklist loaded");
        Ok(blacklist)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn normalize_entry(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
