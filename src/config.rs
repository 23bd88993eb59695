//! TOML configuration mirroring the library option structs.
//!
//! ```toml
//! [dns]
//! nameservers = ["1.1.1.1", "8.8.8.8"]
//! timeout_secs = 5
//!
//! [smtp]
//! enabled = true
//! helo_domain = "probe.example.net"
//! mail_from = "bounce@example.net"
//! connect_timeout_secs = 4
//! command_timeout_secs = 4
//!
//! [policy]
//! blacklist = "domains_blacklist.txt"
//! ```
//!
//! Every key is optional; missing keys keep the library defaults.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::mx::ResolverOptions;
use crate::probe::ProbeOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub dns: DnsConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DnsConfig {
    pub nameservers: Option<Vec<IpAddr>>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    pub enabled: Option<bool>,
    pub port: Option<u16>,
    pub helo_domain: Option<String>,
    pub mail_from: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub command_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub blacklist: Option<PathBuf>,
}

impl ConfigFile {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|source| ConfigError::Parse { source })?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.dns.nameservers.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::Invalid("dns.nameservers must not be empty".into()));
        }
        let timeouts = [
            ("dns.timeout_secs", self.dns.timeout_secs),
            ("smtp.connect_timeout_secs", self.smtp.connect_timeout_secs),
            ("smtp.command_timeout_secs", self.smtp.command_timeout_secs),
        ];
        for (key, value) in timeouts {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{key} must be greater than 0")));
            }
        }
        Ok(())
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        let mut options = ResolverOptions::default();
        if let Some(servers) = &self.dns.nameservers {
            options.nameservers = servers.clone();
        }
        if let Some(port) = self.dns.port {
            options.port = port;
        }
        if let Some(secs) = self.dns.timeout_secs {
            options.timeout = Duration::from_secs(secs);
        }
        options
    }

    pub fn probe_options(&self) -> ProbeOptions {
        let mut options = ProbeOptions::default();
        let smtp = &self.smtp;
        if let Some(port) = smtp.port {
            options.port = port;
        }
        if let Some(helo) = smtp.helo_domain.as_deref().filter(|v| !v.is_empty()) {
            options.helo_domain = helo.to_string();
        }
        if let Some(from) = smtp.mail_from.as_deref().filter(|v| !v.is_empty()) {
            options.mail_from = from.to_string();
        }
        if let Some(secs) = smtp.connect_timeout_secs {
            options.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = smtp.command_timeout_secs {
            options.command_timeout = Duration::from_secs(secs);
        }
        options
    }

    pub fn smtp_enabled(&self) -> Option<bool> {
        self.smtp.enabled
    }

    pub fn blacklist_path(&self) -> Option<&Path> {
        self.policy.blacklist.as_deref()
    }
}
