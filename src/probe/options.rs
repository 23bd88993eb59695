use std::time::Duration;

/// Controls how [`SmtpProber`](super::SmtpProber) talks to the mail exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    /// Name announced in `HELO`.
    pub helo_domain: String,
    /// Synthetic envelope sender used in `MAIL FROM`.
    pub mail_from: String,
    pub connect_timeout: Duration,
    /// Applied to every read and write after the connection is open.
    pub command_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: "email-validator.example.com".to_string(),
            mail_from: "test@example.com".to_string(),
            connect_timeout: Duration::from_secs(4),
            command_timeout: Duration::from_secs(4),
        }
    }
}
