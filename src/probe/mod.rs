//! SMTP recipient probe.
//!
//! [`SmtpProber`] connects to the most-preferred mail exchange only, runs
//! greeting / `HELO` / `MAIL FROM` / `RCPT TO` and classifies the recipient reply
//! into a [`ProbeOutcome`]. No message is ever sent. Secondary exchanges are not
//! retried.

mod options;
mod session;
mod types;

pub use options::ProbeOptions;
pub use types::{COULD_NOT_CONNECT, MAILBOX_REJECTED, ProbeOutcome, SENDER_NOT_ACCEPTED, SmtpReply};

use std::io::{self, Read, Write};
use std::net::SocketAddr;

use crate::address::EmailAddress;
use crate::mx::{Error as MxError, LookupHost, PublicResolver};

use session::SmtpSession;

/// Asks a mail server whether it would accept `address`.
pub trait Prober {
    /// `hosts` is the MX routing table in preference order.
    fn probe(&self, address: &EmailAddress, hosts: &[String]) -> ProbeOutcome;
}

/// Talks SMTP to the first mail exchange. `H` resolves the exchange hostname so
/// the lookup uses the same nameservers and deadline as the MX query.
#[derive(Debug, Clone)]
pub struct SmtpProber<H = PublicResolver> {
    options: ProbeOptions,
    hosts: H,
}

impl SmtpProber {
    pub fn new(options: ProbeOptions) -> Self {
        Self::with_resolver(options, PublicResolver::default())
    }
}

impl Default for SmtpProber {
    fn default() -> Self {
        Self::new(ProbeOptions::default())
    }
}

impl<H: LookupHost> SmtpProber<H> {
    pub fn with_resolver(options: ProbeOptions, hosts: H) -> Self {
        Self { options, hosts }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    fn socket_addrs(&self, exchange: &str) -> Result<Vec<SocketAddr>, MxError> {
        let ips = self.hosts.lookup_host(exchange)?;
        Ok(ips
            .into_iter()
            .map(|ip| SocketAddr::new(ip, self.options.port))
            .collect())
    }
}

impl<H: LookupHost> Prober for SmtpProber<H> {
    fn probe(&self, address: &EmailAddress, hosts: &[String]) -> ProbeOutcome {
        let Some(host) = hosts.first() else {
            return ProbeOutcome::inconclusive("no mail exchange to probe");
        };
        let span = tracing::debug_span!("smtp_probe", host = %host, rcpt = %address);
        let _guard = span.enter();

        let addrs = match self.socket_addrs(host) {
            Ok(addrs) if !addrs.is_empty() => addrs,
            Ok(_) => {
                tracing::warn!(host = %host, "mail exchange has no address");
                return ProbeOutcome::rejected(None, COULD_NOT_CONNECT);
            }
            Err(err) => {
                tracing::warn!(host = %host, error = %err, "failed to resolve mail exchange");
                return ProbeOutcome::rejected(None, COULD_NOT_CONNECT);
            }
        };

        let (mut session, peer) = match SmtpSession::connect(
            &addrs,
            self.options.connect_timeout,
            self.options.command_timeout,
        ) {
            Ok(pair) => pair,
            Err(err) => return classify_connect_error(host, &err),
        };
        tracing::debug!(%peer, "connected");

        run_session(&mut session, host, address, &self.options)
    }
}

/// Runs the dialogue on an open session and always closes it, whatever the
/// outcome.
pub(crate) fn run_session<S: Read + Write>(
    session: &mut SmtpSession<S>,
    host: &str,
    address: &EmailAddress,
    options: &ProbeOptions,
) -> ProbeOutcome {
    match converse(session, address, options) {
        Ok(outcome) => {
            session.quit(true);
            outcome
        }
        Err(err) => {
            session.quit(false);
            classify_io_error(host, &err)
        }
    }
}

fn converse<S: Read + Write>(
    session: &mut SmtpSession<S>,
    address: &EmailAddress,
    options: &ProbeOptions,
) -> io::Result<ProbeOutcome> {
    let greeting = session.read_reply()?;
    if !greeting.is_positive_completion() {
        return Ok(ProbeOutcome::rejected(Some(greeting.code), COULD_NOT_CONNECT));
    }

    let helo = session.command(&format!("HELO {}", options.helo_domain))?;
    if !helo.is_positive_completion() {
        tracing::debug!(code = helo.code, "HELO not acknowledged, continuing");
    }

    let mail = session.command(&format!("MAIL FROM:<{}>", options.mail_from))?;
    if !mail.is_positive_completion() {
        return Ok(ProbeOutcome::rejected(Some(mail.code), SENDER_NOT_ACCEPTED));
    }

    let rcpt = session.command(&format!("RCPT TO:<{}>", address.envelope()))?;
    Ok(classify_rcpt(&rcpt))
}

pub(crate) fn classify_rcpt(reply: &SmtpReply) -> ProbeOutcome {
    if reply.is_positive_completion() {
        ProbeOutcome::Accepted
    } else if matches!(reply.code, 550 | 553) {
        ProbeOutcome::rejected(Some(reply.code), MAILBOX_REJECTED)
    } else {
        ProbeOutcome::rejected(
            Some(reply.code),
            format!("server rejected recipient with code {}", reply.code),
        )
    }
}

/// A port that cannot be reached is evidence against deliverability; a
/// connect that hangs is not.
pub(crate) fn classify_connect_error(host: &str, err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            tracing::warn!(host = %host, "connect timed out");
            ProbeOutcome::timed_out(format!("connection to the mail server ({host}) timed out"))
        }
        _ => {
            tracing::warn!(host = %host, error = %err, "connect failed");
            ProbeOutcome::rejected(None, COULD_NOT_CONNECT)
        }
    }
}

/// Faults after the connection is open. Drops and resets leave existence
/// uncertain, so they share `TimedOut` with read deadlines.
pub(crate) fn classify_io_error(host: &str, err: &io::Error) -> ProbeOutcome {
    use io::ErrorKind::*;

    match err.kind() {
        TimedOut | WouldBlock => {
            tracing::warn!(host = %host, "mail server timed out");
            ProbeOutcome::timed_out(format!("the mail server ({host}) timed out"))
        }
        UnexpectedEof | ConnectionReset | ConnectionAborted | BrokenPipe | NotConnected => {
            tracing::warn!(host = %host, error = %err, "mail server disconnected");
            ProbeOutcome::timed_out(format!(
                "the mail server ({host}) disconnected unexpectedly; status is uncertain"
            ))
        }
        _ => {
            tracing::warn!(host = %host, error = %err, "unexpected SMTP fault");
            ProbeOutcome::inconclusive(format!("unexpected error talking to {host}: {err}"))
        }
    }
}
