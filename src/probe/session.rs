use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use super::types::SmtpReply;

/// RFC 5321 §4.5.3.1.5 reply line limit, CRLF included.
pub(crate) const MAX_LINE_LEN: usize = 512;
/// Upper bound on lines in one multi-line reply.
pub(crate) const MAX_REPLY_LINES: usize = 128;

pub(crate) struct SmtpSession<S> {
    reader: BufReader<S>,
}

impl SmtpSession<TcpStream> {
    pub(crate) fn connect(
        addrs: &[SocketAddr],
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> io::Result<(Self, SocketAddr)> {
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(command_timeout))?;
                    stream.set_write_timeout(Some(command_timeout))?;
                    return Ok((Self::new(stream), *addr));
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no socket address available",
            )
        }))
    }
}

impl<S: Read + Write> SmtpSession<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    #[cfg(test)]
    pub(crate) fn stream(&self) -> &S {
        self.reader.get_ref()
    }

    pub(crate) fn send_command(&mut self, command: &str) -> io::Result<()> {
        tracing::debug!(command, "C:");
        let stream = self.reader.get_mut();
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        stream.write_all(&line)?;
        stream.flush()
    }

    pub(crate) fn command(&mut self, command: &str) -> io::Result<SmtpReply> {
        self.send_command(command)?;
        self.read_reply()
    }

    /// Best-effort `QUIT`; every failure is swallowed.
    pub(crate) fn quit(&mut self, await_reply: bool) {
        if self.send_command("QUIT").is_ok() && await_reply {
            let _ = self.read_reply();
        }
    }

    pub(crate) fn read_reply(&mut self) -> io::Result<SmtpReply> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            if message_lines.len() == MAX_REPLY_LINES {
                return Err(invalid_data(format!("SMTP reply exceeds {MAX_REPLY_LINES} lines")));
            }
            let raw = self.read_line()?;

            let parsed_code = raw
                .get(..3)
                .filter(|digits| digits.iter().all(u8::is_ascii_digit))
                .and_then(|digits| std::str::from_utf8(digits).ok())
                .and_then(|digits| digits.parse::<u16>().ok())
                .ok_or_else(|| {
                    invalid_data(format!(
                        "invalid SMTP reply: '{}'",
                        String::from_utf8_lossy(&raw)
                    ))
                })?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(invalid_data(format!(
                        "inconsistent SMTP reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let continuation = raw.get(3) == Some(&b'-');
            // reply text is informational; servers are not required to send UTF-8
            let text = raw.get(4..).unwrap_or_default();
            message_lines.push(String::from_utf8_lossy(text).into_owned());
            if !continuation {
                break;
            }
        }

        let reply = SmtpReply {
            code: code.ok_or_else(|| invalid_data("SMTP reply missing status code".into()))?,
            message: message_lines.join("\n"),
        };
        tracing::debug!(code = reply.code, message = %reply.message, "S:");
        Ok(reply)
    }

    /// One reply line without its CRLF, at most [`MAX_LINE_LEN`] octets.
    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut raw = Vec::new();
        let limit = MAX_LINE_LEN as u64;
        let bytes = (&mut self.reader).take(limit).read_until(b'\n', &mut raw)?;
        if bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        if raw.last() == Some(&b'\n') {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        } else if bytes == MAX_LINE_LEN {
            return Err(invalid_data(format!(
                "SMTP reply line exceeds {MAX_LINE_LEN} octets"
            )));
        }
        Ok(raw)
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
