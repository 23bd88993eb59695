#[cfg(any(feature = "with-json", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};
use serde::Serialize;

use crate::args::Cli;
use mailprobe_lib::{AddressError, ValidationResult};

/// One report line: either a pipeline result or an input that could not be parsed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OutputRow {
    Checked(ValidationResult),
    Malformed {
        email: String,
        is_valid_format: bool,
        message: String,
    },
}

impl OutputRow {
    pub fn new(input: &str, result: Result<ValidationResult, AddressError>) -> Self {
        match result {
            Ok(result) => Self::Checked(result),
            Err(err) => Self::Malformed {
                email: input.to_string(),
                is_valid_format: false,
                message: format!("Invalid email format: {err}"),
            },
        }
    }

    pub fn passed(&self) -> bool {
        match self {
            Self::Checked(result) => result.passed(),
            Self::Malformed { .. } => false,
        }
    }

    fn email(&self) -> &str {
        match self {
            Self::Checked(result) => &result.email,
            Self::Malformed { email, .. } => email,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Checked(result) => &result.message,
            Self::Malformed { message, .. } => message,
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.passed())
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        for line in human_lines(row) {
            println!("{line}");
        }
    }
    Ok(())
}

fn human_lines(row: &OutputRow) -> Vec<String> {
    let tag = if row.passed() { "[OK]    " } else { "[FAILED]" };
    let mut lines = vec![format!("{tag} {} :: {}", row.email(), row.message())];

    if let OutputRow::Checked(result) = row {
        lines.push(format!(
            "        domain: {} (exists={}, blacklisted={}, role={})",
            result.domain, result.domain_exists, result.is_blacklisted, result.is_role_based
        ));
        if let Some(hosts) = &result.mx_hosts {
            lines.push(format!("        mx: {}", hosts.join(", ")));
        }
        match &result.probe_outcome {
            Some(outcome) => lines.push(format!("        smtp: {outcome}")),
            None => lines.push(format!("        smtp: {}", result.smtp_check_status)),
        }
    }
    lines
}

#[cfg(feature = "with-json")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-json"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json requires the 'with-json' feature")
}

#[cfg(feature = "with-json")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-json"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson requires the 'with-json' feature")
}

#[cfg(feature = "with-csv")]
const CSV_HEADER: [&str; 9] = [
    "email",
    "domain",
    "is_valid_format",
    "domain_exists",
    "is_blacklisted",
    "is_role_based",
    "smtp_check_status",
    "mx_hosts",
    "message",
];

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    match row {
        OutputRow::Checked(r) => vec![
            r.email.clone(),
            r.domain.clone(),
            r.is_valid_format.to_string(),
            r.domain_exists.to_string(),
            r.is_blacklisted.to_string(),
            r.is_role_based.to_string(),
            r.smtp_check_status.to_string(),
            r.mx_hosts.as_deref().map(|h| h.join("|")).unwrap_or_default(),
            r.message.clone(),
        ],
        OutputRow::Malformed { email, message, .. } => vec![
            email.clone(),
            String::new(),
            "false".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            message.clone(),
        ],
    }
}

#[cfg(any(feature = "with-json", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailprobe_lib::{EmailAddress, SmtpCheckStatus, Stage};

    fn unverified() -> ValidationResult {
        let address = EmailAddress::parse("user@example.com").unwrap();
        ValidationResult {
            email: address.original().to_string(),
            domain: address.domain().to_string(),
            is_valid_format: true,
            domain_exists: true,
            is_blacklisted: false,
            is_role_based: false,
            smtp_check_status: SmtpCheckStatus::Skipped,
            probe_outcome: None,
            mx_hosts: Some(vec!["mx1.example.com".into(), "mx2.example.com".into()]),
            message: "not verified".into(),
            decided_at: Stage::MxResolution,
        }
    }

    #[test]
    fn malformed_input_fails() {
        let row = OutputRow::new("nope", Err(AddressError::MissingAt));
        assert!(!row.passed());
        assert_eq!(
            human_lines(&row),
            vec!["[FAILED] nope :: Invalid email format: address must contain an '@'"]
        );
    }

    #[test]
    fn human_lines_for_unverified_address() {
        let row = OutputRow::new("user@example.com", Ok(unverified()));
        assert!(row.passed());
        assert!(!any_failed(std::slice::from_ref(&row)));
        assert_eq!(
            human_lines(&row),
            vec![
                "[OK]     user@example.com :: not verified",
                "        domain: example.com (exists=true, blacklisted=false, role=false)",
                "        mx: mx1.example.com, mx2.example.com",
                "        smtp: skipped",
            ]
        );
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_rows_match_header_width() {
        let checked = OutputRow::new("user@example.com", Ok(unverified()));
        let malformed = OutputRow::new("nope", Err(AddressError::MissingAt));
        assert_eq!(csv_record(&checked).len(), CSV_HEADER.len());
        assert_eq!(csv_record(&malformed).len(), CSV_HEADER.len());
        assert_eq!(csv_record(&checked)[7], "mx1.example.com|mx2.example.com");
    }
}
