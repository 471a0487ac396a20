use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Error,
}

/// Printed on stdout instead of stats when a command fails
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            status: Status::Error,
            message: format!("{err:#}"),
        }
    }
}

pub fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        risk_protocol::serialize_json_pretty(value)?
    } else {
        risk_protocol::serialize_json(value)?
    };
    print_stdout(&text)
}
