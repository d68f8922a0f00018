//! Rendering of server responses on stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use pgpt_client::Response;

/// Output format selection for structured responses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `pretty` for terminal output and `json` for redirected output.
    Auto,
    /// Indented JSON.
    Pretty,
    /// Compact single-line JSON.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Indented JSON.
    Pretty,
    /// Compact single-line JSON.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Pretty,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Pretty => ResolvedOutputFormat::Pretty,
        }
    }
}

/// Writes `response` followed by a newline.
///
/// Text responses are written byte for byte; the format only affects JSON.
pub(crate) fn write_response<W: Write>(
    stdout: &mut W,
    response: &Response,
    format: ResolvedOutputFormat,
) -> io::Result<()> {
    match response {
        Response::Structured(value) => {
            match format {
                ResolvedOutputFormat::Pretty => serde_json::to_writer_pretty(&mut *stdout, value),
                ResolvedOutputFormat::Json => serde_json::to_writer(&mut *stdout, value),
            }
            .map_err(io::Error::from)?;
            stdout.write_all(b"\n")?;
        }
        Response::Text(bytes) => {
            stdout.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
        }
    }
    stdout.flush()
}
