//! Error taxonomy for client calls.

use std::io;

use strum::Display;
use thiserror::Error;

use crate::catalog::ArgKind;

/// Stage of an exchange at which an I/O failure or timeout occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Establishing the TCP connection.
    Connect,
    /// Writing the request envelope.
    Send,
    /// Reading the response.
    Receive,
}

/// Problems detected before any network activity takes place.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The command name is not part of the catalog.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// The command is authenticated but no token was supplied.
    #[error("command '{command}' requires an authentication token")]
    MissingToken {
        /// Command being built.
        command: &'static str,
    },
    /// A required argument is absent or empty.
    #[error("command '{command}' requires argument '{argument}'")]
    MissingArgument {
        /// Command being built.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// An argument is not declared by the command.
    #[error("command '{command}' does not accept argument '{argument}'")]
    UnexpectedArgument {
        /// Command being built.
        command: &'static str,
        /// Name of the rejected argument.
        argument: String,
    },
    /// An argument value does not have the declared kind.
    #[error("argument '{argument}' of command '{command}' must be a {expected}")]
    ArgumentKind {
        /// Command being built.
        command: &'static str,
        /// Name of the offending argument.
        argument: &'static str,
        /// Kind declared in the catalog.
        expected: ArgKind,
    },
    /// No server host was configured.
    #[error("the server host must be provided")]
    MissingHost,
    /// No server port was configured.
    #[error("the server port must be provided")]
    MissingPort,
}

/// Errors surfaced by [`crate::Client::call`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request was rejected before dialling.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The transport could not be established.
    #[error("failed to connect to server at {endpoint}: {source}")]
    Connect {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Underlying transport failure.
        #[source]
        source: io::Error,
    },
    /// The envelope could not be serialised.
    #[error("failed to serialise command envelope: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing the envelope failed mid-exchange.
    #[error("failed to send request to server: {0}")]
    Send(#[source] io::Error),
    /// Reading the response failed mid-exchange.
    #[error("failed to read response from server: {0}")]
    Receive(#[source] io::Error),
    /// The response was not valid JSON where structure was required.
    #[error("failed to decode server response: {source}")]
    Decode {
        /// Parser failure.
        #[source]
        source: serde_json::Error,
        /// Bytes received from the server, kept for diagnostics.
        raw: Vec<u8>,
    },
    /// The configured deadline elapsed.
    #[error("timed out during {phase} with server at {endpoint}")]
    Timeout {
        /// Stage of the exchange that stalled.
        phase: Phase,
        /// Endpoint being talked to.
        endpoint: String,
    },
}

impl ClientError {
    /// Raw response bytes attached to a decode failure.
    #[must_use]
    pub fn raw_response(&self) -> Option<&[u8]> {
        match self {
            Self::Decode { raw, .. } => Some(raw.as_slice()),
            _ => None,
        }
    }

    /// Returns true when the call failed before any socket was opened.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Maps an I/O failure in `phase` onto the taxonomy.
    ///
    /// Socket timeouts report `WouldBlock` on Unix and `TimedOut` on Windows;
    /// both become [`ClientError::Timeout`] when a deadline is armed.
    pub(crate) fn from_io(phase: Phase, endpoint: &str, error: io::Error, deadline: bool) -> Self {
        let timed_out = matches!(
            error.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        );
        if deadline && timed_out {
            return Self::Timeout {
                phase,
                endpoint: endpoint.to_owned(),
            };
        }
        match phase {
            Phase::Connect => Self::Connect {
                endpoint: endpoint.to_owned(),
                source: error,
            },
            Phase::Send => Self::Send(error),
            Phase::Receive => Self::Receive(error),
        }
    }
}
