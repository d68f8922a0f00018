//! Layered configuration for the pgpt client.
//!
//! Values are merged from built-in defaults, a `.pgpt.toml` file (or the file
//! named by `--config-path`), `PGPT_*` environment variables and command-line
//! flags, later layers winning. Every field is optional so that partial
//! layers merge cleanly; the accessors apply the defaults.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use pgpt_client::{ClientOptions, FrameMode, ServerEndpoint, ValidationError};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_chunk_size, default_framing, default_log_filter,
    default_log_format,
};
pub use logging::LogFormat;

/// Settings shared by every pgpt invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PGPT")]
pub struct Config {
    /// Host name or address of the server.
    pub server_ip: Option<String>,
    /// TCP port of the server.
    pub server_port: Option<u16>,
    /// Session token attached to authenticated commands.
    pub token: Option<String>,
    /// Response framing rule.
    pub framing: Option<FrameMode>,
    /// Bytes requested per read.
    pub chunk_size: Option<usize>,
    /// Deadline in milliseconds for each network operation; zero disables it.
    pub timeout_ms: Option<u64>,
    /// Tracing filter expression.
    pub log_filter: Option<String>,
    /// Log output format.
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Resolves the server address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingHost`] when the host is absent or
    /// blank and [`ValidationError::MissingPort`] when the port is absent or
    /// zero.
    pub fn server_endpoint(&self) -> Result<ServerEndpoint, ValidationError> {
        let host = self
            .server_ip
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(ValidationError::MissingHost)?;
        let port = self
            .server_port
            .filter(|port| *port != 0)
            .ok_or(ValidationError::MissingPort)?;
        Ok(ServerEndpoint::new(host, port))
    }

    /// Session token exactly as configured, unless it is blank.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }

    /// Response framing rule.
    #[must_use]
    pub fn framing(&self) -> FrameMode {
        self.framing.unwrap_or_else(default_framing)
    }

    /// Bytes requested per read.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or_else(default_chunk_size)
    }

    /// Per-operation deadline, `None` when unset or zero.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|millis| *millis != 0)
            .map(Duration::from_millis)
    }

    /// Client tunables derived from the merged layers.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            frame_mode: self.framing(),
            chunk_size: self.chunk_size(),
            timeout: None,
        }
        .with_timeout(self.timeout())
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }
}
