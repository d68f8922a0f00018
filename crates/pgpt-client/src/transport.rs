//! TCP transport helpers.
//!
//! Every call dials a fresh connection through a [`Dialer`]. The stream is
//! owned by the call and closed when it goes out of scope, whichever way the
//! call ends.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::{Host, Url};

/// Address of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    host: String,
    port: u16,
}

impl ServerEndpoint {
    /// Builds an endpoint from a host name or address and a port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ServerEndpoint {
    type Err = ServerEndpointParseError;

    /// Parses `tcp://host:port` or bare `host:port`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let url = if trimmed.contains("://") {
            Url::parse(trimmed)?
        } else {
            Url::parse(&format!("tcp://{trimmed}"))?
        };
        if url.scheme() != "tcp" {
            return Err(ServerEndpointParseError::UnsupportedScheme(
                url.scheme().to_owned(),
            ));
        }
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_owned(),
            Some(Host::Ipv4(address)) => address.to_string(),
            Some(Host::Ipv6(address)) => address.to_string(),
            None => return Err(ServerEndpointParseError::MissingHost(input.to_owned())),
        };
        let port = url
            .port()
            .ok_or_else(|| ServerEndpointParseError::MissingPort(input.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

/// Errors encountered while parsing a [`ServerEndpoint`] from text.
#[derive(Debug, Error)]
pub enum ServerEndpointParseError {
    /// Scheme other than `tcp`.
    #[error("unsupported server scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host was missing.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// Port was missing.
    #[error("missing port in '{0}'")]
    MissingPort(String),
    /// Text was not a valid address.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Opens the stream used for one exchange.
pub trait Dialer {
    /// Stream type produced by the dialer.
    type Stream: Read + Write;

    /// Connects to `endpoint`, arming `timeout` on the stream when set.
    ///
    /// # Errors
    ///
    /// Returns the resolution or connection failure.
    fn dial(&self, endpoint: &ServerEndpoint, timeout: Option<Duration>)
    -> io::Result<Self::Stream>;
}

/// Plain TCP dialer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    fn dial(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Option<Duration>,
    ) -> io::Result<Self::Stream> {
        let stream = match timeout {
            Some(limit) => connect_with_timeout(endpoint, limit)?,
            None => TcpStream::connect((endpoint.host(), endpoint.port()))?,
        };
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        debug!(%endpoint, peer = ?stream.peer_addr().ok(), "connected");
        Ok(stream)
    }
}

fn connect_with_timeout(endpoint: &ServerEndpoint, limit: Duration) -> io::Result<TcpStream> {
    let mut last_error = None;
    for address in resolve(endpoint)? {
        match TcpStream::connect_timeout(&address, limit) {
            Ok(stream) => return Ok(stream),
            Err(error) => last_error = Some(error),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
    }))
}

fn resolve(endpoint: &ServerEndpoint) -> io::Result<Vec<SocketAddr>> {
    Ok((endpoint.host(), endpoint.port()).to_socket_addrs()?.collect())
}
