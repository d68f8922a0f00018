//! The generic call path shared by every command.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, debug_span};

use crate::arguments::Arguments;
use crate::decode::{Response, decode};
use crate::envelope::Envelope;
use crate::error::{ClientError, Phase};
use crate::framing::{DEFAULT_CHUNK_SIZE, FrameMode, ResponseReader};
use crate::transport::{Dialer, ServerEndpoint, TcpDialer};

/// Tunables applied to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Response framing rule.
    pub frame_mode: FrameMode,
    /// Bytes requested per read.
    pub chunk_size: usize,
    /// Deadline applied to dial, write and each read; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            frame_mode: FrameMode::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
        }
    }
}

impl ClientOptions {
    /// Sets the deadline; a zero duration disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|limit| !limit.is_zero());
        self
    }
}

/// Sends command envelopes to one server, one connection per call.
///
/// The client holds no connection state, so a shared reference can be used
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct Client<D = TcpDialer> {
    endpoint: ServerEndpoint,
    options: ClientOptions,
    dialer: D,
}

impl Client<TcpDialer> {
    /// Creates a client that dials `endpoint` over TCP.
    #[must_use]
    pub const fn new(endpoint: ServerEndpoint, options: ClientOptions) -> Self {
        Self::with_dialer(endpoint, options, TcpDialer)
    }
}

impl<D: Dialer> Client<D> {
    /// Creates a client that opens connections through `dialer`.
    #[must_use]
    pub const fn with_dialer(endpoint: ServerEndpoint, options: ClientOptions, dialer: D) -> Self {
        Self {
            endpoint,
            options,
            dialer,
        }
    }

    /// Endpoint every call dials.
    #[must_use]
    pub const fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// Options applied to every call.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Validates, sends and decodes one command.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] before any socket is opened when the
    /// envelope is invalid; otherwise propagates the first failure of
    /// [`Client::send`].
    pub fn call(
        &self,
        command: &str,
        token: Option<&str>,
        arguments: Arguments,
    ) -> Result<Response, ClientError> {
        let envelope = Envelope::build(command, token, arguments)?;
        self.send(&envelope)
    }

    /// Performs one exchange for an already validated envelope.
    ///
    /// The connection is dropped, and so closed, before this returns on every
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`], [`ClientError::Send`],
    /// [`ClientError::Receive`], [`ClientError::Timeout`] or
    /// [`ClientError::Decode`] depending on where the exchange failed.
    pub fn send(&self, envelope: &Envelope) -> Result<Response, ClientError> {
        let span = debug_span!("call", command = envelope.command(), endpoint = %self.endpoint);
        let _entered = span.enter();

        let payload = envelope.to_bytes(self.options.frame_mode)?;
        let endpoint = self.endpoint.to_string();
        let armed = self.options.timeout.is_some();

        let mut stream = self
            .dialer
            .dial(&self.endpoint, self.options.timeout)
            .map_err(|error| ClientError::from_io(Phase::Connect, &endpoint, error, armed))?;

        debug!(bytes = payload.len(), "sending request");
        stream
            .write_all(&payload)
            .and_then(|()| stream.flush())
            .map_err(|error| ClientError::from_io(Phase::Send, &endpoint, error, armed))?;

        let reader = ResponseReader::new(self.options.frame_mode, self.options.chunk_size);
        let body = reader
            .read_response(&mut stream)
            .map_err(|error| ClientError::from_io(Phase::Receive, &endpoint, error, armed))?;
        drop(stream);

        debug!(bytes = body.len(), "received response");
        decode(body, envelope.descriptor().response)
    }
}
