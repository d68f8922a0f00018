//! Shared client core for the PGPT command protocol.
//!
//! Every command the server understands is a single JSON envelope written to
//! a fresh TCP connection, answered by a single response on that same
//! connection. This crate owns that exchange:
//!
//! - [`catalog`] describes each command's argument contract.
//! - [`envelope`] validates arguments and builds the wire object.
//! - [`transport`] dials the server, one connection per call.
//! - [`framing`] decides when the response has been fully received.
//! - [`decode`] turns the received bytes into a [`Response`].
//!
//! [`Client`] ties the pieces together.

pub mod arguments;
pub mod catalog;
mod client;
pub mod decode;
pub mod envelope;
mod error;
pub mod framing;
pub mod transport;

pub use arguments::{ArgumentValue, Arguments};
pub use catalog::{ArgKind, ArgSpec, ArgumentField, CommandDescriptor, ResponseKind, lookup};
pub use client::{Client, ClientOptions};
pub use decode::{Response, decode};
pub use envelope::Envelope;
pub use error::{ClientError, Phase, ValidationError};
pub use framing::{DEFAULT_CHUNK_SIZE, FrameMode, MAX_CHUNK_SIZE, ResponseReader};
pub use transport::{Dialer, ServerEndpoint, ServerEndpointParseError, TcpDialer};
