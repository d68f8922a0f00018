//! Response framing.
//!
//! The server writes its response without a length prefix or delimiter, so
//! the client has to guess when the message is complete. The historical rule
//! ([`FrameMode::ShortRead`]) treats any read shorter than the chunk size as
//! the final one. That guess misfires in two known ways:
//!
//! - a response whose length is an exact multiple of the chunk size needs one
//!   more read, which only returns once the server closes the connection;
//! - a server that flushes a short fragment mid-response gets truncated.
//!
//! [`FrameMode::EndOfStream`] avoids both at the cost of requiring the server
//! to close its side after responding.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::trace;

/// Chunk size used by every historical client.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest read buffer a [`ResponseReader`] allocates.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Rule used to decide that a response is complete.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FrameMode {
    /// Stop at end-of-stream or after a read shorter than the chunk size.
    #[default]
    ShortRead,
    /// Stop only at end-of-stream.
    EndOfStream,
    /// Terminate the request with `\n`; stop at end-of-stream or after a
    /// chunk containing `\n`.
    Newline,
}

/// Accumulates a response from a stream according to a [`FrameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseReader {
    mode: FrameMode,
    chunk_size: usize,
}

impl Default for ResponseReader {
    fn default() -> Self {
        Self::new(FrameMode::default(), DEFAULT_CHUNK_SIZE)
    }
}

impl ResponseReader {
    /// Creates a reader with `chunk_size` clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub const fn new(mode: FrameMode, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            1
        } else if chunk_size > MAX_CHUNK_SIZE {
            MAX_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self { mode, chunk_size }
    }

    /// Framing rule in use.
    #[must_use]
    pub const fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Bytes requested per read.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Reads from `source` until the framing rule reports completion.
    ///
    /// Interrupted reads are retried. Any other error discards what has been
    /// accumulated so far.
    ///
    /// # Errors
    ///
    /// Propagates the first non-interrupt I/O error from `source`.
    pub fn read_response<R>(&self, source: &mut R) -> io::Result<Vec<u8>>
    where
        R: Read + ?Sized,
    {
        let mut buffer = Vec::new();
        let mut chunk = vec![0_u8; self.chunk_size];
        loop {
            let count = match source.read(&mut chunk) {
                Ok(count) => count,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if count == 0 {
                trace!(total = buffer.len(), "end of stream");
                break;
            }
            let received = chunk.get(..count).unwrap_or_default();
            buffer.extend_from_slice(received);
            trace!(bytes = count, total = buffer.len(), "received chunk");
            if self.is_final(received) {
                break;
            }
        }
        Ok(buffer)
    }

    fn is_final(&self, received: &[u8]) -> bool {
        match self.mode {
            FrameMode::ShortRead => received.len() < self.chunk_size,
            FrameMode::EndOfStream => false,
            FrameMode::Newline => received.contains(&b'\n'),
        }
    }
}
