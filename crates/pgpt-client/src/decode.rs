//! Response decoding.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::catalog::ResponseKind;
use crate::error::ClientError;

/// A fully received server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The response parsed as JSON.
    Structured(Value),
    /// The response was not JSON; the bytes are kept unchanged.
    Text(Vec<u8>),
}

impl Response {
    /// JSON value, when the response was structured.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Text form of a raw response, replacing invalid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Structured(_) => None,
            Self::Text(bytes) => Some(String::from_utf8_lossy(bytes)),
        }
    }
}

/// Decodes `bytes` according to the call site's [`ResponseKind`].
///
/// Surrounding whitespace is ignored when parsing JSON. Text call sites fall
/// back to the raw bytes when parsing fails.
///
/// # Errors
///
/// Returns [`ClientError::Decode`], carrying the raw bytes, when a structured
/// response is not valid JSON.
pub fn decode(bytes: Vec<u8>, kind: ResponseKind) -> Result<Response, ClientError> {
    match serde_json::from_slice::<Value>(bytes.trim_ascii()) {
        Ok(value) => Ok(Response::Structured(value)),
        Err(source) => match kind {
            ResponseKind::Structured => Err(ClientError::Decode { source, raw: bytes }),
            ResponseKind::Text => {
                debug!(error = %source, bytes = bytes.len(), "passing response through as text");
                Ok(Response::Text(bytes))
            }
        },
    }
}
