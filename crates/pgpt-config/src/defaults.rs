use pgpt_client::{DEFAULT_CHUNK_SIZE, FrameMode};

use crate::logging::LogFormat;

/// Default log filter expression.
///
/// Only warnings reach stderr by default so command output can be piped.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default response framing, compatible with every deployed server.
#[must_use]
pub const fn default_framing() -> FrameMode {
    FrameMode::ShortRead
}

/// Default bytes requested per read.
#[must_use]
pub const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
