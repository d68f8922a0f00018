//! Output format for the CLI's diagnostic log on stderr.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How `pgpt` renders tracing events on stderr.
///
/// Parsed from `--log-format`, `PGPT_LOG_FORMAT` or the `log_format` key,
/// ignoring ASCII case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    Json,
    /// One terse line per event.
    #[default]
    Compact,
}
