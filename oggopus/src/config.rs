//! Demuxer configuration.

use serde::{Deserialize, Serialize};

/// Behaviour switches for [`crate::Demuxer`].
///
/// Deserializable so that tools can load it from a YAML or JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemuxerConfig {
    /// End the stream once the page flagged end-of-stream is drained,
    /// without reading further input.
    pub stop_at_eos: bool,

    /// Treat a gap in page sequence numbers as a format error instead of
    /// logging a warning.
    pub strict_sequence: bool,
}

impl Default for DemuxerConfig {
    fn default() -> Self {
        Self {
            stop_at_eos: true,
            strict_sequence: false,
        }
    }
}
