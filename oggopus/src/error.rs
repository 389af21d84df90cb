//! Error types for the Ogg Opus demuxer.

use thiserror::Error;

/// Error type for demuxer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte stream does not follow Ogg or Opus framing.
    #[error("oggopus: format error: {0}")]
    Format(#[from] FormatError),

    /// Timing could not be derived from the granule positions.
    #[error("oggopus: config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error from the underlying reader.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed container or codec data.
///
/// Always fatal for the current parse: there is no resynchronization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad capture pattern {0:02x?}, expected \"OggS\"")]
    BadCapturePattern([u8; 4]),

    #[error("unsupported stream structure version {0}")]
    UnsupportedVersion(u8),

    #[error("bad header magic {found:?}, expected {expected:?}")]
    BadMagic {
        expected: &'static str,
        found: String,
    },

    #[error("{header} header too short: need {needed} bytes, have {actual}")]
    ShortHeader {
        header: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("stream truncated while reading {0}")]
    Truncated(&'static str),

    #[error("page {sequence} does not continue the pending packet")]
    MissingContinuation { sequence: u32 },

    #[error("page serial {found:#010x} does not match stream serial {expected:#010x}")]
    SerialMismatch { expected: u32, found: u32 },

    #[error("page sequence gap: expected {expected}, got {found}")]
    SequenceGap { expected: u32, found: u32 },

    #[error("empty packet has no TOC byte")]
    EmptyPacket,

    #[error("frame count code 3 requires a second byte")]
    MissingFrameCount,

    #[error("frame count code 3 declares zero frames")]
    ZeroFrameCount,

    #[error("demuxer stopped after an earlier format error")]
    Poisoned,
}

/// Timing computation failure. Fatal only for that computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample rate is zero")]
    ZeroSampleRate,

    #[error("granule position went backwards: {previous} -> {current}")]
    GranuleRegression { previous: u64, current: u64 },

    #[error("duration of {delta} samples at {sample_rate} Hz overflows u64 milliseconds")]
    DurationOverflow { delta: u64, sample_rate: u32 },
}

/// Result type for demuxer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this is a format error.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Returns true if this is a config error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
