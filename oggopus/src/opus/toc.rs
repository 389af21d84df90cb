//! Opus TOC (Table of Contents) decoding.
//!
//! Implements RFC 6716 Section 3.1, plus the frame count byte of code 3
//! packets from Section 3.2.5.

use std::time::Duration;

use serde::Serialize;

use crate::error::{FormatError, Result};

/// Samples per millisecond at the Opus internal rate of 48 kHz.
pub const SAMPLES_PER_MS_48K: u32 = 48;

/// Frame length in microseconds, indexed by configuration number.
const FRAME_MICROS: [u32; 32] = [
    // SILK NB, MB, WB
    10_000, 20_000, 40_000, 60_000,
    10_000, 20_000, 40_000, 60_000,
    10_000, 20_000, 40_000, 60_000,
    // Hybrid SWB, FB
    10_000, 20_000,
    10_000, 20_000,
    // CELT NB, WB, SWB, FB
    2_500, 5_000, 10_000, 20_000,
    2_500, 5_000, 10_000, 20_000,
    2_500, 5_000, 10_000, 20_000,
    2_500, 5_000, 10_000, 20_000,
];

/// TOC byte from an Opus packet header.
///
/// ```text
///          0 1 2 3 4 5 6 7
///         +-+-+-+-+-+-+-+-+
///         | config  |s| c |
///         +-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TOC(pub u8);

impl TOC {
    pub const fn new(byte: u8) -> Self {
        Self(byte)
    }

    pub fn configuration(&self) -> Configuration {
        Configuration(self.0 >> 3)
    }

    pub fn is_stereo(&self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn frame_code(&self) -> FrameCode {
        match self.0 & 0x03 {
            0 => FrameCode::Single,
            1 => FrameCode::EqualPair,
            2 => FrameCode::SizedPair,
            _ => FrameCode::Counted,
        }
    }
}

impl std::fmt::Display for TOC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.configuration();
        write!(
            f,
            "config={} {:?}/{:?} {}ms stereo={} code={}",
            config.0,
            config.mode(),
            config.bandwidth(),
            config.frame_duration().millis(),
            self.is_stereo(),
            self.frame_code().bits(),
        )
    }
}

/// Splits a TOC byte into (configuration number, stereo flag, frame count code).
pub fn decode_toc(byte: u8) -> (u8, bool, u8) {
    let toc = TOC::new(byte);
    (toc.configuration().0, toc.is_stereo(), toc.frame_code().bits())
}

/// Opus configuration number (0-31).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration(pub u8);

impl Configuration {
    pub fn mode(&self) -> ConfigurationMode {
        match self.0 {
            0..=11 => ConfigurationMode::Silk,
            12..=15 => ConfigurationMode::Hybrid,
            _ => ConfigurationMode::Celt,
        }
    }

    pub fn bandwidth(&self) -> Bandwidth {
        match self.0 {
            0..=3 | 16..=19 => Bandwidth::Narrow,
            4..=7 => Bandwidth::Medium,
            8..=11 | 20..=23 => Bandwidth::Wide,
            12..=13 | 24..=27 => Bandwidth::SuperWide,
            _ => Bandwidth::Full,
        }
    }

    /// Duration of one frame.
    pub fn frame_duration(&self) -> FrameDuration {
        FrameDuration(FRAME_MICROS[(self.0 & 0x1F) as usize])
    }
}

/// Coding mode selected by the configuration number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationMode {
    Silk,
    Hybrid,
    Celt,
}

/// Coded audio bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// 4 kHz
    Narrow,
    /// 6 kHz
    Medium,
    /// 8 kHz
    Wide,
    /// 12 kHz
    SuperWide,
    /// 20 kHz
    Full,
}

/// Low two bits of the TOC: how many frames the packet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCode {
    Single,
    /// Two frames of the same compressed size.
    EqualPair,
    /// Two frames, the first size coded explicitly.
    SizedPair,
    /// Count given by the byte after the TOC.
    Counted,
}

impl FrameCode {
    pub fn bits(&self) -> u8 {
        match self {
            Self::Single => 0,
            Self::EqualPair => 1,
            Self::SizedPair => 2,
            Self::Counted => 3,
        }
    }
}

/// Length of one frame, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameDuration(pub u32);

impl FrameDuration {
    pub fn micros(&self) -> u32 {
        self.0
    }

    /// Duration in milliseconds; 2.5 for the shortest CELT frames.
    pub fn millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn samples_48k(&self) -> u32 {
        self.0 * SAMPLES_PER_MS_48K / 1000
    }

    pub fn duration(&self) -> Duration {
        Duration::from_micros(self.0 as u64)
    }
}

/// Extracts the frame count from the byte following a code 3 TOC.
///
/// Bit 7 is the VBR flag and bit 6 the padding flag; neither affects timing.
pub fn parse_frame_count_byte(byte: u8) -> u8 {
    byte & 0x3F
}

/// Frame layout of one Opus packet, derived from its TOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub toc: TOC,
    pub frame_count: u8,
}

impl FrameInfo {
    /// Decodes the TOC (and for code 3, the frame count byte) of `packet`.
    pub fn from_packet(packet: &[u8]) -> Result<Self> {
        let Some(&first) = packet.first() else {
            return Err(FormatError::EmptyPacket.into());
        };
        let toc = TOC::new(first);
        let frame_count = match toc.frame_code() {
            FrameCode::Single => 1,
            FrameCode::EqualPair | FrameCode::SizedPair => 2,
            FrameCode::Counted => {
                let Some(&count_byte) = packet.get(1) else {
                    return Err(FormatError::MissingFrameCount.into());
                };
                match parse_frame_count_byte(count_byte) {
                    0 => return Err(FormatError::ZeroFrameCount.into()),
                    n => n,
                }
            }
        };
        Ok(Self { toc, frame_count })
    }

    pub fn configuration(&self) -> Configuration {
        self.toc.configuration()
    }

    pub fn is_stereo(&self) -> bool {
        self.toc.is_stereo()
    }

    /// Duration of a single frame.
    pub fn frame_duration(&self) -> FrameDuration {
        self.configuration().frame_duration()
    }

    /// Total packet duration.
    pub fn duration(&self) -> Duration {
        self.frame_duration().duration() * self.frame_count as u32
    }

    pub fn duration_millis(&self) -> f64 {
        self.frame_duration().millis() * self.frame_count as f64
    }

    /// Samples in the packet at 48 kHz.
    pub fn samples_48k(&self) -> u32 {
        self.frame_duration().samples_48k() * self.frame_count as u32
    }
}
