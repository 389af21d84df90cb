//! Logical stream description.

use serde::Serialize;

use crate::opus::IdHeader;

/// Properties of the logical bitstream, fixed once the identification
/// header has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreamInfo {
    /// Bitstream serial number of the first page.
    pub serial: u32,
    /// Sample rate declared by the identification header.
    pub sample_rate: u32,
    pub channels: u8,
    pub pre_skip: u16,
    pub mapping_family: u8,
    pub version: u8,
    /// Output gain in Q7.8 dB.
    pub output_gain: i16,
}

impl StreamInfo {
    /// Combines the identification header with the stream serial number.
    pub fn new(serial: u32, head: &IdHeader) -> Self {
        Self {
            serial,
            sample_rate: head.sample_rate,
            channels: head.channels,
            pre_skip: head.pre_skip,
            mapping_family: head.mapping_family,
            version: head.version,
            output_gain: head.output_gain,
        }
    }

    /// Returns the output gain in dB.
    pub fn output_gain_db(&self) -> f32 {
        self.output_gain as f32 / 256.0
    }
}
