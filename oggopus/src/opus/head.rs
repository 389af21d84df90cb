//! Opus identification header ("OpusHead"), RFC 7845 Section 5.1.

use serde::Serialize;

use crate::error::{FormatError, Result};
use crate::ogg::{le_u16, le_u32};

/// Magic signature of the identification header.
pub const OPUS_HEAD: &[u8; 8] = b"OpusHead";

/// Size of the header up to and including the mapping family byte.
const MIN_SIZE: usize = 19;

/// Mapping table bytes skipped when the mapping family is non-zero.
const MAPPING_TABLE_SIZE: usize = 4;

/// Parsed identification header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdHeader {
    pub version: u8,
    pub channels: u8,
    /// Samples (at 48 kHz) to discard from the decoder output.
    pub pre_skip: u16,
    /// Sample rate declared by the encoder input.
    pub sample_rate: u32,
    /// Output gain in Q7.8 dB.
    pub output_gain: i16,
    pub mapping_family: u8,
}

impl IdHeader {
    /// Parses an identification header packet.
    pub fn parse(data: &[u8]) -> Result<Self> {
        check_magic(data, OPUS_HEAD, "OpusHead")?;
        if data.len() < MIN_SIZE {
            return Err(short("OpusHead", MIN_SIZE, data.len()));
        }

        let header = IdHeader {
            version: data[8],
            channels: data[9],
            pre_skip: le_u16(&data[10..12]),
            sample_rate: le_u32(&data[12..16]),
            output_gain: le_u16(&data[16..18]) as i16,
            mapping_family: data[18],
        };

        if header.mapping_family != 0 && data.len() < MIN_SIZE + MAPPING_TABLE_SIZE {
            return Err(short("OpusHead", MIN_SIZE + MAPPING_TABLE_SIZE, data.len()));
        }

        Ok(header)
    }

    /// Number of header bytes consumed by [`IdHeader::parse`].
    pub fn consumed_len(&self) -> usize {
        if self.mapping_family != 0 {
            MIN_SIZE + MAPPING_TABLE_SIZE
        } else {
            MIN_SIZE
        }
    }
}

pub(crate) fn check_magic(data: &[u8], magic: &[u8; 8], name: &'static str) -> Result<()> {
    if data.len() < magic.len() || &data[..magic.len()] != magic {
        let found = &data[..data.len().min(magic.len())];
        return Err(FormatError::BadMagic {
            expected: name,
            found: String::from_utf8_lossy(found).into_owned(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn short(header: &'static str, needed: usize, actual: usize) -> crate::Error {
    FormatError::ShortHeader {
        header,
        needed,
        actual,
    }
    .into()
}
