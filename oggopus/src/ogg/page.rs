//! Ogg page header parsing.

use std::io::{self, Read};

use tracing::trace;

use crate::error::{FormatError, Result};

/// Magic bytes for Ogg page header.
pub const CAPTURE_PATTERN: &[u8; 4] = b"OggS";

/// Size of the fixed part of a page header.
pub const HEADER_SIZE: usize = 27;

/// Granule position meaning "no packet finishes on this page".
pub const GRANULE_NONE: u64 = u64::MAX;

/// Header type flags.
pub mod flags {
    /// Continuation of previous packet.
    pub const CONTINUATION: u8 = 0x01;
    /// Beginning of stream.
    pub const BOS: u8 = 0x02;
    /// End of stream.
    pub const EOS: u8 = 0x04;
}

/// Ogg page header, including its segment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    /// Header type flags
    pub header_type: u8,
    /// Absolute granule position
    pub granule_position: u64,
    /// Stream serial number
    pub serial: u32,
    /// Page sequence number
    pub sequence: u32,
    /// CRC checksum, read but never verified
    pub checksum: u32,
    /// Segment table (lacing values)
    pub segment_table: Vec<u8>,
}

impl PageHeader {
    /// Reads the next page header and its segment table.
    ///
    /// Returns `Ok(None)` when the reader is exhausted before the first
    /// header byte. Running out of input anywhere later is a format error.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let mut header = [0u8; HEADER_SIZE];
        match read_full(reader, &mut header)? {
            0 => return Ok(None),
            HEADER_SIZE => {}
            _ => return Err(FormatError::Truncated("page header").into()),
        }

        let mut capture = [0u8; 4];
        capture.copy_from_slice(&header[0..4]);
        if &capture != CAPTURE_PATTERN {
            return Err(FormatError::BadCapturePattern(capture).into());
        }

        let version = header[4];
        if version != 0 {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        let header_type = header[5];
        let granule_position = le_u64(&header[6..14]);
        let serial = le_u32(&header[14..18]);
        let sequence = le_u32(&header[18..22]);
        // Checksum is kept for diagnostics only.
        let checksum = le_u32(&header[22..26]);
        let segments = header[26] as usize;

        let mut segment_table = vec![0u8; segments];
        if read_full(reader, &mut segment_table)? != segments {
            return Err(FormatError::Truncated("segment table").into());
        }

        let page = PageHeader {
            header_type,
            granule_position,
            serial,
            sequence,
            checksum,
            segment_table,
        };
        trace!(
            sequence,
            granule = granule_position,
            segments,
            payload = page.payload_len(),
            "read page header"
        );
        Ok(Some(page))
    }

    /// Number of lacing values in the segment table.
    pub fn segment_count(&self) -> usize {
        self.segment_table.len()
    }

    /// Total payload size: the sum of all lacing values.
    pub fn payload_len(&self) -> usize {
        self.segment_table.iter().map(|&s| s as usize).sum()
    }

    /// Returns true if this is a beginning-of-stream page.
    pub fn is_bos(&self) -> bool {
        (self.header_type & flags::BOS) != 0
    }

    /// Returns true if this is an end-of-stream page.
    pub fn is_eos(&self) -> bool {
        (self.header_type & flags::EOS) != 0
    }

    /// Returns true if the page starts with the tail of a previous packet.
    pub fn is_continuation(&self) -> bool {
        (self.header_type & flags::CONTINUATION) != 0
    }

    /// Returns the granule position, or `None` for the "no packet ends here" marker.
    pub fn granule(&self) -> Option<u64> {
        if self.granule_position == GRANULE_NONE {
            None
        } else {
            Some(self.granule_position)
        }
    }
}

/// Fills `buf` as far as the reader allows, returning the number of bytes read.
///
/// Unlike `read_exact`, a short count is reported instead of an error so callers
/// can tell a clean end of input from a truncated structure.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub(crate) fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

pub(crate) fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_u64(b: &[u8]) -> u64 {
    u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}
