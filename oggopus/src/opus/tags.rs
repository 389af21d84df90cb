//! Opus comment header ("OpusTags"), RFC 7845 Section 5.2.
//!
//! The header is validated and measured, never retained.

use super::head::{check_magic, short};
use crate::error::Result;
use crate::ogg::le_u32;

/// Magic signature of the comment header.
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Validates a comment header packet and returns the number of bytes it
/// declares: magic, vendor string and one length-prefixed comment block.
///
/// Bytes after the returned length are left for the caller to discard.
pub fn parse_comment_header(data: &[u8]) -> Result<usize> {
    check_magic(data, OPUS_TAGS, "OpusTags")?;
    let mut pos = OPUS_TAGS.len();

    let vendor_len = read_len(data, pos)?;
    pos += 4;
    pos = skip(data, pos, vendor_len)?;

    let block_len = read_len(data, pos)?;
    pos += 4;
    pos = skip(data, pos, block_len)?;

    Ok(pos)
}

fn read_len(data: &[u8], pos: usize) -> Result<usize> {
    if data.len() < pos + 4 {
        return Err(short("OpusTags", pos + 4, data.len()));
    }
    Ok(le_u32(&data[pos..pos + 4]) as usize)
}

fn skip(data: &[u8], pos: usize, len: usize) -> Result<usize> {
    let end = pos.saturating_add(len);
    if data.len() < end {
        return Err(short("OpusTags", end, data.len()));
    }
    Ok(end)
}
