//! Packet reassembly from page segment tables.
//!
//! A packet is the concatenation of consecutive lacing values: every value of
//! 255 means "more bytes follow", the first value below 255 ends the packet.
//! A packet whose last lacing value on a page is 255 continues on the next
//! page, which must carry the continuation flag.

use std::io::Read;

use tracing::{trace, warn};

use super::page::{PageHeader, read_full};
use crate::error::{FormatError, Result};

/// Maximum value of a single lacing entry.
pub const LACING_CONTINUE: u8 = 255;

/// One run of lacing values out of a segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Number of payload bytes covered by the run.
    pub len: usize,
    /// Segment index just past the run.
    pub next: usize,
    /// True if the run ended on a terminating (< 255) lacing value.
    pub complete: bool,
}

/// Applies the lacing rule to `table` starting at segment `start`.
///
/// Returns `None` when `start` is past the end of the table.
pub fn lace(table: &[u8], start: usize) -> Option<Span> {
    if start >= table.len() {
        return None;
    }
    let mut len = 0;
    let mut index = start;
    while index < table.len() {
        let value = table[index];
        len += value as usize;
        index += 1;
        if value < LACING_CONTINUE {
            return Some(Span {
                len,
                next: index,
                complete: true,
            });
        }
    }
    Some(Span {
        len,
        next: index,
        complete: false,
    })
}

/// Cursor over the current page's segment table.
///
/// Payload bytes are pulled from the reader one packet at a time, so the
/// reader must be positioned right after the page header of the current page.
///
/// A packet spanning pages is buffered whole until its final segment. There
/// is no size cap: a chain of continuation pages laced entirely with 255
/// grows the buffer by up to 65025 bytes per page, limited only by the input.
#[derive(Debug, Default)]
pub struct PacketReassembler {
    page: Option<PageHeader>,
    segment: usize,
    pending: Option<Vec<u8>>,
    orphan: bool,
}

impl PacketReassembler {
    /// Creates a reassembler with no current page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `page` the current page and resets the segment cursor.
    ///
    /// Fails if a packet is pending and the page does not continue it.
    pub fn start_page(&mut self, page: PageHeader) -> Result<()> {
        if self.pending.is_some() && !page.is_continuation() {
            return Err(FormatError::MissingContinuation {
                sequence: page.sequence,
            }
            .into());
        }
        self.orphan = page.is_continuation() && self.pending.is_none();
        self.segment = 0;
        self.page = Some(page);
        Ok(())
    }

    /// The page currently being consumed.
    pub fn page(&self) -> Option<&PageHeader> {
        self.page.as_ref()
    }

    /// Returns true if every segment of the current page has been consumed.
    pub fn is_exhausted(&self) -> bool {
        match &self.page {
            Some(page) => self.segment >= page.segment_count(),
            None => true,
        }
    }

    /// Returns true if a packet was left unfinished at the end of a page.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Reads the next packet completed on the current page.
    ///
    /// Returns `Ok(None)` at the end of the page. A packet that runs off the
    /// end of the page is kept pending and finished by the next page.
    pub fn read_packet<R: Read>(&mut self, reader: &mut R) -> Result<Option<Vec<u8>>> {
        loop {
            let Some(page) = &self.page else {
                return Ok(None);
            };
            let Some(span) = lace(&page.segment_table, self.segment) else {
                return Ok(None);
            };
            let sequence = page.sequence;
            self.segment = span.next;

            if self.orphan {
                // Tail of a packet whose head we never saw.
                self.orphan = false;
                warn!(sequence, bytes = span.len, "discarding orphaned continuation data");
                let mut skip = vec![0u8; span.len];
                if read_full(reader, &mut skip)? != span.len {
                    return Err(FormatError::Truncated("packet data").into());
                }
                continue;
            }

            let mut buf = self.pending.take().unwrap_or_default();
            let start = buf.len();
            buf.resize(start + span.len, 0);
            if read_full(reader, &mut buf[start..])? != span.len {
                return Err(FormatError::Truncated("packet data").into());
            }

            if span.complete {
                trace!(sequence, len = buf.len(), "packet complete");
                return Ok(Some(buf));
            }

            trace!(sequence, len = buf.len(), "packet continues on next page");
            self.pending = Some(buf);
            return Ok(None);
        }
    }
}
