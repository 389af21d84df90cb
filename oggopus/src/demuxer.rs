//! Pull-based Ogg Opus demuxer.

use std::io::Read;

use tracing::{debug, trace, warn};

use crate::config::DemuxerConfig;
use crate::error::{Error, FormatError, Result};
use crate::ogg::{PacketReassembler, PageHeader};
use crate::opus::{FrameInfo, IdHeader, parse_comment_header};
use crate::stream::StreamInfo;
use crate::timing::TimingTracker;

/// Demuxer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing read yet.
    Unopened,
    /// Identification header parsed.
    IdHeaderRead,
    /// Comment header parsed.
    CommentHeaderRead,
    /// Returning audio packets.
    Streaming,
    /// Input ended cleanly at a page boundary.
    EndOfStream,
    /// A previous call failed; the read position is unknown.
    Failed,
}

/// What a logical packet is expected to be, given how far the stream got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketRole {
    Identification,
    Comment,
    Audio,
}

impl PacketRole {
    fn for_state(state: State) -> Self {
        match state {
            State::Unopened => Self::Identification,
            State::IdHeaderRead => Self::Comment,
            State::CommentHeaderRead | State::Streaming | State::EndOfStream | State::Failed => {
                Self::Audio
            }
        }
    }
}

/// One Opus packet with its decoded frame layout.
#[derive(Debug, Clone, PartialEq)]
pub struct OpusPacket {
    pub data: Vec<u8>,
    pub info: FrameInfo,
    /// Granule position of the page on which the packet ends.
    pub granule_position: u64,
    /// Sequence number of the page on which the packet ends.
    pub page_sequence: u32,
    /// Duration of that page, if it could be computed.
    pub page_duration_ms: Option<u64>,
}

enum Step {
    Consumed,
    Packet(OpusPacket),
    End,
}

/// Reads Opus packets from a single-stream Ogg file.
///
/// All parse state lives here; callers must not share one demuxer between
/// threads without serializing access.
pub struct Demuxer<R: Read> {
    reader: R,
    config: DemuxerConfig,
    state: State,
    info: StreamInfo,
    serial: Option<u32>,
    next_sequence: Option<u32>,
    lacing: PacketReassembler,
    timing: TimingTracker,
}

impl<R: Read> Demuxer<R> {
    /// Opens a stream with the default configuration.
    ///
    /// Consumes the identification and comment header packets.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with(reader, DemuxerConfig::default())
    }

    /// Opens a stream with an explicit configuration.
    pub fn open_with(reader: R, config: DemuxerConfig) -> Result<Self> {
        let mut demuxer = Self {
            reader,
            config,
            state: State::Unopened,
            info: StreamInfo::default(),
            serial: None,
            next_sequence: None,
            lacing: PacketReassembler::new(),
            timing: TimingTracker::new(),
        };

        while demuxer.state != State::CommentHeaderRead {
            demuxer.step()?;
        }
        demuxer.state = State::Streaming;
        debug!(
            serial = demuxer.info.serial,
            sample_rate = demuxer.info.sample_rate,
            channels = demuxer.info.channels,
            pre_skip = demuxer.info.pre_skip,
            "opened ogg opus stream"
        );
        Ok(demuxer)
    }

    /// Returns the next audio packet, or `Ok(None)` at end of stream.
    ///
    /// After an error every further call fails with [`FormatError::Poisoned`].
    pub fn next_packet(&mut self) -> Result<Option<OpusPacket>> {
        match self.state {
            State::Failed => return Err(FormatError::Poisoned.into()),
            State::EndOfStream => return Ok(None),
            _ => {}
        }

        loop {
            match self.step() {
                Ok(Step::Consumed) => continue,
                Ok(Step::Packet(packet)) => return Ok(Some(packet)),
                Ok(Step::End) => {
                    debug!("end of stream");
                    self.state = State::EndOfStream;
                    return Ok(None);
                }
                Err(e) => {
                    self.state = State::Failed;
                    return Err(e);
                }
            }
        }
    }

    /// Returns an iterator over the remaining audio packets.
    pub fn packets(&mut self) -> Packets<'_, R> {
        Packets {
            demuxer: self,
            done: false,
        }
    }

    /// Stream properties from the identification header.
    pub fn stream_info(&self) -> &StreamInfo {
        &self.info
    }

    /// Current demuxer state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Duration of the current page in milliseconds.
    ///
    /// `Ok(None)` if the page carries no granule position.
    pub fn page_duration(&self) -> Result<Option<u64>> {
        match self.timing.last() {
            Some(Ok(ms)) => Ok(Some(*ms)),
            Some(Err(e)) => Err(Error::Config(e.clone())),
            None => Ok(None),
        }
    }

    /// Granule delta (samples) between the current page and the one before.
    pub fn current_samples(&self) -> u64 {
        self.timing.current_samples()
    }

    /// Header of the page currently being consumed.
    pub fn current_page(&self) -> Option<&PageHeader> {
        self.lacing.page()
    }

    /// Returns the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn step(&mut self) -> Result<Step> {
        let role = PacketRole::for_state(self.state);
        let Some(data) = self.read_raw_packet()? else {
            return match role {
                PacketRole::Audio => Ok(Step::End),
                PacketRole::Identification | PacketRole::Comment => {
                    Err(FormatError::Truncated("stream headers").into())
                }
            };
        };

        match role {
            PacketRole::Identification => {
                let head = IdHeader::parse(&data)?;
                trace!(consumed = head.consumed_len(), len = data.len(), "parsed identification header");
                self.info = StreamInfo::new(self.serial.unwrap_or_default(), &head);
                self.state = State::IdHeaderRead;
                Ok(Step::Consumed)
            }
            PacketRole::Comment => {
                let consumed = parse_comment_header(&data)?;
                trace!(consumed, discarded = data.len() - consumed, "skipped comment header");
                self.state = State::CommentHeaderRead;
                Ok(Step::Consumed)
            }
            PacketRole::Audio => {
                if data.is_empty() {
                    trace!("skipping empty packet");
                    return Ok(Step::Consumed);
                }
                let info = FrameInfo::from_packet(&data)?;
                let (granule_position, page_sequence) = self
                    .lacing
                    .page()
                    .map(|p| (p.granule_position, p.sequence))
                    .unwrap_or_default();
                let page_duration_ms = match self.timing.last() {
                    Some(Ok(ms)) => Some(*ms),
                    _ => None,
                };
                trace!(len = data.len(), toc = %info.toc, frames = info.frame_count, "audio packet");
                Ok(Step::Packet(OpusPacket {
                    data,
                    info,
                    granule_position,
                    page_sequence,
                    page_duration_ms,
                }))
            }
        }
    }

    /// Reads the next logical packet, pulling in pages as needed.
    ///
    /// `Ok(None)` when the input ends at a page boundary with no pending packet.
    fn read_raw_packet(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if let Some(packet) = self.lacing.read_packet(&mut self.reader)? {
                return Ok(Some(packet));
            }

            let at_eos = self.lacing.page().is_some_and(|p| p.is_eos());
            if at_eos && self.config.stop_at_eos {
                if self.lacing.has_pending() {
                    return Err(FormatError::Truncated("packet at end of stream").into());
                }
                return Ok(None);
            }

            match PageHeader::read(&mut self.reader)? {
                Some(page) => self.begin_page(page)?,
                None => {
                    if self.lacing.has_pending() {
                        return Err(FormatError::Truncated("packet at end of input").into());
                    }
                    return Ok(None);
                }
            }
        }
    }

    fn begin_page(&mut self, page: PageHeader) -> Result<()> {
        match self.serial {
            None => self.serial = Some(page.serial),
            Some(expected) if expected != page.serial => {
                return Err(FormatError::SerialMismatch {
                    expected,
                    found: page.serial,
                }
                .into());
            }
            Some(_) => {}
        }

        if let Some(expected) = self.next_sequence {
            if page.sequence != expected {
                if self.config.strict_sequence {
                    return Err(FormatError::SequenceGap {
                        expected,
                        found: page.sequence,
                    }
                    .into());
                }
                warn!(expected, found = page.sequence, "page sequence gap");
            }
        }
        self.next_sequence = Some(page.sequence.wrapping_add(1));

        // The sample rate is unknown until the identification header is parsed.
        if self.state != State::Unopened {
            match page.granule() {
                Some(granule) => {
                    if let Err(e) = self.timing.observe(granule, self.info.sample_rate) {
                        warn!(sequence = page.sequence, error = %e, "page duration unavailable");
                    }
                }
                None => self.timing.observe_unknown(),
            }
        }

        debug!(
            sequence = page.sequence,
            granule = page.granule_position,
            segments = page.segment_count(),
            payload = page.payload_len(),
            continued = page.is_continuation(),
            eos = page.is_eos(),
            "ogg page"
        );
        self.lacing.start_page(page)
    }
}

/// Iterator over the audio packets of a [`Demuxer`].
pub struct Packets<'a, R: Read> {
    demuxer: &'a mut Demuxer<R>,
    done: bool,
}

impl<R: Read> Iterator for Packets<'_, R> {
    type Item = Result<OpusPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.demuxer.next_packet() {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
