//! Ogg Opus demuxing.
//!
//! This crate walks the page framing of an Ogg file carrying a single Opus
//! stream and hands out one Opus packet at a time:
//!
//! - `ogg`: page headers and packet lacing (RFC 3533)
//! - `opus`: identification/comment headers (RFC 7845) and TOC decoding (RFC 6716)
//! - `timing`: page durations from granule positions
//! - `demuxer`: the stateful reader tying them together
//!
//! Audio is never decoded and page checksums are never verified.
//!
//! # Example
//!
//! ```no_run
//! use giztoy_oggopus::Demuxer;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = BufReader::new(File::open("speech.opus")?);
//! let mut demuxer = Demuxer::open(file)?;
//! println!("{} Hz, {} channels", demuxer.stream_info().sample_rate, demuxer.stream_info().channels);
//!
//! while let Some(packet) = demuxer.next_packet()? {
//!     println!("{} bytes, {} ms", packet.data.len(), packet.info.duration_millis());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod demuxer;
pub mod error;
pub mod ogg;
pub mod opus;
pub mod stream;
pub mod timing;

pub use config::DemuxerConfig;
pub use demuxer::{Demuxer, OpusPacket, PacketRole, Packets, State};
pub use error::{ConfigError, Error, FormatError, Result};
pub use stream::StreamInfo;
