//! Opus-in-Ogg mapping.
//!
//! Header packets as defined in RFC 7845 and the TOC byte of audio packets
//! as defined in RFC 6716. Nothing here decodes audio.

mod head;
mod tags;
mod toc;

pub use head::{IdHeader, OPUS_HEAD};
pub use tags::{OPUS_TAGS, parse_comment_header};
pub use toc::*;
