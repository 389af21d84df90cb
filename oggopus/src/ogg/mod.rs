//! Ogg container framing.
//!
//! This module implements the page and lacing layer of the Ogg bitstream
//! format as defined in RFC 3533. Checksums are read but not verified.

mod packet;
mod page;

pub use packet::*;
pub use page::*;
