//! In-memory Ogg Opus stream builder for tests.

#![allow(dead_code)]

pub const CONTINUATION: u8 = 0x01;
pub const BOS: u8 = 0x02;
pub const EOS: u8 = 0x04;

/// Lacing values for a packet of `len` bytes that ends on this page.
pub fn lacing(len: usize) -> Vec<u8> {
    let mut table = vec![255u8; len / 255];
    table.push((len % 255) as u8);
    table
}

pub fn id_header(channels: u8, sample_rate: u32) -> Vec<u8> {
    let mut buf = b"OpusHead".to_vec();
    buf.push(1);
    buf.push(channels);
    buf.extend_from_slice(&3840u16.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.push(0);
    buf
}

pub fn comment_header(vendor: &[u8]) -> Vec<u8> {
    let mut buf = b"OpusTags".to_vec();
    buf.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    buf.extend_from_slice(vendor);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}

/// A packet of `len` bytes starting with `toc`.
pub fn audio_packet(toc: u8, len: usize) -> Vec<u8> {
    let mut buf = vec![toc];
    buf.extend((1..len).map(|i| i as u8));
    buf
}

/// Writes pages back to back, numbering them from 0.
pub struct OggBuilder {
    buf: Vec<u8>,
    serial: u32,
    sequence: u32,
}

impl OggBuilder {
    pub fn new(serial: u32) -> Self {
        Self {
            buf: Vec::new(),
            serial,
            sequence: 0,
        }
    }

    /// Builder with the identification and comment header pages written.
    pub fn with_headers(sample_rate: u32) -> Self {
        let mut b = Self::new(0x1234_5678);
        b.packet_page(BOS, 0, &id_header(2, sample_rate));
        b.packet_page(0, 0, &comment_header(b"giztoy"));
        b
    }

    /// Writes a page with an explicit segment table and body.
    pub fn page(&mut self, header_type: u8, granule: u64, table: &[u8], body: &[u8]) -> &mut Self {
        let sum: usize = table.iter().map(|&v| v as usize).sum();
        assert_eq!(sum, body.len(), "segment table does not describe body");
        self.raw_page(b"OggS", header_type, granule, self.serial, table, body)
    }

    /// Writes a page with arbitrary capture pattern and serial.
    pub fn raw_page(
        &mut self,
        capture: &[u8; 4],
        header_type: u8,
        granule: u64,
        serial: u32,
        table: &[u8],
        body: &[u8],
    ) -> &mut Self {
        self.buf.extend_from_slice(capture);
        self.buf.push(0);
        self.buf.push(header_type);
        self.buf.extend_from_slice(&granule.to_le_bytes());
        self.buf.extend_from_slice(&serial.to_le_bytes());
        self.buf.extend_from_slice(&self.sequence.to_le_bytes());
        // Checksum is not verified by the reader.
        self.buf.extend_from_slice(&[0u8; 4]);
        self.buf.push(table.len() as u8);
        self.buf.extend_from_slice(table);
        self.buf.extend_from_slice(body);
        self.sequence += 1;
        self
    }

    /// Writes one page holding exactly one complete packet.
    pub fn packet_page(&mut self, header_type: u8, granule: u64, packet: &[u8]) -> &mut Self {
        self.page(header_type, granule, &lacing(packet.len()), packet)
    }

    /// Writes one page holding several complete packets.
    pub fn packets_page(&mut self, header_type: u8, granule: u64, packets: &[Vec<u8>]) -> &mut Self {
        let mut table = Vec::new();
        let mut body = Vec::new();
        for p in packets {
            table.extend(lacing(p.len()));
            body.extend_from_slice(p);
        }
        self.page(header_type, granule, &table, &body)
    }

    pub fn skip_sequence(&mut self) -> &mut Self {
        self.sequence += 1;
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
