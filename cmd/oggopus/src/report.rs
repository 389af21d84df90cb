//! Packet listing built from a demuxer run.

use std::io::Read;

use giztoy_oggopus::opus::{Bandwidth, ConfigurationMode};
use giztoy_oggopus::{Demuxer, OpusPacket, StreamInfo};
use serde::Serialize;

/// One line of the packet listing.
#[derive(Debug, Serialize)]
pub struct PacketRecord {
    pub index: usize,
    pub page: u32,
    pub granule: u64,
    pub bytes: usize,
    pub config: u8,
    pub mode: ConfigurationMode,
    pub bandwidth: Bandwidth,
    pub stereo: bool,
    pub frames: u8,
    pub frame_ms: f64,
    pub duration_ms: f64,
    pub samples_48k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_duration_ms: Option<u64>,
}

impl PacketRecord {
    fn new(index: usize, packet: &OpusPacket) -> Self {
        let config = packet.info.configuration();
        Self {
            index,
            page: packet.page_sequence,
            granule: packet.granule_position,
            bytes: packet.data.len(),
            config: config.0,
            mode: config.mode(),
            bandwidth: config.bandwidth(),
            stereo: packet.info.is_stereo(),
            frames: packet.info.frame_count,
            frame_ms: packet.info.frame_duration().millis(),
            duration_ms: packet.info.duration_millis(),
            samples_48k: packet.info.samples_48k(),
            page_duration_ms: packet.page_duration_ms,
        }
    }
}

/// Summary of a whole stream.
#[derive(Debug, Serialize)]
pub struct Report {
    pub stream: StreamInfo,
    pub output_gain_db: f32,
    pub total_packets: usize,
    pub total_duration_ms: f64,
    pub packets: Vec<PacketRecord>,
}

impl Report {
    /// Drains `demuxer`, keeping at most `limit` packet records.
    pub fn collect<R: Read>(demuxer: &mut Demuxer<R>, limit: Option<usize>) -> giztoy_oggopus::Result<Self> {
        let stream = *demuxer.stream_info();
        let mut packets = Vec::new();
        let mut total_packets = 0;
        let mut total_duration_ms = 0.0;

        for packet in demuxer.packets() {
            let packet = packet?;
            if limit.is_none_or(|max| packets.len() < max) {
                packets.push(PacketRecord::new(total_packets, &packet));
            }
            total_packets += 1;
            total_duration_ms += packet.info.duration_millis();
        }

        Ok(Self {
            stream,
            output_gain_db: stream.output_gain_db(),
            total_packets,
            total_duration_ms,
            packets,
        })
    }
}
