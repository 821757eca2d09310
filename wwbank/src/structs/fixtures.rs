//! In-memory soundbank and bitstream fixtures for tests.
//!
//! Record bodies use the simplest layout each decoder accepts: every optional
//! block absent, every skipped byte zero. Vorbis headers carry only the fields
//! packet timing looks at; the setup header body before the mode table is
//! filler.

use bitstream_io::{BitWrite, BitWriter, LittleEndian};
use ogg::writing::{PacketWriteEndInfo, PacketWriter};

use crate::structs::header::HircType;

#[derive(Debug, Default, Clone)]
pub(crate) struct Body(pub Vec<u8>);

impl Body {
    pub fn u8(mut self, value: u8) -> Self {
        self.0.push(value);
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn zeros(mut self, n: usize) -> Self {
        self.0.resize(self.0.len() + n, 0);
        self
    }

    pub fn ids(mut self, ids: &[u32]) -> Self {
        ids.iter().for_each(|id| self.0.extend_from_slice(&id.to_le_bytes()));
        self
    }

    pub fn id_list(self, ids: &[u32]) -> Self {
        self.u32(ids.len() as u32).ids(ids)
    }

    /// Prefixes the body with its record header.
    pub fn record(self, kind: HircType) -> Vec<u8> {
        let mut record = vec![kind.tag()];
        record.extend_from_slice(&(self.0.len() as u32).to_le_bytes());
        record.extend(self.0);
        record
    }
}

pub(crate) fn sound(self_id: u32, file_id: u32, owner_id: u32) -> Body {
    Body::default()
        .u32(self_id)
        .zeros(4)
        .u8(0)
        .u32(file_id)
        .u32(file_id)
        .zeros(8)
        .u32(owner_id)
}

pub(crate) fn event_action(self_id: u32, kind: u8, target: u32) -> Body {
    let body = Body::default().u32(self_id).u8(3).u8(kind);
    if kind == 25 {
        body.zeros(7).u32(target)
    } else {
        body.u32(target)
    }
}

pub(crate) fn event(self_id: u32, action_ids: &[u32]) -> Body {
    Body::default()
        .u32(self_id)
        .u8(action_ids.len() as u8)
        .ids(action_ids)
}

pub(crate) fn random_container(self_id: u32, owner_id: u32, sound_ids: &[u32]) -> Body {
    random_container_prefix(self_id, owner_id)
        .u8(0)
        .zeros(25)
        .id_list(sound_ids)
}

/// Everything up to and including the byte before the layout discriminant.
pub(crate) fn random_container_prefix(self_id: u32, owner_id: u32) -> Body {
    Body::default()
        .u32(self_id)
        .zeros(1)
        .u8(0)
        .zeros(5)
        .u32(owner_id)
        .zeros(1)
        .u8(0)
        .u8(0)
        .u8(0)
        .zeros(9)
}

pub(crate) fn music_container(self_id: u32, owner_id: u32, child_ids: &[u32]) -> Body {
    Body::default()
        .u32(self_id)
        .zeros(4)
        .u32(0)
        .u32(owner_id)
        .zeros(1)
        .u8(0)
        .u8(0)
        .u8(0)
        .zeros(9)
        .u8(0)
        .zeros(1)
        .id_list(child_ids)
}

pub(crate) fn music_track(self_id: u32, file_id: u32, container_id: u32) -> Body {
    Body::default()
        .u32(self_id)
        .zeros(10)
        .u32(file_id)
        .zeros(64)
        .u32(container_id)
}

/// Object section payload: declared count followed by the records.
pub(crate) fn section(declared: u32, records: &[Vec<u8>]) -> Vec<u8> {
    let mut section = declared.to_le_bytes().to_vec();
    records.iter().for_each(|r| section.extend_from_slice(r));
    section
}

pub(crate) fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = tag.to_vec();
    chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    chunk.extend_from_slice(payload);
    chunk
}

/// A bank holding a header chunk and the given object section.
pub(crate) fn bank(hirc: &[u8]) -> Vec<u8> {
    let mut bank = chunk(b"BKHD", &[0x86, 0, 0, 0, 0x2A, 0, 0, 0]);
    bank.extend(chunk(b"HIRC", hirc));
    bank
}

pub(crate) fn ident_header(exp_0: u8, exp_1: u8) -> Vec<u8> {
    let mut packet = vec![1];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.push(2);
    packet.extend_from_slice(&48000u32.to_le_bytes());
    packet.extend_from_slice(&[0; 12]);
    packet.push(exp_1 << 4 | exp_0);
    packet.push(1);
    packet
}

pub(crate) fn comment_header() -> Vec<u8> {
    let mut packet = vec![3];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&6u32.to_le_bytes());
    packet.extend_from_slice(b"fixtur");
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.push(1);
    packet
}

pub(crate) fn setup_header(mode_blockflags: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::endian(Vec::new(), LittleEndian);
    writer
        .write_unsigned_var::<u32>(6, mode_blockflags.len() as u32 - 1)
        .unwrap();
    for &long in mode_blockflags {
        writer.write_bit(long).unwrap();
        writer.write_unsigned_var::<u32>(16, 0).unwrap();
        writer.write_unsigned_var::<u32>(16, 0).unwrap();
        writer.write_unsigned_var::<u32>(8, 0).unwrap();
    }
    writer.write_bit(true).unwrap();
    writer.byte_align().unwrap();

    let mut packet = vec![5];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&[0xFF; 12]);
    packet.extend(writer.into_writer());
    packet
}

/// An audio packet using `mode`, for streams with up to four modes.
pub(crate) fn audio_packet(mode: u8) -> Vec<u8> {
    vec![mode << 1, 0x2A, 0x55]
}

pub(crate) const STREAM_SERIAL: u32 = 0x1234_5678;

/// Ogg stream with the three headers followed by `audio`. Granule positions
/// are deliberately wrong.
pub(crate) fn ogg_stream(mode_blockflags: &[bool], audio: &[Vec<u8>]) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut writer = PacketWriter::new(&mut data);
        let headers = [
            (ident_header(8, 11), PacketWriteEndInfo::EndPage),
            (comment_header(), PacketWriteEndInfo::NormalPacket),
            (setup_header(mode_blockflags), PacketWriteEndInfo::EndPage),
        ];
        for (packet, info) in headers {
            writer.write_packet(packet, STREAM_SERIAL, info, 0).unwrap();
        }

        for (i, packet) in audio.iter().enumerate() {
            let info = if i + 1 == audio.len() {
                PacketWriteEndInfo::EndStream
            } else {
                PacketWriteEndInfo::EndPage
            };
            writer
                .write_packet(packet.clone(), STREAM_SERIAL, info, 999_999)
                .unwrap();
        }
    }

    data
}

/// Audio packet of `len` bytes using `mode`.
pub(crate) fn sized_packet(mode: u8, len: usize) -> Vec<u8> {
    let mut packet = audio_packet(mode);
    packet.resize(len, 0x11);
    packet
}

/// Offsets of every capture pattern in `data`.
pub(crate) fn page_offsets(data: &[u8]) -> Vec<usize> {
    data.windows(4)
        .enumerate()
        .filter(|(_, w)| *w == b"OggS")
        .map(|(i, _)| i)
        .collect()
}
