//! Record headers of the `HIRC` object section.
//!
//! Every object is preceded by a one-byte type tag and a little-endian `u32`
//! giving the length of the rest of the record. Decoders only ever see the
//! declared body, so whatever trailing fields they do not understand are
//! skipped implicitly.

use std::fmt::{Display, Formatter};

use log::trace;

use crate::structs::hirc::HircObjects;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::{OutOfBounds, RecordFault};

/// Upper bound on the declared length of a child id list.
///
/// A larger count almost always means the decoder went off the rails on an
/// undocumented field earlier in the record.
pub const MAX_CHILD_IDS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HircType {
    Sound,
    EventAction,
    Event,
    RandomContainer,
    MusicSegment,
    MusicTrack,
    MusicPlaylist,
    Other(u8),
}

impl From<u8> for HircType {
    fn from(value: u8) -> Self {
        match value {
            2 => HircType::Sound,
            3 => HircType::EventAction,
            4 => HircType::Event,
            5 => HircType::RandomContainer,
            10 => HircType::MusicSegment,
            11 => HircType::MusicTrack,
            13 => HircType::MusicPlaylist,
            other => HircType::Other(other),
        }
    }
}

impl HircType {
    pub fn tag(self) -> u8 {
        match self {
            HircType::Sound => 2,
            HircType::EventAction => 3,
            HircType::Event => 4,
            HircType::RandomContainer => 5,
            HircType::MusicSegment => 10,
            HircType::MusicTrack => 11,
            HircType::MusicPlaylist => 13,
            HircType::Other(tag) => tag,
        }
    }
}

impl Display for HircType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HircType::Sound => write!(f, "Sound"),
            HircType::EventAction => write!(f, "EventAction"),
            HircType::Event => write!(f, "Event"),
            HircType::RandomContainer => write!(f, "RandomContainer"),
            HircType::MusicSegment => write!(f, "MusicSegment"),
            HircType::MusicTrack => write!(f, "MusicTrack"),
            HircType::MusicPlaylist => write!(f, "MusicPlaylist"),
            HircType::Other(tag) => write!(f, "Type {tag}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub kind: HircType,
    pub length: u32,
}

impl RecordHeader {
    pub const SIZE: usize = 5;

    pub fn read(reader: &mut ByteCursor) -> Result<Self, OutOfBounds> {
        let header = Self {
            kind: reader.read_u8()?.into(),
            length: reader.read_u32()?,
        };

        trace!(
            "{} record at {:#X}, {} bytes",
            header.kind,
            reader.absolute(),
            header.length
        );

        Ok(header)
    }
}

/// Decoding strategy for one record type.
///
/// `reader` spans exactly the declared record body. Implementations read the
/// fields they know about and leave the rest alone.
pub trait HircRecord: Sized {
    const TYPE: HircType;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault>;

    /// Moves the decoded record into its collection.
    fn store(self, objects: &mut HircObjects);
}

/// Reads a `u32` count followed by that many `u32` ids.
pub(crate) fn read_id_list(reader: &mut ByteCursor) -> Result<Vec<u32>, RecordFault> {
    let count = reader.read_u32()?;
    if count > MAX_CHILD_IDS {
        return Err(RecordFault::TooManyIds {
            count,
            max: MAX_CHILD_IDS,
        });
    }

    Ok(reader.read_u32_vec(count as usize)?)
}

#[test]
fn type_tags_round_trip() {
    for tag in [2u8, 3, 4, 5, 10, 11, 13, 0, 7, 255] {
        assert_eq!(HircType::from(tag).tag(), tag);
    }
    assert_eq!(HircType::from(12), HircType::Other(12));
}
