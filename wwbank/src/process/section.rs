use log::{Level, debug, info, trace};

use crate::log_or_err;
use crate::structs::event::{Event, EventAction};
use crate::structs::header::{HircRecord, HircType, RecordHeader};
use crate::structs::hirc::HircObjects;
use crate::structs::music::{MusicPlaylist, MusicSegment, MusicTrack};
use crate::structs::random::RandomContainer;
use crate::structs::sound::Sound;
use crate::utils::cursor::ByteCursor;
use crate::utils::diagnostics::Diagnostics;
use crate::utils::errors::{FormatError, OutOfBounds, RecordError, RecordFault};

pub const BKHD: [u8; 4] = *b"BKHD";
pub const HIRC: [u8; 4] = *b"HIRC";
pub const DIDX: [u8; 4] = *b"DIDX";
pub const DATA: [u8; 4] = *b"DATA";

/// Location of one chunk payload inside a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub tag: [u8; 4],
    pub offset: usize,
    pub len: usize,
}

impl Section {
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    /// The chunk payload, if `bank` is the buffer this section was found in.
    pub fn payload<'a>(&self, bank: &'a [u8]) -> Result<&'a [u8], OutOfBounds> {
        self.offset
            .checked_add(self.len)
            .and_then(|end| bank.get(self.offset..end))
            .ok_or(OutOfBounds {
                offset: self.offset,
                needed: self.len,
                available: bank.len().saturating_sub(self.offset),
            })
    }
}

/// Walks the chunk list of a bank, front to back.
///
/// The first chunk must be `BKHD`. Iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    reader: ByteCursor<'a>,
    first: bool,
    failed: bool,
}

impl<'a> Sections<'a> {
    pub fn new(bank: &'a [u8]) -> Self {
        Self {
            reader: ByteCursor::new(bank),
            first: true,
            failed: false,
        }
    }

    fn read_next(&mut self) -> Result<Section, FormatError> {
        let tag = self.reader.read_array::<4>()?;
        if self.first && tag != BKHD {
            return Err(FormatError::BadMagic(tag));
        }
        self.first = false;

        let len = self.reader.read_u32()? as usize;
        let offset = self.reader.absolute();
        self.reader.skip(len)?;

        let section = Section { tag, offset, len };
        trace!("Chunk {} at {:#X}, {} bytes", section.name(), offset, len);

        Ok(section)
    }
}

impl Iterator for Sections<'_> {
    type Item = Result<Section, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || (self.reader.is_at_end() && !self.first) {
            return None;
        }

        let section = self.read_next();
        self.failed = section.is_err();

        Some(section)
    }
}

pub fn list_sections(bank: &[u8]) -> Result<Vec<Section>, FormatError> {
    Sections::new(bank).collect()
}

/// Finds the first chunk tagged `tag`. Chunks behind it are not inspected.
pub fn find_section(bank: &[u8], tag: &[u8; 4]) -> Result<Section, FormatError> {
    for section in Sections::new(bank) {
        let section = section?;
        if &section.tag == tag {
            return Ok(section);
        }
    }

    Err(FormatError::MissingSection(
        String::from_utf8_lossy(tag).into_owned(),
    ))
}

/// Result of decoding one object section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub objects: HircObjects,
    /// Records that were dropped. Non-empty means the decode soft-failed.
    pub diagnostics: Diagnostics<RecordError>,
    /// Object count declared by the section.
    pub declared: u32,
    /// Records of types that are not decoded, skipped by length.
    pub skipped: u32,
}

#[derive(Debug, Clone)]
pub struct DecoderState {
    pub fail_level: Level,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            fail_level: Level::Error,
        }
    }
}

/// Decodes the `HIRC` object section of a bank into typed collections.
///
/// Records that cannot be decoded are dropped and reported through
/// [`Decoded::diagnostics`]. With a fail level of [`Level::Warn`] the first
/// such record aborts the decode instead.
#[derive(Debug, Default)]
pub struct Decoder {
    state: DecoderState,
}

impl Decoder {
    /// Locates the object section of `bank` and decodes it.
    pub fn decode(&mut self, bank: &[u8]) -> Result<Decoded, FormatError> {
        let section = find_section(bank, &HIRC)?;
        debug!(
            "HIRC section at {:#X}, {} bytes",
            section.offset, section.len
        );

        self.decode_section(section.payload(bank)?, section.offset)
    }

    /// Decodes an object section payload. `base` is its offset in the bank,
    /// used only for diagnostics.
    pub fn decode_section(&mut self, section: &[u8], base: usize) -> Result<Decoded, FormatError> {
        let mut reader = ByteCursor::with_base(section, base);
        let mut decoded = Decoded {
            declared: reader.read_u32()?,
            ..Default::default()
        };

        let mut read = 0u32;
        while !reader.is_at_end() {
            let start = reader.absolute();
            let header = RecordHeader::read(&mut reader)?;
            let mut body = reader.take(header.length as usize)?;
            read += 1;

            let objects = &mut decoded.objects;
            let result = match header.kind {
                HircType::Sound => read_record::<Sound>(&mut body, objects),
                HircType::EventAction => read_record::<EventAction>(&mut body, objects),
                HircType::Event => read_record::<Event>(&mut body, objects),
                HircType::RandomContainer => read_record::<RandomContainer>(&mut body, objects),
                HircType::MusicSegment => read_record::<MusicSegment>(&mut body, objects),
                HircType::MusicTrack => read_record::<MusicTrack>(&mut body, objects),
                HircType::MusicPlaylist => read_record::<MusicPlaylist>(&mut body, objects),
                HircType::Other(_) => {
                    decoded.skipped += 1;
                    Ok(())
                }
            };

            if let Err(fault) = result {
                let err = RecordError {
                    kind: header.kind,
                    offset: start,
                    fault,
                };
                decoded
                    .diagnostics
                    .push(log_or_err!(self.state, Level::Warn, err));
            }
        }

        if read != decoded.declared {
            return Err(FormatError::ObjectCountMismatch {
                declared: decoded.declared,
                read,
            });
        }

        info!(
            "Decoded {} of {} objects ({} skipped by type, {} dropped)",
            decoded.objects.len(),
            decoded.declared,
            decoded.skipped,
            decoded.diagnostics.len()
        );

        Ok(decoded)
    }

    /// Sets the minimum log level at which a dropped record fails the decode.
    pub fn set_fail_level(&mut self, level: Level) {
        self.state.fail_level = level;
    }
}

fn read_record<T: HircRecord>(
    body: &mut ByteCursor,
    objects: &mut HircObjects,
) -> Result<(), RecordFault> {
    let record = T::read(body)?;
    trace!(
        "{} decoded, {} trailing bytes ignored",
        T::TYPE,
        body.remaining()
    );
    record.store(objects);

    Ok(())
}
