use crate::structs::header::HircType;

#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        let err = $err;
        if $level <= $state.fail_level {
            return Err(err.into());
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", err),
                ::log::Level::Warn => ::log::warn!("{}", err),
                ::log::Level::Info => ::log::info!("{}", err),
                ::log::Level::Debug => ::log::debug!("{}", err),
                ::log::Level::Trace => ::log::trace!("{}", err),
            }
        }
        err
    }};
}

/// A read that would cross the end of the slice being decoded.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("needed {needed} bytes at offset {offset:#X}, only {available} available")]
pub struct OutOfBounds {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Bank does not start with a BKHD chunk. Read {0:02X?}")]
    BadMagic([u8; 4]),

    #[error("Section {0} not found in bank")]
    MissingSection(String),

    #[error("Truncated input: {0}")]
    Truncated(#[from] OutOfBounds),

    #[error("Object count mismatch: section declares {declared}, read {read}")]
    ObjectCountMismatch { declared: u32, read: u32 },

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Why a single record could not be decoded.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFault {
    #[error("fields run past the declared record end ({0})")]
    Overrun(#[from] OutOfBounds),

    #[error("declared {count} child ids, at most {max} are accepted")]
    TooManyIds { count: u32, max: u32 },

    #[error("unsupported layout: {field} = {value}")]
    UnsupportedLayout { field: &'static str, value: u8 },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} record at {offset:#X} skipped: {fault}")]
pub struct RecordError {
    pub kind: HircType,
    pub offset: usize,
    pub fault: RecordFault,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BitstreamWarning {
    #[error("Corrupted or missing data in bitstream: {0}")]
    CorruptPage(String),

    #[error("Bitstream ends inside a page: {0}")]
    TruncatedPage(String),

    #[error("Lost sync at {offset:#X}, skipped {skipped} bytes")]
    LostSync { offset: usize, skipped: usize },

    #[error("Stream {serial:#010X} jumps from page {expected} to page {found}")]
    MissingPage {
        serial: u32,
        expected: u32,
        found: u32,
    },

    #[error("Packet {index} is a header packet inside the audio stream")]
    UnexpectedHeader { index: u64 },

    #[error("Packet {index} uses mode {mode}, only {modes} modes are defined")]
    InvalidMode { index: u64, mode: u32, modes: usize },

    #[error("Packet {index} belongs to stream {found:#010X}, expected {expected:#010X}")]
    ForeignStream {
        index: u64,
        found: u32,
        expected: u32,
    },

    #[error("Giving up after {0} consecutive read errors")]
    TooManyErrors(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum VorbisHeaderError {
    #[error("Expected packet type {expected}, found {found}")]
    PacketType { expected: u8, found: u8 },

    #[error("Missing \"vorbis\" signature")]
    Signature,

    #[error("Unsupported vorbis_version {0}")]
    Version(u32),

    #[error("Invalid audio_channels or audio_sample_rate ({channels} channels, {rate} Hz)")]
    StreamParameters { channels: u8, rate: u32 },

    #[error("Invalid blocksizes: blocksize_0 = 2^{0}, blocksize_1 = 2^{1}")]
    Blocksizes(u8, u8),

    #[error("Framing bit not set")]
    Framing,

    #[error("Mode configuration not found in setup header")]
    ModesNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum RepairError {
    #[error("Input is not an Ogg stream: {0}")]
    NotOgg(String),

    #[error("Headers are damaged, file is probably truncated: no {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid {which} header: {source}")]
    InvalidHeader {
        which: &'static str,
        #[source]
        source: VorbisHeaderError,
    },

    #[error(transparent)]
    Warning(#[from] BitstreamWarning),

    #[error("Cannot write page to output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid WPK magic. Read {0:02X?}, expected \"r3d2\"")]
    BadMagic([u8; 4]),

    #[error("Not a soundbank or WPK archive. Read {0:02X?}")]
    UnknownContainer([u8; 4]),

    #[error("Truncated archive: {0}")]
    Truncated(#[from] OutOfBounds),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Entry {index} has a file name that is not valid UTF-16")]
    FileName { index: usize },

    #[error(
        "Entry {name} points outside its data block ({offset:#X} + {size} > {available})"
    )]
    EntryOutOfRange {
        name: String,
        offset: usize,
        size: usize,
        available: usize,
    },
}
