//! Containers holding the audio payloads.
//!
//! Embedded media lives in the `DIDX`/`DATA` chunks of a bank; streamed media
//! ships in flat `.wpk` archives. Both are read into borrowed [`Media`]
//! slices, nothing is copied.

pub mod bank;
pub mod wpk;

use log::debug;

use crate::process::section::BKHD;
use crate::utils::errors::ArchiveError;

pub const OGG_MAGIC: &[u8; 4] = b"OggS";

/// One audio file inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media<'a> {
    /// Numeric file id, `None` for WPK entries whose name does not start
    /// with one.
    pub id: Option<u32>,
    pub name: String,
    pub data: &'a [u8],
}

impl Media<'_> {
    /// `true` if the payload is a plain Ogg stream rather than a `.wem`.
    pub fn is_ogg(&self) -> bool {
        is_ogg(self.data)
    }
}

pub fn is_ogg(data: &[u8]) -> bool {
    data.starts_with(OGG_MAGIC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Bank,
    Wpk,
}

pub fn detect(data: &[u8]) -> Result<ContainerKind, ArchiveError> {
    let mut magic = [0u8; 4];
    let len = data.len().min(4);
    magic[..len].copy_from_slice(&data[..len]);

    match magic {
        BKHD => Ok(ContainerKind::Bank),
        wpk::WPK_MAGIC => Ok(ContainerKind::Wpk),
        other => Err(ArchiveError::UnknownContainer(other)),
    }
}

/// Lists the audio files of a bank or WPK archive, detected by magic.
pub fn read_media(data: &[u8]) -> Result<Vec<Media<'_>>, ArchiveError> {
    let kind = detect(data)?;
    let media = match kind {
        ContainerKind::Bank => bank::read_bank_media(data)?,
        ContainerKind::Wpk => wpk::read_wpk(data)?,
    };
    debug!("{kind:?}: {} audio files", media.len());

    Ok(media)
}

#[test]
fn detects_containers_by_magic() {
    assert_eq!(detect(b"BKHD\0\0\0\0").unwrap(), ContainerKind::Bank);
    assert_eq!(detect(b"r3d2").unwrap(), ContainerKind::Wpk);
    assert!(matches!(
        detect(b"Ogg"),
        Err(ArchiveError::UnknownContainer([b'O', b'g', b'g', 0]))
    ));
    assert!(is_ogg(b"OggS\0\x02"));
}
