//! `.wpk` archives: a flat list of named `.wem` files.
//!
//! ```text
//! "r3d2" | version u32 | count u32 | count x entry offset u32
//! entry: data offset u32 | data length u32 | name length u32 | UTF-16LE name
//! ```
//!
//! All offsets are absolute. File names are `<id>.wem`.

use log::{debug, trace};

use crate::archive::Media;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::ArchiveError;

pub const WPK_MAGIC: [u8; 4] = *b"r3d2";

pub fn read_wpk(data: &[u8]) -> Result<Vec<Media<'_>>, ArchiveError> {
    let mut reader = ByteCursor::new(data);
    let magic = reader.read_array::<4>()?;
    if magic != WPK_MAGIC {
        return Err(ArchiveError::BadMagic(magic));
    }

    let version = reader.read_u32()?;
    let count = reader.read_u32()?;
    debug!("WPK version {version}, {count} files");

    let offsets = reader.read_u32_vec(count as usize)?;
    offsets
        .into_iter()
        .enumerate()
        .map(|(index, offset)| read_entry(data, index, offset as usize))
        .collect()
}

fn read_entry(data: &[u8], index: usize, offset: usize) -> Result<Media<'_>, ArchiveError> {
    let mut reader = ByteCursor::new(data);
    reader.seek(offset)?;

    let data_offset = reader.read_u32()? as usize;
    let data_length = reader.read_u32()? as usize;
    let name_len = reader.read_u32()? as usize;

    let name_bytes = reader.read_bytes(name_len.checked_mul(2).unwrap_or(usize::MAX))?;
    let units: Vec<u16> = name_bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let name = String::from_utf16(&units).map_err(|_| ArchiveError::FileName { index })?;

    let Some(bytes) = data_offset
        .checked_add(data_length)
        .and_then(|end| data.get(data_offset..end))
    else {
        return Err(ArchiveError::EntryOutOfRange {
            name,
            offset: data_offset,
            size: data_length,
            available: data.len(),
        });
    };

    let id = file_id(&name);
    trace!("{name}: {data_length} bytes at {data_offset:#X}");

    Ok(Media {
        id,
        name,
        data: bytes,
    })
}

/// Leading decimal digits of a file name, as the file id.
fn file_id(name: &str) -> Option<u32> {
    let end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());

    name[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wpk(files: &[(&str, &[u8])]) -> Vec<u8> {
        let header_len = 12 + 4 * files.len();
        let entries_len: usize = files.iter().map(|(name, _)| 12 + 2 * name.len()).sum();

        let mut out = WPK_MAGIC.to_vec();
        out.extend(1u32.to_le_bytes());
        out.extend((files.len() as u32).to_le_bytes());

        let mut entry_offset = header_len;
        let mut data_offset = header_len + entries_len;
        let mut entries = Vec::new();
        let mut payloads = Vec::new();
        for (name, payload) in files {
            out.extend((entry_offset as u32).to_le_bytes());
            entries.extend((data_offset as u32).to_le_bytes());
            entries.extend((payload.len() as u32).to_le_bytes());
            entries.extend((name.len() as u32).to_le_bytes());
            entries.extend(name.encode_utf16().flat_map(u16::to_le_bytes));
            payloads.extend_from_slice(payload);

            entry_offset += 12 + 2 * name.len();
            data_offset += payload.len();
        }

        out.extend(entries);
        out.extend(payloads);
        out
    }

    #[test]
    fn reads_named_entries() -> anyhow::Result<()> {
        let archive = wpk(&[("1234.wem", b"RIFF1"), ("99.wem", b"OggS2")]);
        let media = read_wpk(&archive)?;

        assert_eq!(media.len(), 2);
        assert_eq!(media[0].id, Some(1234));
        assert_eq!(media[0].name, "1234.wem");
        assert_eq!(media[0].data, b"RIFF1");
        assert_eq!(media[1].id, Some(99));
        assert!(media[1].is_ogg());
        Ok(())
    }

    #[test]
    fn non_numeric_names_have_no_id() {
        assert_eq!(file_id("music.wem"), None);
        assert_eq!(file_id("42"), Some(42));
    }

    #[test]
    fn rejects_wrong_magic() {
        assert!(matches!(
            read_wpk(b"BKHD\0\0\0\0"),
            Err(ArchiveError::BadMagic(magic)) if &magic == b"BKHD"
        ));
    }

    #[test]
    fn truncated_offset_table() {
        let mut archive = wpk(&[("1.wem", b"a")]);
        archive[8] = 50;
        assert!(matches!(read_wpk(&archive), Err(ArchiveError::Truncated(_))));
    }
}
