use log::trace;

use crate::archive::Media;
use crate::process::section::{DATA, DIDX, find_section};
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::{ArchiveError, FormatError};

const DIDX_ENTRY_SIZE: usize = 12;

/// Lists the media embedded in a bank.
///
/// `DIDX` holds one `(id, offset, size)` entry per file, with offsets relative
/// to the `DATA` payload. A bank without `DIDX` embeds nothing.
pub fn read_bank_media(bank: &[u8]) -> Result<Vec<Media<'_>>, ArchiveError> {
    let index = match find_section(bank, &DIDX) {
        Ok(index) => index,
        Err(FormatError::MissingSection(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let data = find_section(bank, &DATA)?;
    let payload = data.payload(bank)?;

    let mut reader = ByteCursor::with_base(index.payload(bank)?, index.offset);
    let mut media = Vec::with_capacity(index.len / DIDX_ENTRY_SIZE);
    while reader.remaining() >= DIDX_ENTRY_SIZE {
        let id = reader.read_u32()?;
        let offset = reader.read_u32()? as usize;
        let size = reader.read_u32()? as usize;
        let name = format!("{id}.wem");

        let Some(bytes) = offset
            .checked_add(size)
            .and_then(|end| payload.get(offset..end))
        else {
            return Err(ArchiveError::EntryOutOfRange {
                name,
                offset,
                size,
                available: payload.len(),
            });
        };

        trace!("{name}: {size} bytes at DATA + {offset:#X}");
        media.push(Media {
            id: Some(id),
            name,
            data: bytes,
        });
    }

    Ok(media)
}
