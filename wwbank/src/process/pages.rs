use std::collections::HashMap;
use std::mem;

use log::{debug, trace};
use ogg::Packet;
use ogg::reading::{BasePacketReader, OggPage, OggReadError, PageParser};

use crate::utils::cursor::ByteCursor;
use crate::utils::errors::{BitstreamWarning, OutOfBounds};

const CAPTURE_PATTERN: &[u8; 4] = b"OggS";
const HEADER_LEN: usize = 27;

enum PageError {
    Truncated(OutOfBounds),
    Corrupt(OggReadError),
}

struct RawPage {
    page: OggPage,
    serial: u32,
    sequence: u32,
    len: usize,
}

/// Reads packets from an Ogg bitstream held in memory.
///
/// Pages are located by their capture pattern and checked against their
/// checksum before their packets are handed out. Every gap in a stream
/// (bytes skipped while searching for a page, a page failing its checksum, a
/// jump in page sequence numbers) is reported once as a warning, and packet
/// assembly restarts after it: a packet split across the gap is dropped
/// rather than glued to unrelated data.
///
/// Truncation at the end of the input is reported as
/// [`BitstreamWarning::TruncatedPage`] and ends the iteration.
///
/// # Example
///
/// ```rust,no_run
/// use wwbank::process::pages::PageReader;
///
/// let data = std::fs::read("music.ogg")?;
/// for item in PageReader::new(&data) {
///     match item {
///         Ok(packet) => println!("{} bytes", packet.data.len()),
///         Err(warning) => eprintln!("{warning}"),
///     }
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct PageReader<'a> {
    data: &'a [u8],
    pos: usize,
    packets: BasePacketReader,
    /// Next expected page sequence number per stream serial.
    sequences: HashMap<u32, u32>,
    /// A gap has been reported and no page was read since.
    unsynced: bool,
    pages: usize,
}

impl<'a> PageReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            packets: BasePacketReader::new(),
            sequences: HashMap::new(),
            unsynced: false,
            pages: 0,
        }
    }

    /// Offset of the next byte to be examined.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Pages read successfully so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Drops partial packet state. Only the first fault of a gap is reported.
    fn fault(&mut self, warning: BitstreamWarning) -> Result<(), BitstreamWarning> {
        self.packets.update_after_seek();
        if mem::replace(&mut self.unsynced, true) {
            debug!("{warning}");
            Ok(())
        } else {
            Err(warning)
        }
    }

    fn parse_page(&self, offset: usize) -> Result<RawPage, PageError> {
        let rest = self.data.get(offset..).unwrap_or_default();
        let mut cursor = ByteCursor::with_base(rest, offset);

        let header: [u8; HEADER_LEN] = cursor.read_array().map_err(PageError::Truncated)?;
        let (mut parser, segment_count) = PageParser::new(header).map_err(PageError::Corrupt)?;
        let segments = cursor
            .read_bytes(segment_count)
            .map_err(PageError::Truncated)?;
        let body_len = parser.parse_segments(segments.to_vec());
        let body = cursor.read_bytes(body_len).map_err(PageError::Truncated)?;
        let page = parser
            .parse_packet_data(body.to_vec())
            .map_err(PageError::Corrupt)?;

        let mut fields = ByteCursor::new(&header);
        fields.skip(14).map_err(PageError::Truncated)?;
        let serial = fields.read_u32().map_err(PageError::Truncated)?;
        let sequence = fields.read_u32().map_err(PageError::Truncated)?;

        Ok(RawPage {
            page,
            serial,
            sequence,
            len: cursor.position(),
        })
    }

    /// `None` at the end of the input, `Ok` once progress has been made.
    fn read_page(&mut self) -> Option<Result<(), BitstreamWarning>> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        if rest.is_empty() {
            return None;
        }

        let offset = self.pos;
        let skipped = rest
            .windows(CAPTURE_PATTERN.len())
            .position(|w| w == CAPTURE_PATTERN)
            .unwrap_or(rest.len());
        if skipped > 0 {
            self.pos += skipped;
            return Some(self.fault(BitstreamWarning::LostSync { offset, skipped }));
        }

        let raw = match self.parse_page(offset) {
            Ok(raw) => raw,
            Err(PageError::Corrupt(e)) => {
                self.pos = offset + 1;
                return Some(self.fault(BitstreamWarning::CorruptPage(e.to_string())));
            }
            Err(PageError::Truncated(e)) => {
                let resync = rest.get(1..).is_some_and(|r| {
                    r.windows(CAPTURE_PATTERN.len())
                        .any(|w| w == CAPTURE_PATTERN)
                });
                if resync {
                    // length fields are damaged, a later page may still be intact
                    self.pos = offset + 1;
                    return Some(self.fault(BitstreamWarning::CorruptPage(e.to_string())));
                }
                self.pos = self.data.len();
                self.packets.update_after_seek();
                return Some(Err(BitstreamWarning::TruncatedPage(e.to_string())));
            }
        };

        self.pos = offset + raw.len;
        self.pages += 1;
        trace!(
            "Page {} of stream {:#010X} at {offset:#X}, {} bytes",
            raw.sequence, raw.serial, raw.len
        );

        let gap = match self.sequences.insert(raw.serial, raw.sequence.wrapping_add(1)) {
            Some(expected) if expected != raw.sequence => Some(BitstreamWarning::MissingPage {
                serial: raw.serial,
                expected,
                found: raw.sequence,
            }),
            _ => None,
        };
        if gap.is_some() {
            self.packets.update_after_seek();
        }

        let was_unsynced = mem::replace(&mut self.unsynced, false);
        if let Err(e) = self.packets.push_page(raw.page) {
            return Some(self.fault(BitstreamWarning::CorruptPage(e.to_string())));
        }

        match gap {
            Some(warning) if !was_unsynced => Some(Err(warning)),
            Some(warning) => {
                debug!("{warning}");
                Some(Ok(()))
            }
            None => Some(Ok(())),
        }
    }
}

impl Iterator for PageReader<'_> {
    type Item = Result<Packet, BitstreamWarning>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(packet) = self.packets.read_packet() {
                return Some(Ok(packet));
            }

            if let Err(warning) = self.read_page()? {
                return Some(Err(warning));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::fixtures::{self, STREAM_SERIAL};

    /// Packet lengths, with `None` standing for a warning.
    fn lengths(data: &[u8]) -> Vec<Option<usize>> {
        PageReader::new(data)
            .map(|item| item.ok().map(|packet| packet.data.len()))
            .collect()
    }

    fn warnings(data: &[u8]) -> Vec<BitstreamWarning> {
        PageReader::new(data).filter_map(Result::err).collect()
    }

    fn small() -> Vec<u8> {
        fixtures::audio_packet(0)
    }

    /// Spans two pages when written.
    fn spanning() -> Vec<u8> {
        fixtures::sized_packet(0, 70_000)
    }

    #[test]
    fn clean_stream_yields_every_packet() -> anyhow::Result<()> {
        let input = fixtures::ogg_stream(&[false], &[small(), spanning(), small()]);
        let mut reader = PageReader::new(&input);
        let packets = reader.by_ref().collect::<Result<Vec<_>, _>>()?;

        assert_eq!(packets.len(), 6);
        assert_eq!(packets[4].data.len(), 70_000);
        assert!(packets[5].last_in_stream());
        assert_eq!(reader.pages(), 6);
        assert_eq!(reader.position(), input.len());
        Ok(())
    }

    #[test]
    fn damaged_capture_pattern_is_reported_once() {
        let mut input = fixtures::ogg_stream(&[false], &[small(), small(), small()]);
        let pages = fixtures::page_offsets(&input);
        assert_eq!(pages.len(), 5);
        input[pages[3]] = b'X';

        assert_eq!(
            warnings(&input),
            [BitstreamWarning::LostSync {
                offset: pages[3],
                skipped: pages[4] - pages[3],
            }]
        );
        assert_eq!(lengths(&input)[3..], [Some(3), None, Some(3)]);
    }

    #[test]
    fn checksum_failure_drops_the_tail_of_a_split_packet() {
        // pages: ident, comment + setup, head, tail, small, small
        let mut input = fixtures::ogg_stream(&[false], &[spanning(), small(), small()]);
        let pages = fixtures::page_offsets(&input);
        assert_eq!(pages.len(), 6);
        input[pages[3] + 22] ^= 0xFF;

        assert!(matches!(
            warnings(&input).as_slice(),
            [BitstreamWarning::CorruptPage(_)]
        ));
        assert_eq!(lengths(&input)[3..], [None, Some(3), Some(3)]);
    }

    #[test]
    fn continued_page_after_a_gap_drops_its_leading_fragment() {
        // pages: ident, comment + setup, small, head, tail, small
        let mut input = fixtures::ogg_stream(&[false], &[small(), spanning(), small()]);
        let pages = fixtures::page_offsets(&input);
        assert_eq!(pages.len(), 6);
        input[pages[3] + 22] ^= 0xFF;

        assert_eq!(lengths(&input)[3..], [Some(3), None, Some(3)]);
    }

    #[test]
    fn missing_page_is_detected_by_sequence_number() {
        let input = fixtures::ogg_stream(&[false], &[small(), small(), small()]);
        let pages = fixtures::page_offsets(&input);
        let mut cut = input[..pages[3]].to_vec();
        cut.extend_from_slice(&input[pages[4]..]);

        assert_eq!(
            warnings(&cut),
            [BitstreamWarning::MissingPage {
                serial: STREAM_SERIAL,
                expected: 3,
                found: 4,
            }]
        );
        assert_eq!(lengths(&cut)[3..], [Some(3), None, Some(3)]);
    }

    #[test]
    fn truncated_last_page_ends_the_stream() {
        let mut input = fixtures::ogg_stream(&[false], &[small(), small()]);
        input.truncate(input.len() - 2);

        let mut reader = PageReader::new(&input);
        let items: Vec<_> = reader.by_ref().collect();
        assert_eq!(items.len(), 5);
        assert!(matches!(
            items.last(),
            Some(Err(BitstreamWarning::TruncatedPage(_)))
        ));
        assert!(reader.next().is_none());
    }
}
