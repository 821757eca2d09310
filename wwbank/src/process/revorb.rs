use log::{Level, debug, info, trace};
use ogg::writing::{PacketWriteEndInfo, PacketWriter};

use crate::log_or_err;
use crate::process::pages::PageReader;
use crate::structs::vorbis::{
    IdentHeader, PacketFault, PacketTiming, SetupHeader, check_comment_header,
};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::errors::{BitstreamWarning, RepairError};
use crate::utils::timing::GranuleTracker;

/// Pages are closed once they hold at least this many bytes of packet data.
const PAGE_FLUSH_BYTES: usize = 4096;
/// Consecutive read problems after which the rest of the input is dropped.
const MAX_CONSECUTIVE_ERRORS: usize = 16;

/// A rewritten Ogg Vorbis stream.
#[derive(Debug)]
pub struct Repaired {
    pub data: Vec<u8>,
    /// Pages and packets that were dropped along the way.
    pub diagnostics: Diagnostics<BitstreamWarning>,
    pub serial: u32,
    /// Audio packets written, empty packets included.
    pub packets: u64,
    /// Granule position of the last audio packet.
    pub granule: u64,
}

impl Repaired {
    pub fn soft_failed(&self) -> bool {
        self.diagnostics.soft_failed()
    }
}

#[derive(Debug, Clone)]
pub struct RevorbState {
    pub fail_level: Level,
    pub serial: Option<u32>,
}

impl Default for RevorbState {
    fn default() -> Self {
        Self {
            fail_level: Level::Error,
            serial: None,
        }
    }
}

/// Recomputes granule positions of an Ogg Vorbis stream.
///
/// Streams cut out of a bank carry granule positions that do not match their
/// packets, so players misreport their length and cannot seek. Packets are
/// copied unchanged and re-paged with granule positions derived from the
/// block size of every packet.
#[derive(Debug, Default)]
pub struct Revorb {
    state: RevorbState,
}

struct HeaderPackets {
    serial: u32,
    ident: (IdentHeader, Vec<u8>),
    comment: Vec<u8>,
    setup: (SetupHeader, Vec<u8>),
}

fn next_header(
    reader: &mut PageReader<'_>,
    which: &'static str,
) -> Result<(u32, Vec<u8>), RepairError> {
    match reader.next() {
        Some(Ok(packet)) => Ok((packet.stream_serial(), packet.data)),
        Some(Err(warning)) => Err(RepairError::NotOgg(format!("{which} header: {warning}"))),
        None => Err(RepairError::MissingHeader(which)),
    }
}

fn read_headers(reader: &mut PageReader<'_>) -> Result<HeaderPackets, RepairError> {
    let (serial, ident) = next_header(reader, "identification")?;
    let ident_header =
        IdentHeader::parse(&ident).map_err(|source| RepairError::InvalidHeader {
            which: "identification",
            source,
        })?;

    let (_, comment) = next_header(reader, "comment")?;
    check_comment_header(&comment).map_err(|source| RepairError::InvalidHeader {
        which: "comment",
        source,
    })?;

    let (_, setup) = next_header(reader, "setup")?;
    let setup_header = SetupHeader::parse(&setup).map_err(|source| RepairError::InvalidHeader {
        which: "setup",
        source,
    })?;

    Ok(HeaderPackets {
        serial,
        ident: (ident_header, ident),
        comment,
        setup: (setup_header, setup),
    })
}

/// Holds back one packet so the last packet written can carry the
/// end-of-stream flag.
#[derive(Debug, Default)]
struct Holdback {
    pending: Option<(Vec<u8>, u64)>,
    page_bytes: usize,
    packets: u64,
}

impl Holdback {
    /// Queues a packet and releases the previous one, with how its page ends.
    fn push(&mut self, packet: Vec<u8>, granule: u64) -> Option<(Vec<u8>, u64, PacketWriteEndInfo)> {
        self.packets += 1;
        let (data, granule) = self.pending.replace((packet, granule))?;

        self.page_bytes += data.len();
        let info = if self.page_bytes >= PAGE_FLUSH_BYTES {
            self.page_bytes = 0;
            PacketWriteEndInfo::EndPage
        } else {
            PacketWriteEndInfo::NormalPacket
        };

        Some((data, granule, info))
    }

    /// The final packet. Empty if no audio packet was accepted at all.
    fn finish(&mut self) -> (Vec<u8>, u64) {
        self.pending.take().unwrap_or_default()
    }
}

impl Revorb {
    pub fn repair(&mut self, input: &[u8]) -> Result<Repaired, RepairError> {
        let mut reader = PageReader::new(input);
        let headers = read_headers(&mut reader)?;
        let serial = self.state.serial.unwrap_or(headers.serial);
        let timing = PacketTiming::new(&headers.ident.0, &headers.setup.0);
        debug!(
            "Stream {:#010X}: {} Hz, {} channels, {} modes, output serial {:#010X}",
            headers.serial,
            headers.ident.0.sample_rate,
            headers.ident.0.channels,
            timing.modes(),
            serial
        );

        let mut data = Vec::with_capacity(input.len());
        let mut diagnostics = Diagnostics::default();
        let mut tracker = GranuleTracker::default();

        let mut holdback = Holdback::default();
        {
            let mut writer = PacketWriter::new(&mut data);
            writer.write_packet(headers.ident.1, serial, PacketWriteEndInfo::EndPage, 0)?;
            writer.write_packet(headers.comment, serial, PacketWriteEndInfo::NormalPacket, 0)?;
            writer.write_packet(headers.setup.1, serial, PacketWriteEndInfo::EndPage, 0)?;

            let mut index = 2u64;
            let mut consecutive_errors = 0;
            for item in reader {
                let packet = match item {
                    Ok(packet) => packet,
                    Err(warning) => {
                        diagnostics.push(log_or_err!(self.state, Level::Warn, warning));

                        consecutive_errors += 1;
                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            let warning = BitstreamWarning::TooManyErrors(consecutive_errors);
                            diagnostics.push(log_or_err!(self.state, Level::Warn, warning));
                            break;
                        }
                        continue;
                    }
                };
                consecutive_errors = 0;
                index += 1;

                if packet.stream_serial() != headers.serial {
                    let warning = BitstreamWarning::ForeignStream {
                        index,
                        found: packet.stream_serial(),
                        expected: headers.serial,
                    };
                    diagnostics.push(log_or_err!(self.state, Level::Warn, warning));
                    continue;
                }

                let last = packet.last_in_stream();
                // empty packets keep the current granule and leave the
                // block size history alone
                let granule = if packet.data.is_empty() {
                    Some(tracker.granule())
                } else {
                    match timing.blocksize(&packet.data) {
                        Ok(blocksize) => Some(tracker.advance(blocksize)),
                        Err(fault) => {
                            let warning = match fault {
                                PacketFault::Header => BitstreamWarning::UnexpectedHeader { index },
                                PacketFault::InvalidMode(mode) => BitstreamWarning::InvalidMode {
                                    index,
                                    mode,
                                    modes: timing.modes(),
                                },
                            };
                            diagnostics.push(log_or_err!(self.state, Level::Warn, warning));
                            None
                        }
                    }
                };

                if let Some(granule) = granule {
                    if let Some((data, granule, info)) = holdback.push(packet.data, granule) {
                        writer.write_packet(data, serial, info, granule)?;
                    }
                }

                if last {
                    trace!("End of stream at packet {index}");
                    break;
                }
            }

            let (last, granule) = holdback.finish();
            writer.write_packet(last, serial, PacketWriteEndInfo::EndStream, granule)?;
        }
        let packets = holdback.packets;

        info!(
            "Rewrote {} audio packets, final granule {}, {} problems",
            packets,
            tracker.granule(),
            diagnostics.len()
        );

        Ok(Repaired {
            data,
            diagnostics,
            serial,
            packets,
            granule: tracker.granule(),
        })
    }

    pub fn set_fail_level(&mut self, level: Level) {
        self.state.fail_level = level;
    }

    /// Overrides the stream serial of the output. Defaults to the input's.
    pub fn set_serial(&mut self, serial: u32) {
        self.state.serial = Some(serial);
    }
}
