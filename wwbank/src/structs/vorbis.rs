//! Vorbis header packets, as far as packet timing needs them.
//!
//! The duration of an audio packet depends only on its block size, which is
//! picked by the mode number at the start of the packet. The identification
//! header supplies the two block sizes and the setup header supplies, per mode,
//! which of the two is used.
//!
//! The setup header is not decoded in full. Its mode table sits at the very end
//! of the packet, so it is located by walking the packet backwards from the
//! framing bit and validating candidate mode entries until a mode count field
//! agrees with the number of entries seen.

use log::{debug, trace};

use crate::utils::bitstream_io::{LsbSliceReader, MsbSliceReader};
use crate::utils::errors::VorbisHeaderError;

pub const PACKET_IDENTIFICATION: u8 = 1;
pub const PACKET_COMMENT: u8 = 3;
pub const PACKET_SETUP: u8 = 5;

const SIGNATURE: &[u8; 6] = b"vorbis";
const MAX_MODES: u32 = 64;
/// Bits needed behind a mode entry for the walk to consider it.
const MODE_WALK_MIN_BITS: u64 = 97;

fn read_common_header(
    reader: &mut LsbSliceReader,
    expected: u8,
) -> Result<(), VorbisHeaderError> {
    let found = reader.get_n::<u8>(8)?;
    if found != expected {
        return Err(VorbisHeaderError::PacketType { expected, found });
    }

    let mut signature = [0u8; 6];
    for byte in &mut signature {
        *byte = reader.get_n(8)?;
    }
    if &signature != SIGNATURE {
        return Err(VorbisHeaderError::Signature);
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentHeader {
    pub channels: u8,
    pub sample_rate: u32,
    pub bitrate_maximum: i32,
    pub bitrate_nominal: i32,
    pub bitrate_minimum: i32,
    /// Short and long block size in samples.
    pub blocksizes: [u32; 2],
}

impl IdentHeader {
    pub fn parse(packet: &[u8]) -> Result<Self, VorbisHeaderError> {
        let mut reader = LsbSliceReader::from_slice(packet);
        read_common_header(&mut reader, PACKET_IDENTIFICATION)?;

        let version = reader.get_n::<u32>(32)?;
        if version != 0 {
            return Err(VorbisHeaderError::Version(version));
        }

        let channels = reader.get_n::<u8>(8)?;
        let sample_rate = reader.get_n::<u32>(32)?;
        if channels == 0 || sample_rate == 0 {
            return Err(VorbisHeaderError::StreamParameters {
                channels,
                rate: sample_rate,
            });
        }

        let bitrate_maximum = reader.get_n::<u32>(32)? as i32;
        let bitrate_nominal = reader.get_n::<u32>(32)? as i32;
        let bitrate_minimum = reader.get_n::<u32>(32)? as i32;

        let exp_0 = reader.get_n::<u8>(4)?;
        let exp_1 = reader.get_n::<u8>(4)?;
        if !(6..=13).contains(&exp_0) || !(6..=13).contains(&exp_1) || exp_0 > exp_1 {
            return Err(VorbisHeaderError::Blocksizes(exp_0, exp_1));
        }

        if !reader.get()? {
            return Err(VorbisHeaderError::Framing);
        }

        let header = Self {
            channels,
            sample_rate,
            bitrate_maximum,
            bitrate_nominal,
            bitrate_minimum,
            blocksizes: [1 << exp_0, 1 << exp_1],
        };
        debug!("{header:?}");

        Ok(header)
    }
}

/// Checks the packet type and signature of a comment header.
///
/// The comments themselves are passed through untouched.
pub fn check_comment_header(packet: &[u8]) -> Result<(), VorbisHeaderError> {
    read_common_header(&mut LsbSliceReader::from_slice(packet), PACKET_COMMENT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupHeader {
    /// Per mode, `true` if the mode uses the long block size.
    pub mode_blockflags: Vec<bool>,
}

impl SetupHeader {
    pub fn parse(packet: &[u8]) -> Result<Self, VorbisHeaderError> {
        read_common_header(&mut LsbSliceReader::from_slice(packet), PACKET_SETUP)?;

        let reversed: Vec<u8> = packet.iter().rev().copied().collect();
        let mut reader = MsbSliceReader::from_slice(&reversed);

        let mut framing = None;
        while reader.available()? > MODE_WALK_MIN_BITS {
            if reader.get()? {
                framing = Some(reader.position()?);
                break;
            }
        }
        let framing = framing.ok_or(VorbisHeaderError::Framing)?;

        let mut mode_count = 0u32;
        let mut found = None;
        while reader.available()? >= MODE_WALK_MIN_BITS {
            let mapping = reader.get_n::<u8>(8)?;
            let window = reader.get_n::<u16>(16)?;
            let transform = reader.get_n::<u16>(16)?;
            if mapping > 63 || window != 0 || transform != 0 {
                break;
            }

            reader.skip_n(1)?;
            mode_count += 1;
            if mode_count > MAX_MODES {
                break;
            }

            let count_field = reader.get_n::<u32>(6)?;
            reader.seek(-6)?;
            if count_field + 1 == mode_count {
                found = Some(mode_count);
            }
        }
        let mode_count = found.ok_or(VorbisHeaderError::ModesNotFound)?;

        reader.seek_to(framing)?;
        let mut mode_blockflags = vec![false; mode_count as usize];
        for flag in mode_blockflags.iter_mut().rev() {
            reader.skip_n(40)?;
            *flag = reader.get()?;
        }

        trace!("Setup header modes: {mode_blockflags:?}");

        Ok(Self { mode_blockflags })
    }
}

/// Why an audio packet's block size could not be determined.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketFault {
    #[error("header packet where an audio packet was expected")]
    Header,

    #[error("mode {0} is not defined in the setup header")]
    InvalidMode(u32),
}

/// Block size lookup for audio packets of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketTiming {
    blocksizes: [u32; 2],
    mode_blockflags: Vec<bool>,
    mode_bits: u32,
}

impl PacketTiming {
    pub fn new(ident: &IdentHeader, setup: &SetupHeader) -> Self {
        let modes = setup.mode_blockflags.len() as u32;
        // ilog(modes - 1)
        let mode_bits = u32::BITS - modes.saturating_sub(1).leading_zeros();

        Self {
            blocksizes: ident.blocksizes,
            mode_blockflags: setup.mode_blockflags.clone(),
            mode_bits,
        }
    }

    pub fn modes(&self) -> usize {
        self.mode_blockflags.len()
    }

    /// Block size of a non-empty audio packet.
    pub fn blocksize(&self, packet: &[u8]) -> Result<u32, PacketFault> {
        let first = packet.first().copied().unwrap_or_default();
        if first & 1 != 0 {
            return Err(PacketFault::Header);
        }

        // at most 64 modes, so the mode number fits in the first byte
        let mode = (first as u32 >> 1) & ((1 << self.mode_bits) - 1);
        match self.mode_blockflags.get(mode as usize) {
            Some(&long) => Ok(self.blocksizes[usize::from(long)]),
            None => Err(PacketFault::InvalidMode(mode)),
        }
    }
}
