//! Bitstream I/O utilities for Vorbis header and packet parsing.
//!
//! Vorbis packs fields least-significant-bit first; [`LsbSliceReader`] reads
//! packets forwards in that order. [`MsbSliceReader`] over a byte-reversed
//! buffer walks a packet backwards, which is how the mode configuration is
//! recovered from the tail of the setup header.

use std::io;
use std::io::SeekFrom;

use bitstream_io::{BigEndian, BitRead, BitReader, Endianness, LittleEndian, UnsignedInteger};

#[derive(Debug)]
pub struct BitstreamIoReader<R: io::Read + io::Seek, E: Endianness> {
    bs: BitReader<R, E>,
    len: u64,
}

pub type LsbSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>, LittleEndian>;
pub type MsbSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>, BigEndian>;

impl<R, E> BitstreamIoReader<R, E>
where
    R: io::Read + io::Seek,
    E: Endianness,
{
    pub fn new(read: R, len_bytes: u64) -> Self {
        Self {
            bs: BitReader::new(read),
            len: len_bytes << 3,
        }
    }

    #[inline(always)]
    pub fn get(&mut self) -> io::Result<bool> {
        self.bs.read_bit()
    }

    #[inline(always)]
    pub fn get_n<I: UnsignedInteger>(&mut self, n: u32) -> io::Result<I> {
        match self.bs.read_unsigned_var(n) {
            Ok(val) => Ok(val),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                // Only call position() on error path to avoid overhead
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "get_n({}): out of bounds bits at {}",
                        n,
                        self.bs.position_in_bits().unwrap_or(0)
                    ),
                ))
            }
            Err(e) => Err(e),
        }
    }

    #[inline(always)]
    pub fn seek(&mut self, offset: i64) -> io::Result<u64> {
        if (offset < 0 && self.position()? as i64 + offset >= 0)
            || (offset >= 0 && self.available()? as i64 >= offset)
        {
            return self.bs.seek_bits(SeekFrom::Current(offset));
        }

        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "seek({}): out of bounds bits at {}",
                offset,
                self.position()?
            ),
        ))
    }

    #[inline(always)]
    pub fn seek_to(&mut self, position: u64) -> io::Result<u64> {
        if position > self.len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("seek_to({position}): past the end of {} bits", self.len),
            ));
        }

        self.bs.seek_bits(SeekFrom::Start(position))
    }

    #[inline(always)]
    pub fn available(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits().map(|pos| self.len - pos)
    }

    #[inline(always)]
    pub fn skip_n(&mut self, n: u32) -> io::Result<()> {
        self.available().and_then(|avail| {
            if n as u64 > avail {
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "skip_n: out of bounds bits",
                ))
            } else {
                self.bs.skip(n)
            }
        })
    }

    #[inline(always)]
    pub fn position(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits()
    }
}

impl<'a, E: Endianness> BitstreamIoReader<io::Cursor<&'a [u8]>, E> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        let len = buf.len() as u64;
        let read = io::Cursor::new(buf);

        Self::new(read, len)
    }
}
