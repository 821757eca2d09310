//! Byte cursor over an immutable in-memory buffer.
//!
//! All multi-byte integers in a soundbank are little-endian. The cursor keeps
//! an explicit position plus the absolute offset of its slice inside the
//! original buffer, so sub-cursors taken for a section or a single record still
//! report offsets relative to the whole bank.

use crate::utils::errors::OutOfBounds;

#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    /// Creates a cursor whose slice starts at `base` in the enclosing buffer.
    pub fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    /// Position relative to the start of this cursor's slice.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Position relative to the start of the enclosing buffer.
    #[inline(always)]
    pub fn absolute(&self) -> usize {
        self.base + self.pos
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn check(&self, needed: usize) -> Result<(), OutOfBounds> {
        if needed > self.remaining() {
            return Err(OutOfBounds {
                offset: self.absolute(),
                needed,
                available: self.remaining(),
            });
        }

        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], OutOfBounds> {
        self.check(n)?;
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;

        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);

        Ok(array)
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        Ok(self.read_array::<1>()?[0])
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16, OutOfBounds> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads `count` consecutive little-endian `u32` values.
    pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>, OutOfBounds> {
        let bytes = self.read_bytes(count.checked_mul(4).unwrap_or(usize::MAX))?;

        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    #[inline(always)]
    pub fn skip(&mut self, n: usize) -> Result<(), OutOfBounds> {
        self.check(n)?;
        self.pos += n;

        Ok(())
    }

    /// Splits the next `n` bytes off into their own cursor and advances past them.
    pub fn take(&mut self, n: usize) -> Result<ByteCursor<'a>, OutOfBounds> {
        let base = self.absolute();
        let bytes = self.read_bytes(n)?;

        Ok(ByteCursor::with_base(bytes, base))
    }

    /// Moves to an offset relative to the start of this cursor's slice.
    pub fn seek(&mut self, pos: usize) -> Result<(), OutOfBounds> {
        if pos > self.buf.len() {
            return Err(OutOfBounds {
                offset: self.base + pos,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;

        Ok(())
    }

    /// Remaining bytes, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
