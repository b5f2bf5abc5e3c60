//! Bounds-checked reader over a byte slice.
//!
//! Every decoder in this crate reads through a [`ParseCursor`]. No decoder is
//! allowed to index a raw `&[u8]` directly -- the cursor is the only
//! mechanism that guards against over-reading a buffer that may have been
//! clipped mid-message by whatever captured it.

use crate::Error;
use byteorder::{BigEndian, ByteOrder};

/// A cursor over a byte slice that tracks how many bytes remain and refuses
/// to read past the end of the slice it was given.
///
/// Slicing off a sub-cursor (`slice`) does not advance `self` -- the caller
/// must explicitly `skip` the parent by the same amount once it is done with
/// the sub-cursor. This mirrors the framing discipline used throughout the
/// path-attribute and NLRI decoders: an attribute body is read from its own
/// bounded sub-cursor, then the parent cursor is advanced past the whole
/// attribute in one step.
#[derive(Clone, Copy)]
pub struct ParseCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ParseCursor<'a> {
    /// Construct a cursor over the entirety of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        ParseCursor { buf, pos: 0 }
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn require(&self, n: usize) -> Result<(), Error> {
        if self.remaining() < n {
            Err(Error::Partial)
        } else {
            Ok(())
        }
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.require(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.require(2)?;
        let v = BigEndian::read_u16(&self.buf[self.pos..]);
        self.pos += 2;
        Ok(v)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.require(4)?;
        let v = BigEndian::read_u32(&self.buf[self.pos..]);
        self.pos += 4;
        Ok(v)
    }

    /// Read a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.require(8)?;
        let v = BigEndian::read_u64(&self.buf[self.pos..]);
        self.pos += 8;
        Ok(v)
    }

    /// Read a big-endian `u128`.
    pub fn read_u128(&mut self) -> Result<u128, Error> {
        self.require(16)?;
        let v = BigEndian::read_u128(&self.buf[self.pos..]);
        self.pos += 16;
        Ok(v)
    }

    /// Read exactly `n` bytes and return them as a borrowed slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        self.require(n)?;
        let v = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(v)
    }

    /// Skip `n` bytes without inspecting them.
    pub fn skip(&mut self, n: usize) -> Result<(), Error> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    /// Carve off a bounded sub-cursor over the next `n` bytes without
    /// advancing `self`. The caller is responsible for calling
    /// `self.skip(n)` afterwards.
    pub fn slice(&self, n: usize) -> Result<ParseCursor<'a>, Error> {
        self.require(n)?;
        Ok(ParseCursor {
            buf: &self.buf[self.pos..self.pos + n],
            pos: 0,
        })
    }

    /// Convenience: slice the next `n` bytes and advance past them in one step.
    pub fn take(&mut self, n: usize) -> Result<ParseCursor<'a>, Error> {
        let sub = self.slice(n)?;
        self.skip(n)?;
        Ok(sub)
    }

    /// The remainder of the underlying buffer, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
