//! # Byte Cursor
//!
//! Positioned, bounds-checked reader over a borrowed byte buffer.
//!
//! All multi-byte integers are little-endian, as in every CodeView stream.
//! A cursor never reads outside its own slice: a sub-cursor carved with
//! [`ByteCursor::bounded_subcursor`] borrows exactly the requested bytes, so a
//! malformed string inside it fails locally instead of bleeding into the rest
//! of the record.
//!
//! Each cursor remembers its `origin`, the absolute offset of its first byte
//! in the enclosing stream. Offsets in errors and alignment boundaries are
//! computed from that absolute position. Fixed-width fields are read through
//! `scroll`, mapping its bounds errors onto `TruncatedField`.

use std::mem;

use scroll::ctx::TryFromCtx;
use scroll::{Endian, Pread, LE};
use tracing::trace;

use super::charset::OneByteCharset;
use crate::error::{CodeViewError, CodeViewResult};

/// Bounds-checked little-endian reader.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a>
{
    data: &'a [u8],
    position: usize,
    origin: usize,
    alignment: usize,
}

impl<'a> ByteCursor<'a>
{
    /// Create a cursor over `data`, treating its first byte as stream offset 0.
    #[must_use]
    pub fn new(data: &'a [u8], alignment: usize) -> Self
    {
        Self::with_origin(data, 0, alignment)
    }

    /// Create a cursor whose first byte sits at absolute offset `origin`.
    #[must_use]
    pub fn with_origin(data: &'a [u8], origin: usize, alignment: usize) -> Self
    {
        Self {
            data,
            position: 0,
            origin,
            alignment: alignment.max(1),
        }
    }

    /// Bytes consumed since the cursor was created.
    pub fn consumed(&self) -> usize
    {
        self.position
    }

    /// Bytes left before the bound.
    pub fn remaining(&self) -> usize
    {
        self.data.len() - self.position
    }

    /// Whether any byte is left before the bound.
    pub fn has_more(&self) -> bool
    {
        self.position < self.data.len()
    }

    /// Absolute stream offset of the next byte.
    pub fn offset(&self) -> usize
    {
        self.origin + self.position
    }

    /// Alignment boundary used by [`skip_to_alignment`](Self::skip_to_alignment).
    pub fn alignment(&self) -> usize
    {
        self.alignment
    }

    /// Read `len` raw bytes.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> CodeViewResult<&'a [u8]>
    {
        if len > self.remaining() {
            return Err(CodeViewError::TruncatedField {
                field,
                offset: self.offset(),
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_le<T>(&mut self, field: &'static str) -> CodeViewResult<T>
    where
        T: TryFromCtx<'a, Endian, Error = scroll::Error>,
    {
        let data = self.data;
        let offset = self.offset();
        data.gread_with(&mut self.position, LE)
            .map_err(|_| CodeViewError::TruncatedField {
                field,
                offset,
                needed: mem::size_of::<T>(),
                available: self.remaining(),
            })
    }

    /// Read a `u8`.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` at the end of the buffer.
    pub fn read_u8(&mut self) -> CodeViewResult<u8>
    {
        self.read_le("u8")
    }

    /// Read a little-endian `u16`.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> CodeViewResult<u16>
    {
        self.read_le("u16")
    }

    /// Read a little-endian `u32`.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> CodeViewResult<u32>
    {
        self.read_le("u32")
    }

    /// Read a little-endian `i32`.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` if fewer than 4 bytes remain.
    pub fn read_i32(&mut self) -> CodeViewResult<i32>
    {
        self.read_le("i32")
    }

    /// Carve a cursor over the next `len` bytes and advance past them.
    ///
    /// The returned cursor cannot see anything beyond those `len` bytes.
    ///
    /// ## Errors
    ///
    /// `SubBlockOverrun` if `len` exceeds the remaining bytes. The outer cursor
    /// is left where it was.
    pub fn bounded_subcursor(&mut self, len: usize) -> CodeViewResult<ByteCursor<'a>>
    {
        if len > self.remaining() {
            return Err(CodeViewError::SubBlockOverrun {
                declared: len,
                available: self.remaining(),
            });
        }
        let origin = self.offset();
        let data = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(ByteCursor::with_origin(data, origin, self.alignment))
    }

    /// Decode one null-terminated string and advance past its terminator.
    ///
    /// ## Errors
    ///
    /// `UnterminatedString` if no `0x00` occurs before the bound. Nothing is
    /// consumed in that case.
    pub fn read_cstring(&mut self, charset: OneByteCharset) -> CodeViewResult<String>
    {
        let rest = &self.data[self.position..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(CodeViewError::UnterminatedString { offset: self.offset() });
        };
        let name = charset.decode(&rest[..len]);
        self.position += len + 1;
        Ok(name)
    }

    /// Skip forward to the next alignment boundary.
    ///
    /// Padding past the end of the buffer is clamped to the bound; the record
    /// frame is authoritative about how many bytes exist. Returns the number of
    /// bytes skipped.
    pub fn skip_to_alignment(&mut self) -> usize
    {
        let misalignment = self.offset() % self.alignment;
        if misalignment == 0 {
            return 0;
        }
        let wanted = self.alignment - misalignment;
        let skipped = wanted.min(self.remaining());
        trace!(offset = self.offset(), skipped, wanted, "skipping alignment padding");
        self.position += skipped;
        skipped
    }
}
