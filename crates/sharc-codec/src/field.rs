//! Primitive field codec.
//!
//! Every archive field is either a 32-bit integer or a byte run whose length
//! was declared by an earlier integer. Strings are UTF-8 with a NUL
//! terminator, except shader code which is stored as Shift_JIS.

use encoding_rs::SHIFT_JIS;

use crate::error::{Result, SharcError};
use crate::types::ByteOrder;

/// Width of every integer field.
pub const FIELD_LEN: usize = 4;

/// Cursor over an archive buffer.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> FieldReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            order,
        }
    }

    /// Current cursor offset from the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute offset (the end of the buffer is valid).
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(SharcError::TruncatedBuffer {
                offset: self.pos,
                needed: pos.saturating_sub(self.pos),
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrow `len` bytes at the cursor and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let slice = self.slice_at(self.pos, len)?;
        self.pos += len;
        Ok(slice)
    }

    /// Read the next byte without advancing.
    pub fn peek_u8(&self) -> Result<u8> {
        Ok(self.slice_at(self.pos, 1)?[0])
    }

    /// Read a u32 at the cursor without advancing.
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.slice_at(self.pos, FIELD_LEN)?;
        Ok(self.decode_u32(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(FIELD_LEN)?;
        Ok(self.decode_u32(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a u32 length field.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Advance past any NUL bytes at the cursor.
    pub fn skip_nuls(&mut self) -> Result<()> {
        while self.peek_u8()? == 0 {
            self.pos += 1;
        }
        Ok(())
    }

    /// Read a string running from the cursor through the next NUL.
    ///
    /// The byte at the cursor always belongs to the string, even if it is NUL.
    pub fn read_terminated_string(&mut self) -> Result<String> {
        let offset = self.pos;
        let terminator = offset
            .checked_add(1)
            .and_then(|body| self.data.get(body..))
            .and_then(|tail| tail.iter().position(|&b| b == 0))
            .ok_or(SharcError::TruncatedBuffer {
                offset,
                needed: self.remaining() + 1,
                available: self.remaining(),
            })?;
        self.read_string(terminator + 2)
    }

    /// Read `len` bytes as UTF-8 and strip trailing NUL bytes.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| SharcError::InvalidText {
            offset,
            encoding: "UTF-8",
        })?;
        Ok(text.trim_end_matches('\0').to_string())
    }

    fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(SharcError::TruncatedBuffer {
                offset,
                needed: len,
                available: self.data.len().saturating_sub(offset),
            })
    }

    fn decode_u32(&self, bytes: &[u8]) -> u32 {
        let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
        match self.order {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        }
    }
}

/// Growable output buffer with in-place patching of already written fields.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl FieldWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buf: Vec::new(),
            order,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u32(&mut self, value: u32) {
        let bytes = self.encode_u32(value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    /// Write a length as a u32 field.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_u32(to_u32(len)?);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrite the u32 field at `offset`.
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        let bytes = self.encode_u32(value);
        let available = self.buf.len().saturating_sub(offset);
        let slot = offset
            .checked_add(FIELD_LEN)
            .and_then(|end| self.buf.get_mut(offset..end))
            .ok_or(SharcError::TruncatedBuffer {
                offset,
                needed: FIELD_LEN,
                available,
            })?;
        slot.copy_from_slice(&bytes);
        Ok(())
    }

    /// Write a zero size placeholder and return its offset.
    pub fn begin_sized(&mut self) -> usize {
        let start = self.buf.len();
        self.write_u32(0);
        start
    }

    /// Patch the placeholder at `start` with the byte count written since.
    pub fn finish_sized(&mut self, start: usize) -> Result<usize> {
        let size = self.buf.len() - start;
        self.patch_u32(start, to_u32(size)?)?;
        Ok(size)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn encode_u32(&self, value: u32) -> [u8; FIELD_LEN] {
        match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }
}

/// UTF-8 bytes of `text` followed by exactly one NUL.
///
/// Decoding strips every trailing NUL, so text ending in one is rejected.
pub fn encode_string(text: &str) -> Result<Vec<u8>> {
    if text.ends_with('\0') {
        return Err(SharcError::invariant(
            format!("string {text:?}"),
            "ends with a NUL byte",
        ));
    }
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    Ok(bytes)
}

/// Shift_JIS bytes of `text`.
///
/// `None` if any character has no mapping or would decode back as a
/// different character (`¥` and `‾` fold onto ASCII, `−` onto `－`).
#[must_use]
pub fn encode_legacy_text(text: &str) -> Option<Vec<u8>> {
    let (bytes, _, unmappable) = SHIFT_JIS.encode(text);
    if unmappable {
        return None;
    }
    match decode_legacy_text(&bytes) {
        Some(decoded) if decoded == text => Some(bytes.into_owned()),
        _ => None,
    }
}

/// Strict Shift_JIS decode; `None` on malformed input.
#[must_use]
pub fn decode_legacy_text(bytes: &[u8]) -> Option<String> {
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Convert a length to its on-disk width.
pub fn to_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| SharcError::LengthOverflow { length: len })
}
