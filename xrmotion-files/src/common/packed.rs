use byteorder::{ByteOrder, LittleEndian};

use crate::ParserError;

/// The range every quantized envelope parameter is mapped onto.
pub const Q16_MIN: f32 = -32.0;
pub const Q16_MAX: f32 = 32.0;

/// Maps `value` from `[min, max]` onto the full `i16` range. Out of range input is clamped.
pub fn quantize16(value: f32, min: f32, max: f32) -> i16 {
    // not using f32::clamp, that one panics on inverted or NaN bounds
    let clamped = value.max(min).min(max);
    let normalized = (clamped - min) / (max - min);
    let q = (normalized * 65535.0).round() as i32 - 32768;
    q.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

pub fn dequantize16(q: i16, min: f32, max: f32) -> f32 {
    min + (q as f32 + 32768.0) / 65535.0 * (max - min)
}

/// Zero-copy little-endian cursor over a borrowed buffer.
///
/// `base` is the absolute offset of `data` within the file it was sliced from, so that errors raised deep inside a
/// nested chunk still point to the right byte.
#[derive(Debug, Clone)]
pub struct PackedReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> PackedReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        PackedReader { data, pos: 0, base }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute offset of the cursor, for diagnostics.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ParserError> {
        if self.remaining() < n {
            return Err(ParserError::UnexpectedEof {
                offset: self.offset(),
                wanted: n,
            });
        }

        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes whatever is left in the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }

    pub fn read_u8(&mut self) -> Result<u8, ParserError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ParserError> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, ParserError> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ParserError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, ParserError> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_quant16(&mut self, min: f32, max: f32) -> Result<f32, ParserError> {
        Ok(dequantize16(self.read_i16()?, min, max))
    }

    /// Reads up to (and consumes) the NUL terminator. A missing terminator leaves the cursor untouched, so that the
    /// caller can decide whether to give up or to take the rest of the buffer instead.
    pub fn read_cstring(&mut self) -> Result<String, ParserError> {
        let start = self.offset();
        let rest = &self.data[self.pos..];
        let Some(len) = rest.iter().position(|&c| c == 0) else {
            return Err(ParserError::UnterminatedString {
                offset: start,
                partial: String::from_utf8_lossy(rest).into_owned(),
            });
        };

        let bytes = rest[..len].to_vec();
        self.pos += len + 1;
        String::from_utf8(bytes).map_err(|source| ParserError::InvalidString { offset: start, source })
    }
}

/// Append-only little-endian output buffer. Writes cannot fail.
#[derive(Debug, Default, Clone)]
pub struct PackedWriter {
    buf: Vec<u8>,
}

impl PackedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.write_bytes(&bytes)
    }

    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        let mut bytes = [0u8; 2];
        LittleEndian::write_i16(&mut bytes, value);
        self.write_bytes(&bytes)
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.write_bytes(&bytes)
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        let mut bytes = [0u8; 4];
        LittleEndian::write_f32(&mut bytes, value);
        self.write_bytes(&bytes)
    }

    pub fn write_quant16(&mut self, value: f32, min: f32, max: f32) -> &mut Self {
        self.write_i16(quantize16(value, min, max))
    }

    /// Strings are written verbatim. An interior NUL would truncate the string on read, so everything from the first
    /// NUL on is dropped here already.
    pub fn write_cstring(&mut self, value: &str) -> &mut Self {
        let bytes = value.as_bytes();
        let len = bytes.iter().position(|&c| c == 0).unwrap_or(bytes.len());
        self.write_bytes(&bytes[..len]).write_u8(0)
    }
}
