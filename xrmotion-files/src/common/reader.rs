use crate::ParserError;
use crate::common::packed::{PackedReader, PackedWriter};

pub trait Parseable<T> {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<T, ParserError>;
}

pub trait Writable {
    fn write(&self, wtr: &mut PackedWriter);
}

impl Parseable<u8> for u8 {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<u8, ParserError> {
        rdr.read_u8()
    }
}

impl Parseable<u16> for u16 {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<u16, ParserError> {
        rdr.read_u16()
    }
}

impl Parseable<i16> for i16 {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<i16, ParserError> {
        rdr.read_i16()
    }
}

impl Parseable<u32> for u32 {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<u32, ParserError> {
        rdr.read_u32()
    }
}

impl Parseable<f32> for f32 {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<f32, ParserError> {
        rdr.read_f32()
    }
}

impl Parseable<String> for String {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<String, ParserError> {
        rdr.read_cstring()
    }
}

impl Writable for u8 {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_u8(*self);
    }
}

impl Writable for u16 {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_u16(*self);
    }
}

impl Writable for i16 {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_i16(*self);
    }
}

impl Writable for u32 {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_u32(*self);
    }
}

impl Writable for f32 {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_f32(*self);
    }
}

impl Writable for String {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_cstring(self);
    }
}

/// Reads `count` consecutive elements.
pub fn read_counted_array<T: Parseable<T>>(rdr: &mut PackedReader<'_>, count: usize) -> Result<Vec<T>, ParserError> {
    // don't trust the count for the allocation, a corrupt file could claim billions of elements
    let mut list = Vec::with_capacity(count.min(rdr.remaining()));
    for _ in 0..count {
        list.push(T::parse(rdr)?);
    }
    Ok(list)
}

/// Reads elements until the buffer is exhausted. A trailing partial element is an error.
pub fn read_chunk_array<T: Parseable<T>>(rdr: &mut PackedReader<'_>) -> Result<Vec<T>, ParserError> {
    let mut list = Vec::new();
    while !rdr.is_empty() {
        list.push(T::parse(rdr)?);
    }
    Ok(list)
}
