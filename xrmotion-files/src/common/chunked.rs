use log::trace;

use crate::ParserError;
use crate::common::packed::{PackedReader, PackedWriter};
use crate::common::reader::Parseable;

pub const CHUNK_HEADER_SIZE: usize = 8;

/// A chunk borrowed from its parent buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: u32,
    pub payload: &'a [u8],
    /// Absolute offset of the chunk header
    pub offset: usize,
}

impl<'a> Chunk<'a> {
    pub fn payload_offset(&self) -> usize {
        self.offset + CHUNK_HEADER_SIZE
    }

    pub fn reader(&self) -> PackedReader<'a> {
        PackedReader::with_base(self.payload, self.payload_offset())
    }

    /// Treats the payload as a nested chunk stream.
    pub fn children(&self) -> ChunkedReader<'a> {
        ChunkedReader::with_base(self.payload, self.payload_offset())
    }

    pub fn parse<T: Parseable<T>>(&self) -> Result<T, ParserError> {
        T::parse(&mut self.reader())
    }
}

/// Iterates over a flat chunk stream. Nesting is up to the caller: see [`Chunk::children`].
///
/// The iterator stops after the first error.
#[derive(Debug, Clone)]
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
    failed: bool,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        ChunkedReader {
            data,
            pos: 0,
            base,
            failed: false,
        }
    }

    fn read_next_chunk(&mut self) -> Result<Chunk<'a>, ParserError> {
        let offset = self.base + self.pos;
        let remaining = self.data.len() - self.pos;
        if remaining < CHUNK_HEADER_SIZE {
            return Err(ParserError::UnexpectedEof {
                offset,
                wanted: CHUNK_HEADER_SIZE,
            });
        }

        let mut header = PackedReader::with_base(&self.data[self.pos..self.pos + CHUNK_HEADER_SIZE], offset);
        let id = header.read_u32()?;
        let declared = header.read_u32()?;
        let size = declared as usize;
        if size > remaining - CHUNK_HEADER_SIZE {
            return Err(ParserError::TruncatedChunk {
                offset,
                id,
                declared,
                remaining: remaining - CHUNK_HEADER_SIZE,
            });
        }

        let start = self.pos + CHUNK_HEADER_SIZE;
        self.pos = start + size;
        Ok(Chunk {
            id,
            payload: &self.data[start..start + size],
            offset,
        })
    }

    /// First chunk with the given id. Scanning errors are returned, not swallowed.
    pub fn find(&self, id: u32) -> Result<Option<Chunk<'a>>, ParserError> {
        for chunk in self.clone() {
            let chunk = chunk?;
            if chunk.id == id {
                return Ok(Some(chunk));
            }
        }

        Ok(None)
    }

    pub fn find_mandatory(&self, id: u32) -> Result<Chunk<'a>, ParserError> {
        self.find(id)?.ok_or(ParserError::MissingChunk { id })
    }

    pub fn collect_chunks(&self) -> Result<Vec<Chunk<'a>>, ParserError> {
        self.clone().collect()
    }

    /// Whether `data` is a non-empty sequence of chunks that exactly fills the buffer.
    pub fn is_chunk_stream(data: &[u8]) -> bool {
        !data.is_empty() && ChunkedReader::new(data).all(|chunk| chunk.is_ok())
    }
}

impl<'a> Iterator for ChunkedReader<'a> {
    type Item = Result<Chunk<'a>, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos == self.data.len() {
            return None;
        }

        let chunk = self.read_next_chunk();
        match &chunk {
            Ok(chunk) => trace!("chunk 0x{:x} @ {} ({} bytes)", chunk.id, chunk.offset, chunk.payload.len()),
            Err(_) => self.failed = true,
        }
        Some(chunk)
    }
}

/// A node of a chunk tree, as produced by [`walk_chunk_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkNode {
    pub id: u32,
    pub offset: usize,
    pub size: usize,
    pub children: Vec<ChunkNode>,
}

/// Builds the chunk tree of `data`. Payloads that parse as a complete chunk stream are descended into, but only up
/// to `max_depth` levels, everything below is kept as an opaque leaf.
pub fn walk_chunk_tree(data: &[u8], max_depth: usize) -> Result<Vec<ChunkNode>, ParserError> {
    walk_level(ChunkedReader::new(data), max_depth)
}

fn walk_level(rdr: ChunkedReader<'_>, depth_left: usize) -> Result<Vec<ChunkNode>, ParserError> {
    rdr.map(|chunk| -> Result<ChunkNode, ParserError> {
        let chunk = chunk?;
        let children = if depth_left > 0 && ChunkedReader::is_chunk_stream(chunk.payload) {
            walk_level(chunk.children(), depth_left - 1)?
        } else {
            Vec::new()
        };

        Ok(ChunkNode {
            id: chunk.id,
            offset: chunk.offset,
            size: chunk.payload.len(),
            children,
        })
    })
    .collect()
}

/// Append-only chunk stream writer.
#[derive(Debug, Default, Clone)]
pub struct ChunkedWriter {
    out: PackedWriter,
}

impl ChunkedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, id: u32, payload: &[u8]) -> &mut Self {
        debug_assert!(payload.len() <= u32::MAX as usize, "chunk payload exceeds the u32 size field");
        self.out.write_u32(id).write_u32(payload.len() as u32).write_bytes(payload);
        self
    }

    pub fn put_packed(&mut self, id: u32, payload: &PackedWriter) -> &mut Self {
        self.put(id, payload.as_bytes())
    }

    pub fn put_chunked(&mut self, id: u32, children: &ChunkedWriter) -> &mut Self {
        self.put(id, children.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.out.as_bytes()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.out.into_inner()
    }
}
