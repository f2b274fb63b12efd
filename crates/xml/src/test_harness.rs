use crate::error::XmlResult;
use crate::tree::TagTree;
use crate::{parse_reader, parse_str};
use std::fmt;
use std::io::{self, Read};

/// How a document is split into reads. Boundaries are byte offsets and may
/// fall inside a multi-byte character.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed { size: usize },
    Sizes { sizes: Vec<usize> },
    Boundaries { indices: Vec<usize> },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size } => write!(f, "fixed size={size}"),
            ChunkPlan::Sizes { sizes } => {
                write!(f, "sizes count={} sizes={sizes:?}", sizes.len())
            }
            ChunkPlan::Boundaries { indices } => {
                write!(f, "boundaries count={} indices={indices:?}", indices.len())
            }
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed { size }
    }

    pub fn sizes(sizes: impl Into<Vec<usize>>) -> Self {
        Self::Sizes {
            sizes: sizes.into(),
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
        }
    }

    /// Chunk lengths covering `len` bytes.
    pub fn chunk_lengths(&self, len: usize) -> Vec<usize> {
        let mut out = Vec::new();
        match self {
            ChunkPlan::Fixed { size } => {
                assert!(*size > 0, "chunk size must be > 0");
                let mut offset = 0usize;
                while offset < len {
                    let end = (offset + size).min(len);
                    out.push(end - offset);
                    offset = end;
                }
            }
            ChunkPlan::Sizes { sizes } => {
                let mut offset = 0usize;
                for size in sizes {
                    assert!(*size > 0, "chunk size must be > 0");
                    if offset >= len {
                        break;
                    }
                    let end = (offset + size).min(len);
                    out.push(end - offset);
                    offset = end;
                }
                if offset < len {
                    out.push(len - offset);
                }
            }
            ChunkPlan::Boundaries { indices } => {
                // Normalized: sorted, deduped, clipped to (0, len).
                let mut points = indices.clone();
                points.sort_unstable();
                points.dedup();
                points.retain(|&idx| idx > 0 && idx < len);
                let mut last = 0usize;
                for idx in points {
                    out.push(idx - last);
                    last = idx;
                }
                if last < len {
                    out.push(len - last);
                }
            }
        }
        out
    }
}

/// `Read` that returns at most one planned chunk per call, so every planned
/// boundary is observed by the character source.
pub struct ChunkedReader<'a> {
    bytes: &'a [u8],
    lengths: std::vec::IntoIter<usize>,
    pending: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(bytes: &'a [u8], plan: &ChunkPlan) -> Self {
        Self {
            bytes,
            lengths: plan.chunk_lengths(bytes.len()).into_iter(),
            pending: 0,
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending == 0 {
            match self.lengths.next() {
                Some(len) => self.pending = len,
                None => return Ok(0),
            }
        }
        let n = self.pending.min(buf.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        self.pending -= n;
        Ok(n)
    }
}

pub fn run_full(input: &str) -> XmlResult<TagTree> {
    parse_str(input)
}

pub fn run_chunked(input: &str, plan: &ChunkPlan) -> XmlResult<TagTree> {
    parse_reader(ChunkedReader::new(input.as_bytes(), plan))
}

pub fn default_chunk_plans() -> &'static [ChunkPlan] {
    static PLANS: std::sync::OnceLock<Vec<ChunkPlan>> = std::sync::OnceLock::new();
    PLANS.get_or_init(|| {
        let mut plans = Vec::new();
        for size in [1usize, 2, 3, 7, 64] {
            plans.push(ChunkPlan::fixed(size));
        }
        plans.push(ChunkPlan::sizes(vec![1, 1, 2, 1, 4, 8, 16, 3, 7]));
        plans.push(ChunkPlan::sizes(vec![2, 3, 1, 5, 1, 1, 9, 2]));
        plans.push(ChunkPlan::boundaries(vec![1, 2, 4, 5, 6, 7]));
        plans
    })
}

/// Fixed sizes plus cuts just before and after every markup character.
pub fn deterministic_chunk_plans(input: &str) -> Vec<ChunkPlan> {
    let mut plans: Vec<ChunkPlan> = [1usize, 2, 3, 4, 7, 16, 64]
        .into_iter()
        .map(ChunkPlan::fixed)
        .collect();
    let semantic = semantic_boundaries(input, 256);
    if !semantic.is_empty() {
        plans.push(ChunkPlan::boundaries(semantic));
    }
    plans
}

fn semantic_boundaries(input: &str, max: usize) -> Vec<usize> {
    let mut out = Vec::new();
    for (idx, byte) in input.bytes().enumerate() {
        if matches!(byte, b'<' | b'>' | b'/' | b'=' | b'"' | b'\'' | b'*' | b'\n' | b'\r') {
            out.push(idx);
            out.push(idx + 1);
        }
        if out.len() >= max {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_lengths_cover_input() {
        assert_eq!(ChunkPlan::fixed(3).chunk_lengths(7), vec![3, 3, 1]);
        assert_eq!(ChunkPlan::sizes(vec![1, 2]).chunk_lengths(6), vec![1, 2, 3]);
        assert_eq!(
            ChunkPlan::boundaries(vec![5, 0, 2, 2, 9]).chunk_lengths(6),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn chunked_reader_never_crosses_a_planned_boundary() {
        let mut reader = ChunkedReader::new(b"abcdef", &ChunkPlan::sizes(vec![2, 4]));
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"cdef");
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }
}
