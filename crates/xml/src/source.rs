//! Buffered character source over any `Read`.
//!
//! Bytes are read in fixed chunks and decoded incrementally, so a character
//! split across two reads is never observed half-decoded. The tokenizer sees
//! the decoded window through `peek`/`bump` and, for bulk scans, `buffered`.

use crate::error::XmlResult;
use std::io::{self, Read};
use tools::utf8::Utf8Decoder;

const READ_CHUNK: usize = 8 * 1024;
// Consumed prefix is dropped once it grows past this many bytes.
const COMPACT_THRESHOLD: usize = 64 * 1024;

pub(crate) struct CharSource<R> {
    reader: R,
    decoder: Utf8Decoder,
    chunk: Box<[u8]>,
    buf: String,
    pos: usize,
    eof: bool,
}

impl<R: Read> CharSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: Utf8Decoder::new(),
            chunk: vec![0u8; READ_CHUNK].into_boxed_slice(),
            buf: String::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Next character without consuming it.
    pub(crate) fn peek(&mut self) -> XmlResult<Option<char>> {
        self.peek_nth(0)
    }

    /// Character `n` positions ahead of the cursor.
    pub(crate) fn peek_nth(&mut self, n: usize) -> XmlResult<Option<char>> {
        loop {
            if let Some(ch) = self.buf[self.pos..].chars().nth(n) {
                return Ok(Some(ch));
            }
            if !self.fill()? {
                return Ok(None);
            }
        }
    }

    /// Consume one character. Callers peek first, so an empty window is a no-op.
    pub(crate) fn bump(&mut self) {
        if let Some(ch) = self.buf[self.pos..].chars().next() {
            self.pos += ch.len_utf8();
        }
    }

    /// Decoded but not yet consumed text.
    pub(crate) fn buffered(&self) -> &str {
        &self.buf[self.pos..]
    }

    /// Consume `bytes` from the buffered window. Must land on a char boundary.
    pub(crate) fn consume(&mut self, bytes: usize) {
        debug_assert!(self.buf.is_char_boundary(self.pos + bytes));
        self.pos = (self.pos + bytes).min(self.buf.len());
    }

    /// Read and decode another chunk. Returns `false` once the reader is
    /// exhausted and nothing new was decoded.
    pub(crate) fn fill(&mut self) -> XmlResult<bool> {
        if self.eof {
            return Ok(false);
        }
        if self.pos >= COMPACT_THRESHOLD {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        let before = self.buf.len();
        loop {
            let read = match self.reader.read(&mut self.chunk) {
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if read == 0 {
                self.eof = true;
                self.decoder.finish(&mut self.buf);
                return Ok(self.buf.len() > before);
            }
            self.decoder.decode(&self.chunk[..read], &mut self.buf);
            if self.buf.len() > before {
                return Ok(true);
            }
            // The whole chunk was an incomplete sequence; keep reading.
        }
    }
}
