//! Incremental UTF-8 decoding for chunked byte sources.
//!
//! A multi-byte sequence split across two reads is carried into the next
//! chunk instead of being decoded early. Invalid sequences decode to U+FFFD
//! so a bad byte never stalls the reader.

/// Stateful decoder fed with arbitrary byte chunks.
///
/// The carry holds at most one incomplete sequence (three bytes), so the
/// decoder never buffers more than a partial character between calls.
#[derive(Clone, Debug, Default)]
pub struct Utf8Decoder {
    carry: [u8; 4],
    carry_len: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of an incomplete sequence waiting for the next chunk.
    pub fn pending(&self) -> &[u8] {
        &self.carry[..self.carry_len]
    }

    /// Decode `bytes` and append the complete characters to `out`.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        let mut rest = bytes;

        // Resolve the carried prefix first by borrowing just enough bytes
        // from this chunk to complete it.
        while self.carry_len > 0 && !rest.is_empty() {
            let expected = utf8_seq_len(self.carry[0]);
            if expected == 0 {
                out.push('\u{FFFD}');
                self.carry_len = 0;
                break;
            }
            let needed = expected.saturating_sub(self.carry_len);
            let take = needed.min(rest.len());
            let end = self.carry_len + take;
            self.carry[self.carry_len..end].copy_from_slice(&rest[..take]);
            self.carry_len = end;
            rest = &rest[take..];
            if self.carry_len < expected {
                return;
            }
            let seq = self.carry;
            self.carry_len = 0;
            self.decode_into(&seq[..end], out);
        }

        if !rest.is_empty() {
            self.decode_into(rest, out);
        }
    }

    /// Flush a dangling incomplete sequence as U+FFFD so the stream is never
    /// silently truncated at end of input.
    pub fn finish(&mut self, out: &mut String) {
        if self.carry_len == 0 {
            return;
        }
        out.push_str(&String::from_utf8_lossy(&self.carry[..self.carry_len]));
        self.carry_len = 0;
    }

    fn decode_into(&mut self, mut bytes: &[u8], out: &mut String) {
        while !bytes.is_empty() {
            match std::str::from_utf8(bytes) {
                Ok(s) => {
                    out.push_str(s);
                    return;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&bytes[..valid_up_to]) {
                        out.push_str(valid);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push('\u{FFFD}');
                            bytes = &bytes[valid_up_to + len..];
                        }
                        None => {
                            // Incomplete trailing sequence: at most 3 bytes.
                            let tail = &bytes[valid_up_to..];
                            self.carry[..tail.len()].copy_from_slice(tail);
                            self.carry_len = tail.len();
                            return;
                        }
                    }
                }
            }
        }
    }
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
