//! Streaming UTF-8 decoding for text-frame relays.
//!
//! Upstream reads cut the byte stream at arbitrary points, so a multi-byte
//! character can straddle two reads. Text frames must be valid UTF-8, which
//! means the incomplete tail has to wait for the next read.

/// Incremental UTF-8 decoder.
///
/// Complete characters are emitted as soon as they arrive. An incomplete
/// trailing sequence is held back; bytes that can never be valid are
/// replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns all text that is complete so far.
    ///
    /// Returns `None` when the chunk only extended a held-back sequence.
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid: Vec<u8> = self.pending.drain(..err.valid_up_to()).collect();
                    out.push_str(&String::from_utf8_lossy(&valid));
                    match err.error_len() {
                        Some(bad) => {
                            self.pending = self.pending.split_off(bad);
                            out.push(char::REPLACEMENT_CHARACTER);
                        }
                        // Incomplete sequence at the end: wait for more.
                        None => break,
                    }
                }
            }
        }

        (!out.is_empty()).then_some(out)
    }

    /// Flushes whatever is held back, replacing it with U+FFFD.
    ///
    /// Call once the upstream reached end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(rest)
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
