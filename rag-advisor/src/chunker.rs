//! Fixed-size sliding-window chunking.
//!
//! Windows are measured in characters (Unicode scalar values) and never split a
//! UTF-8 sequence. Consecutive windows overlap by exactly `overlap` characters;
//! the last window may be shorter than `max_len`.

use crate::error::{RagError, Result};

/// Default window length used by the advisory pipeline.
pub const DEFAULT_CHUNK_SIZE: usize = 200;
/// Default overlap between consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Chunking parameters. Invariant once validated: `max_len > overlap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub max_len: usize,
    pub overlap: usize,
}

impl ChunkConfig {
    /// Builds a validated config.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] unless `max_len > overlap >= 0` and `max_len > 0`.
    pub fn new(max_len: usize, overlap: usize) -> Result<Self> {
        let cfg = Self { max_len, overlap };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk size must be greater than zero".into(),
            ));
        }
        if self.overlap >= self.max_len {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.max_len
            )));
        }
        Ok(())
    }

    /// Splits `text` with these parameters. See [`split`].
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        split(text, self.max_len, self.overlap)
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Splits `text` into windows of up to `max_len` characters, advancing by
/// `max_len - overlap` characters per step.
///
/// Empty text yields no chunks; any other text no longer than `max_len` yields
/// exactly one chunk equal to the text.
///
/// # Errors
/// [`RagError::InvalidConfiguration`] if the parameters are invalid.
///
/// # Example
/// ```
/// let chunks = rag_advisor::chunker::split("abcdefgh", 4, 1).unwrap();
/// assert_eq!(chunks, ["abcd", "defg", "gh"]);
/// ```
pub fn split(text: &str, max_len: usize, overlap: usize) -> Result<Vec<String>> {
    ChunkConfig { max_len, overlap }.validate()?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every char boundary, including the end of the text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = bounds.len() - 1;

    if char_len <= max_len {
        return Ok(vec![text.to_string()]);
    }

    let step = max_len - overlap;
    let mut chunks = Vec::with_capacity(char_len.div_ceil(step));
    let mut start = 0usize;
    loop {
        let end = (start + max_len).min(char_len);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == char_len {
            break;
        }
        start += step;
    }

    Ok(chunks)
}
