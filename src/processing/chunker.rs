//! Sliding-window chunking for embedding long text

use crate::config::ProcessingConfig;
use crate::error::{Result, ResumeMatcherError};
use serde::{Deserialize, Serialize};

/// One window of the source text. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ResumeMatcherError::InvalidInput(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn from_config(config: &ProcessingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into windows of at most `chunk_size` characters.
    ///
    /// A window that would end mid-text is pulled back to the last space
    /// after its start, if any. The next window starts `overlap` characters
    /// before the previous end. When that would not move past the previous
    /// start (a space found close to the start), the next window starts at
    /// the previous end instead, so starts always strictly increase and no
    /// text is skipped.
    pub fn chunks(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let mut end = start + self.chunk_size;
            if end >= total {
                chunks.push(make_chunk(&chars, chunks.len(), start, total));
                break;
            }

            if let Some(space) = (start + 1..end).rev().find(|&i| chars[i] == ' ') {
                end = space;
            }

            chunks.push(make_chunk(&chars, chunks.len(), start, end));

            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Chunk contents only
    pub fn split(&self, text: &str) -> Vec<String> {
        self.chunks(text).into_iter().map(|c| c.content).collect()
    }
}

fn make_chunk(chars: &[char], index: usize, start: usize, end: usize) -> TextChunk {
    TextChunk {
        index,
        start,
        end,
        content: chars[start..end].iter().collect(),
    }
}

/// Chunk with explicit parameters
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(chunk_size, overlap)?.split(text))
}
