//! In-memory nearest-neighbour index over embedded text

use crate::error::{Result, ResumeMatcherError};
use crate::processing::chunker::TextChunk;
use crate::processing::embeddings::{l2_distance, Embedder};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type Metadata = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedVector {
    pub id: u64,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    /// Euclidean distance to the query; lower is more similar
    pub distance: f32,
    pub metadata: Metadata,
}

#[derive(Default)]
struct IndexState {
    dimension: Option<usize>,
    next_id: u64,
    vectors: Vec<IndexedVector>,
    metadata: HashMap<u64, Metadata>,
}

impl IndexState {
    fn check_dimension(&self, len: usize) -> Result<()> {
        match self.dimension {
            Some(dimension) if dimension != len => Err(ResumeMatcherError::Embedding(format!(
                "Vector has {} dimensions, index holds {}",
                len, dimension
            ))),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, text: &str, vector: Vec<f32>, metadata: Metadata) -> Result<u64> {
        self.check_dimension(vector.len())?;
        self.dimension = Some(vector.len());

        let id = self.next_id;
        self.next_id += 1;

        let mut record = Metadata::new();
        record.insert("text".to_string(), Value::String(text.to_string()));
        record.extend(metadata);

        self.vectors.push(IndexedVector { id, vector });
        self.metadata.insert(id, record);
        Ok(id)
    }
}

/// Growing vector store shared by reference.
///
/// Embedding runs outside the lock; id assignment, vector insertion and the
/// metadata write happen under one write lock, so readers never see a
/// half-added entry. There is no removal, and ids are never reused.
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    state: RwLock<IndexState>,
}

impl EmbeddingIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Embed and store `text`, returning its id
    pub fn add(&self, text: &str, metadata: Metadata) -> Result<u64> {
        if text.trim().is_empty() {
            return Err(ResumeMatcherError::InvalidInput(
                "Cannot index empty text".to_string(),
            ));
        }

        let vector = self.embedder.embed(text)?;
        let id = self.write()?.insert(text, vector, metadata)?;
        debug!("Indexed entry {}", id);
        Ok(id)
    }

    /// Index every chunk of one source, tagging entries with `source` and chunk offsets.
    ///
    /// The chunks are embedded in one batch and inserted under a single lock,
    /// so their ids are consecutive.
    pub fn add_chunks(&self, source: &str, chunks: &[TextChunk]) -> Result<Vec<u64>> {
        let chunks: Vec<&TextChunk> = chunks.iter().filter(|c| !c.content.trim().is_empty()).collect();
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_many(&texts)?;

        let mut state = self.write()?;
        if let Some(vector) = vectors.first() {
            state.check_dimension(vector.len())?;
        }

        let mut ids = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            let mut metadata = Metadata::new();
            metadata.insert("source".to_string(), Value::from(source));
            metadata.insert("chunk_index".to_string(), Value::from(chunk.index));
            metadata.insert("start".to_string(), Value::from(chunk.start));
            metadata.insert("end".to_string(), Value::from(chunk.end));
            ids.push(state.insert(&chunk.content, vector, metadata)?);
        }

        debug!("Indexed {} chunks from {}", ids.len(), source);
        Ok(ids)
    }

    /// Up to `k` nearest entries by L2 distance, closest first.
    ///
    /// An empty index yields an empty result.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.is_empty()? {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query)?;
        let state = self.read()?;
        state.check_dimension(query_vector.len())?;

        let mut scored = state
            .vectors
            .iter()
            .map(|entry| Ok((entry.id, l2_distance(&query_vector, &entry.vector)?)))
            .collect::<Result<Vec<(u64, f32)>>>()?;
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let hits = scored
            .into_iter()
            .filter_map(|(id, distance)| {
                state.metadata.get(&id).map(|metadata| SearchHit {
                    id,
                    distance,
                    metadata: metadata.clone(),
                })
            })
            .take(k)
            .collect();

        Ok(hits)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.vectors.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Vector dimension, fixed by the first insert
    pub fn dimension(&self) -> Result<Option<usize>> {
        Ok(self.read()?.dimension)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexState>> {
        self.state
            .read()
            .map_err(|_| ResumeMatcherError::Index("index lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexState>> {
        self.state
            .write()
            .map_err(|_| ResumeMatcherError::Index("index lock poisoned".to_string()))
    }
}
