//! Embedding backends and vector math

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::{Result, ResumeMatcherError};
use anyhow::Context;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Text to fixed-dimension vector.
///
/// Implementations must be deterministic for a given model and return
/// vectors of [`Embedder::dimension`] length. Use the same instance for
/// indexing and querying so distances are comparable.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Backend call; prefer [`Embedder::embed_many`], which validates the output.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(ResumeMatcherError::Embedding(format!(
                "{} returned {} vectors for {} texts",
                self.name(),
                vectors.len(),
                texts.len()
            )));
        }

        let dimension = self.dimension();
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(ResumeMatcherError::Embedding(format!(
                    "{} returned a {}-dimensional vector, expected {}",
                    self.name(),
                    vector.len(),
                    dimension
                )));
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(ResumeMatcherError::Embedding(format!(
                    "{} returned a non-finite vector component",
                    self.name()
                )));
            }
        }

        Ok(vectors)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_many(&[text.to_string()])?
            .pop()
            .ok_or_else(|| ResumeMatcherError::Embedding("empty embedding batch".to_string()))
    }
}

/// Static Model2Vec embeddings
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
    batch_size: usize,
}

impl Model2VecEmbedder {
    /// Load from a local directory or a HuggingFace repo id
    pub fn load(model: &str, normalize: bool, batch_size: usize) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model: {}", model);

        let static_model = StaticModel::from_pretrained(
            Path::new(model),
            None, // token
            Some(normalize),
            None, // subfolder
        )
        .with_context(|| format!("Failed to load model '{}'", model))?;

        let dimension = static_model.encode_single("dimension probe").len();
        if dimension == 0 {
            return Err(ResumeMatcherError::Embedding(format!(
                "Model '{}' produced empty embeddings",
                model
            )));
        }

        info!(
            "Model loaded in {:.2?} ({} dimensions)",
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model: static_model,
            model_name: model.to_string(),
            dimension,
            batch_size: batch_size.max(1),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start_time = Instant::now();
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.model.encode(batch));
        }
        debug!("Encoded {} texts in {:.2?}", texts.len(), start_time.elapsed());
        Ok(vectors)
    }
}

/// Deterministic feature-hashing embedder.
///
/// Each lower-cased Unicode word contributes itself and its boundary-padded
/// character trigrams, hashed with FNV-1a into a signed bucket. The result is
/// L2-normalized; text without words maps to the zero vector. Needs no model
/// files, so it works offline.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(ResumeMatcherError::InvalidInput(
                "Hashing dimension must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.unicode_words() {
            let word = word.to_lowercase();
            self.add_feature(&mut vector, word.as_bytes());

            let padded: Vec<char> = std::iter::once('#')
                .chain(word.chars())
                .chain(std::iter::once('#'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, trigram.as_bytes());
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8]) {
        let hash = fnv1a(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Build the backend selected in configuration
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Model2vec => Ok(Arc::new(Model2VecEmbedder::load(
            &config.model,
            config.normalize,
            config.batch_size,
        )?)),
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(config.hashing_dimension)?)),
    }
}

/// Cosine similarity in [-1, 1]; zero-norm vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeMatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Euclidean distance
pub fn l2_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeMatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt())
}
