//! Text processing, embedding and match scoring

pub mod analyzer;
pub mod chunker;
pub mod document;
pub mod embeddings;
pub mod index;
pub mod matcher;
pub mod normalizer;
pub mod sections;
pub mod similarity;
