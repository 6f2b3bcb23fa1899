//! Resume matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod suggestions;

pub use config::Config;
pub use error::{Result, ResumeMatcherError};
pub use processing::analyzer::{MatchAnalyzer, MatchReport};
pub use processing::chunker::{chunk, Chunker, TextChunk};
pub use processing::document::{JobDocument, JobFields, ResumeDocument, ResumeSections};
pub use processing::embeddings::{build_embedder, Embedder, HashingEmbedder, Model2VecEmbedder};
pub use processing::index::{EmbeddingIndex, Metadata, SearchHit};
pub use processing::matcher::{missing_skills, JobProfile, MatchScore, MatchScorer, ResumeProfile};
pub use processing::normalizer::normalize;
pub use processing::sections::{extract_job_fields, extract_resume_sections};
pub use processing::similarity::SimilarityScorer;
pub use suggestions::{SuggestionGenerator, SuggestionOutcome, TextCompletion};
