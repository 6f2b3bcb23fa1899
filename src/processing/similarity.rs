//! Requirement-coverage similarity between two lists of text items

use crate::error::Result;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Best candidate found for one reference item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCoverage {
    pub reference: String,
    pub best_candidate: String,
    pub similarity: f32,
}

/// Scores how well candidate items cover reference items.
///
/// Each reference item is matched to its most similar candidate and the best
/// similarities are averaged. The measure is one-directional: extra
/// candidates never lower the score.
#[derive(Clone)]
pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Mean best-match cosine similarity, clamped to [0, 1].
    ///
    /// Either list being empty scores 0 without calling the embedder.
    pub fn score(&self, candidates: &[String], references: &[String]) -> Result<f32> {
        let coverage = self.coverage(candidates, references)?;
        if coverage.is_empty() {
            return Ok(0.0);
        }

        let mean = coverage.iter().map(|c| c.similarity).sum::<f32>() / coverage.len() as f32;
        Ok(mean.clamp(0.0, 1.0))
    }

    /// Per-reference best matches, in reference order
    pub fn coverage(&self, candidates: &[String], references: &[String]) -> Result<Vec<ReferenceCoverage>> {
        if candidates.is_empty() || references.is_empty() {
            return Ok(Vec::new());
        }

        // One backend call for both sides
        let texts: Vec<String> = candidates.iter().chain(references).cloned().collect();
        let mut vectors = self.embedder.embed_many(&texts)?;
        let reference_vectors = vectors.split_off(candidates.len());
        let candidate_vectors = vectors;

        let mut coverage = Vec::with_capacity(references.len());
        for (reference, reference_vector) in references.iter().zip(&reference_vectors) {
            let mut best = (0, f32::NEG_INFINITY);
            for (i, candidate_vector) in candidate_vectors.iter().enumerate() {
                let similarity = cosine_similarity(reference_vector, candidate_vector)?;
                if similarity > best.1 {
                    best = (i, similarity);
                }
            }

            debug!("'{}' best matched '{}' ({:.3})", reference, candidates[best.0], best.1);
            coverage.push(ReferenceCoverage {
                reference: reference.clone(),
                best_candidate: candidates[best.0].clone(),
                similarity: best.1,
            });
        }

        Ok(coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeMatcherError;
    use crate::processing::embeddings::HashingEmbedder;

    /// Maps known words onto fixed axes so similarities are exact
    struct AxisEmbedder;

    impl Embedder for AxisEmbedder {
        fn name(&self) -> &str {
            "axis"
        }

        fn dimension(&self) -> usize {
            3
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| match t.as_str() {
                    "x" => vec![1.0, 0.0, 0.0],
                    "y" => vec![0.0, 1.0, 0.0],
                    "-x" => vec![-1.0, 0.0, 0.0],
                    "xy" => vec![1.0, 1.0, 0.0],
                    _ => vec![0.0, 0.0, 1.0],
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            3
        }

        fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(ResumeMatcherError::Embedding("backend unavailable".to_string()))
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_lists_score_zero() {
        let scorer = SimilarityScorer::new(Arc::new(FailingEmbedder));
        assert_eq!(scorer.score(&[], &strings(&["x"])).unwrap(), 0.0);
        assert_eq!(scorer.score(&strings(&["x"]), &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_mean_of_best_matches() {
        let scorer = SimilarityScorer::new(Arc::new(AxisEmbedder));
        // x is covered exactly, y has no similar candidate
        let score = scorer.score(&strings(&["x", "z"]), &strings(&["x", "y"])).unwrap();
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_score_is_one_directional() {
        let scorer = SimilarityScorer::new(Arc::new(AxisEmbedder));
        let covered = scorer.score(&strings(&["x", "y", "z"]), &strings(&["x"])).unwrap();
        let reversed = scorer.score(&strings(&["x"]), &strings(&["x", "y", "z"])).unwrap();

        assert!((covered - 1.0).abs() < 1e-6);
        assert!(reversed < covered);
    }

    #[test]
    fn test_negative_similarity_is_floored() {
        let scorer = SimilarityScorer::new(Arc::new(AxisEmbedder));
        assert_eq!(scorer.score(&strings(&["-x"]), &strings(&["x"])).unwrap(), 0.0);
    }

    #[test]
    fn test_coverage_reports_best_candidate() {
        let scorer = SimilarityScorer::new(Arc::new(AxisEmbedder));
        let coverage = scorer.coverage(&strings(&["y", "xy", "z"]), &strings(&["x"])).unwrap();

        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0].best_candidate, "xy");
        assert!((coverage[0].similarity - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_identical_items_score_one() {
        let scorer = SimilarityScorer::new(Arc::new(HashingEmbedder::new(512).unwrap()));
        let items = strings(&["Python", "FastAPI", "SQL"]);
        let score = scorer.score(&items, &items).unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_backend_failure_propagates() {
        let scorer = SimilarityScorer::new(Arc::new(FailingEmbedder));
        let result = scorer.score(&strings(&["x"]), &strings(&["x"]));
        assert!(matches!(result, Err(ResumeMatcherError::Embedding(_))));
    }
}
