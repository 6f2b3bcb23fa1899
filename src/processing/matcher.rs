//! Weighted résumé-to-job match scoring

use crate::error::{Result, ResumeMatcherError};
use crate::processing::document::{JobDocument, ResumeDocument};
use crate::processing::embeddings::Embedder;
use crate::processing::similarity::SimilarityScorer;
use aho_corasick::AhoCorasick;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const SKILL_WEIGHT: f64 = 0.4;
pub const EXPERIENCE_WEIGHT: f64 = 0.4;
pub const KEYWORD_WEIGHT: f64 = 0.2;

/// Résumé side of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub raw_text: String,
}

/// Job side of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub required_skills: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl From<&ResumeDocument> for ResumeProfile {
    fn from(doc: &ResumeDocument) -> Self {
        Self {
            skills: doc.sections.skills.clone(),
            experience: doc.sections.experience.clone(),
            raw_text: doc.raw_text.clone(),
        }
    }
}

impl From<&JobDocument> for JobProfile {
    fn from(doc: &JobDocument) -> Self {
        Self {
            required_skills: doc.fields.required_skills.clone(),
            responsibilities: doc.fields.responsibilities.clone(),
        }
    }
}

/// Component percentages, each in [0, 100] with two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub skill_match: f64,
    pub experience_match: f64,
    pub keyword_match: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Weighted percentage in [0, 100]
    pub overall_match: f64,
    pub components: ScoreComponents,
}

impl MatchScore {
    /// Build from raw component fractions in [0, 1].
    ///
    /// Components are rounded first and the overall score is derived from the
    /// rounded values, so the reported numbers always satisfy
    /// `overall = round(0.4 * skill + 0.4 * experience + 0.2 * keyword, 2)`.
    pub fn from_fractions(skill: f64, experience: f64, keyword: f64) -> Self {
        let components = ScoreComponents {
            skill_match: to_percent(skill),
            experience_match: to_percent(experience),
            keyword_match: to_percent(keyword),
        };

        let overall_match = round2(
            SKILL_WEIGHT * components.skill_match
                + EXPERIENCE_WEIGHT * components.experience_match
                + KEYWORD_WEIGHT * components.keyword_match,
        );

        Self {
            overall_match,
            components,
        }
    }
}

fn to_percent(fraction: f64) -> f64 {
    round2(fraction.clamp(0.0, 1.0) * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combines skill similarity, experience similarity and keyword overlap.
///
/// Holds no mutable state; one scorer can serve concurrent requests.
#[derive(Clone)]
pub struct MatchScorer {
    similarity: SimilarityScorer,
}

impl MatchScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            similarity: SimilarityScorer::new(embedder),
        }
    }

    /// Score a résumé against a job. Empty skill or experience lists score 0
    /// for their component; an embedding failure fails the whole score.
    pub fn compute_score(&self, resume: &ResumeProfile, job: &JobProfile) -> Result<MatchScore> {
        let skill = self.similarity.score(&resume.skills, &job.required_skills)?;
        let experience = self.similarity.score(&resume.experience, &job.responsibilities)?;
        let keyword = keyword_match(&resume.raw_text, &job.required_skills)?;

        debug!(
            "Raw components: skills={:.4} experience={:.4} keywords={:.4}",
            skill, experience, keyword
        );

        Ok(MatchScore::from_fractions(
            f64::from(skill),
            f64::from(experience),
            keyword,
        ))
    }
}

/// Fraction of `keywords` appearing, case-insensitively, as substrings of `text`.
///
/// No keywords scores 0.
pub fn keyword_match(text: &str, keywords: &[String]) -> Result<f64> {
    if keywords.is_empty() {
        return Ok(0.0);
    }

    let found = keyword_hits(text, keywords)?;
    let count = found.iter().filter(|hit| **hit).count();
    Ok(count as f64 / keywords.len() as f64)
}

/// Per-keyword presence flags, in keyword order
fn keyword_hits(text: &str, keywords: &[String]) -> Result<Vec<bool>> {
    let haystack = text.to_lowercase();
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    // The empty string is a substring of everything
    let patterns: Vec<&str> = lowered
        .iter()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if patterns.is_empty() {
        return Ok(vec![true; keywords.len()]);
    }

    let matcher = AhoCorasick::new(&patterns).map_err(|e| {
        ResumeMatcherError::InvalidInput(format!("Failed to build keyword matcher: {}", e))
    })?;

    let present: HashSet<&str> = matcher
        .find_overlapping_iter(&haystack)
        .map(|m| patterns[m.pattern().as_usize()])
        .collect();

    Ok(lowered
        .iter()
        .map(|k| k.is_empty() || present.contains(k.as_str()))
        .collect())
}

/// Required skills with no case-insensitive equal among the résumé skills.
///
/// Keeps first-seen order and drops repeats; results are lower-cased.
pub fn missing_skills(resume_skills: &[String], required_skills: &[String]) -> Vec<String> {
    let have: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    let mut seen = HashSet::new();

    required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !have.contains(s))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
