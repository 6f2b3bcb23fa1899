//! End-to-end résumé/job match analysis

use crate::error::Result;
use crate::processing::document::{JobDocument, JobFields, ResumeDocument, ResumeSections};
use crate::processing::embeddings::Embedder;
use crate::processing::matcher::{missing_skills, JobProfile, MatchScore, MatchScorer, ResumeProfile};
use crate::suggestions::{SuggestionGenerator, SuggestionOutcome};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_score: MatchScore,
    /// Required skills absent from the résumé's skill list, lower-cased
    pub missing_skills: Vec<String>,
    pub suggestions: Option<SuggestionOutcome>,
    pub resume_sections: ResumeSections,
    pub job_fields: JobFields,
    pub resume_text: String,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// Parses both documents, scores them and gathers the gap analysis
#[derive(Clone)]
pub struct MatchAnalyzer {
    scorer: MatchScorer,
    suggestions: SuggestionGenerator,
}

impl MatchAnalyzer {
    pub fn new(embedder: Arc<dyn Embedder>, suggestions: SuggestionGenerator) -> Self {
        Self {
            scorer: MatchScorer::new(embedder),
            suggestions,
        }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn suggestions(&self) -> &SuggestionGenerator {
        &self.suggestions
    }

    /// Analyze raw résumé and job text.
    ///
    /// Either text being blank is an `InvalidInput` error. Suggestions are
    /// only produced when asked for.
    pub fn analyze(&self, resume_text: &str, job_text: &str, with_suggestions: bool) -> Result<MatchReport> {
        let resume = ResumeDocument::parse(resume_text)?;
        let job = JobDocument::analyze(job_text)?;
        self.analyze_documents(&resume, &job, with_suggestions)
    }

    pub fn analyze_documents(
        &self,
        resume: &ResumeDocument,
        job: &JobDocument,
        with_suggestions: bool,
    ) -> Result<MatchReport> {
        let start_time = Instant::now();

        let match_score = self
            .scorer
            .compute_score(&ResumeProfile::from(resume), &JobProfile::from(job))?;
        let missing = missing_skills(&resume.sections.skills, &job.fields.required_skills);

        info!(
            "Match score {:.2}% ({} required skills missing)",
            match_score.overall_match,
            missing.len()
        );

        let suggestions = with_suggestions.then(|| {
            self.suggestions
                .generate(&resume.raw_text, &job.raw_text, &missing)
        });

        Ok(MatchReport {
            match_score,
            missing_skills: missing,
            suggestions,
            resume_sections: resume.sections.clone(),
            job_fields: job.fields.clone(),
            resume_text: resume.raw_text.clone(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        })
    }
}
