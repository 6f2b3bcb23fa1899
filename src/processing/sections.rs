//! Header-based section extraction.
//!
//! Two strategies share the header-detection and span-slicing primitives:
//!
//! * [`GlobalHeaderScan`] finds every header of every section kind in one
//!   pass, sorts them by position, and gives each header the text up to the
//!   next header of *any* kind. Résumés use this.
//! * [`FieldBoundaryScan`] handles each field on its own: the first header of
//!   that field opens the span and the nearest header from the field's own
//!   terminator set closes it. Job postings use this.
//!
//! The strategies expect normalized input (see [`crate::processing::normalizer`]);
//! the `extract_*` entry points normalize for themselves.

use crate::error::{Result, ResumeMatcherError};
use crate::processing::document::{JobField, JobFields, ResumeSection, ResumeSections};
use crate::processing::normalizer::normalize;
use log::debug;
use regex::{Match, Regex};
use std::sync::OnceLock;

/// Capability shared by both extraction strategies
pub trait SectionExtractor {
    type Output;

    fn extract(&self, text: &str) -> Self::Output;
}

/// A line that consists only of one of the given header phrases.
///
/// Matching is case-insensitive and tolerates surrounding spaces and a
/// trailing colon. Phrases are regex fragments.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    regex: Regex,
}

impl HeaderPattern {
    pub fn new(phrases: &[&str]) -> Result<Self> {
        if phrases.is_empty() {
            return Err(ResumeMatcherError::Configuration(
                "header pattern needs at least one phrase".to_string(),
            ));
        }

        let pattern = format!(r"(?im)^[ \t]*(?:{})[ \t]*:?[ \t]*$", phrases.join("|"));
        let regex = Regex::new(&pattern).map_err(|e| {
            ResumeMatcherError::Configuration(format!("Invalid header pattern '{}': {}", pattern, e))
        })?;

        Ok(Self { regex })
    }

    fn builtin(phrases: &[&str]) -> Self {
        Self::new(phrases).expect("Invalid built-in header pattern")
    }

    fn find_iter<'r, 't>(&'r self, text: &'t str) -> regex::Matches<'r, 't> {
        self.regex.find_iter(text)
    }

    /// First header starting at or after byte offset `from`
    fn find_from<'t>(&self, text: &'t str, from: usize) -> Option<Match<'t>> {
        self.regex.find_at(text, from)
    }
}

/// Variant A: one pass over all section kinds
pub struct GlobalHeaderScan {
    patterns: Vec<(ResumeSection, HeaderPattern)>,
}

impl Default for GlobalHeaderScan {
    fn default() -> Self {
        Self::resume()
    }
}

impl GlobalHeaderScan {
    pub fn new(patterns: Vec<(ResumeSection, HeaderPattern)>) -> Self {
        Self { patterns }
    }

    /// Header vocabulary used for résumés
    pub fn resume() -> Self {
        Self::new(vec![
            (
                ResumeSection::Experience,
                HeaderPattern::builtin(&["experience", "employment", "work history"]),
            ),
            (
                ResumeSection::Education,
                HeaderPattern::builtin(&["education", "academic", "qualifications"]),
            ),
            (
                ResumeSection::Skills,
                HeaderPattern::builtin(&["skills", "technologies", "technical skills"]),
            ),
            (
                ResumeSection::Certifications,
                HeaderPattern::builtin(&["certifications?", "licenses?"]),
            ),
        ])
    }
}

impl SectionExtractor for GlobalHeaderScan {
    type Output = ResumeSections;

    fn extract(&self, text: &str) -> ResumeSections {
        let mut sections = ResumeSections::default();

        // (header start, header end, section)
        let mut headers: Vec<(usize, usize, ResumeSection)> = self
            .patterns
            .iter()
            .flat_map(|(section, pattern)| {
                pattern.find_iter(text).map(move |m| (m.start(), m.end(), *section))
            })
            .collect();

        if headers.is_empty() {
            debug!("No resume section headers found");
            return sections;
        }

        // Stable sort keeps pattern order for headers on the same position
        headers.sort_by_key(|(start, _, _)| *start);

        for (i, (_, header_end, section)) in headers.iter().enumerate() {
            let content_start = line_end(text, *header_end);
            let content_end = headers
                .get(i + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(text.len())
                .max(content_start);

            let items = split_items(&text[content_start..content_end]);
            debug!("Section {} header contributed {} items", section, items.len());
            sections.get_mut(*section).extend(items);
        }

        sections
    }
}

/// Header and terminator set for one job field
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub field: JobField,
    pub header: HeaderPattern,
    pub terminators: HeaderPattern,
}

/// Variant B: each field scanned independently against its own terminators
pub struct FieldBoundaryScan {
    fields: Vec<FieldPattern>,
}

impl Default for FieldBoundaryScan {
    fn default() -> Self {
        Self::job_posting()
    }
}

impl FieldBoundaryScan {
    pub fn new(fields: Vec<FieldPattern>) -> Self {
        Self { fields }
    }

    /// Header and terminator vocabulary used for job postings
    pub fn job_posting() -> Self {
        const REQUIRED: &[&str] = &[
            "requirements",
            "required skills",
            "what we look for",
            "qualifications",
        ];
        const PREFERRED: &[&str] = &["preferred skills", "nice to have", "bonus points", "desired"];
        const RESPONSIBILITIES: &[&str] = &[
            "responsibilities",
            "what you will do",
            "duties",
            "role overview",
        ];
        const BENEFITS: &str = "benefits";
        const ABOUT: &str = "about(?: us| the company| the role)?";

        let skill_terminators: Vec<&str> = RESPONSIBILITIES
            .iter()
            .chain(REQUIRED)
            .chain(PREFERRED)
            .copied()
            .chain(["preferred", BENEFITS, ABOUT])
            .collect();

        let responsibility_terminators: Vec<&str> = REQUIRED
            .iter()
            .chain(PREFERRED)
            .copied()
            .chain(["preferred", BENEFITS, ABOUT])
            .collect();

        Self::new(vec![
            FieldPattern {
                field: JobField::RequiredSkills,
                header: HeaderPattern::builtin(REQUIRED),
                terminators: HeaderPattern::builtin(&skill_terminators),
            },
            FieldPattern {
                field: JobField::PreferredSkills,
                header: HeaderPattern::builtin(PREFERRED),
                terminators: HeaderPattern::builtin(&skill_terminators),
            },
            FieldPattern {
                field: JobField::Responsibilities,
                header: HeaderPattern::builtin(RESPONSIBILITIES),
                terminators: HeaderPattern::builtin(&responsibility_terminators),
            },
        ])
    }

    /// Extract a single field; an unknown field or a missing header yields nothing
    pub fn extract_field(&self, text: &str, field: JobField) -> Vec<String> {
        self.fields
            .iter()
            .find(|p| p.field == field)
            .map(|p| extract_bounded(text, p))
            .unwrap_or_default()
    }
}

impl SectionExtractor for FieldBoundaryScan {
    type Output = JobFields;

    fn extract(&self, text: &str) -> JobFields {
        let mut fields = JobFields::default();
        for pattern in &self.fields {
            let items = extract_bounded(text, pattern);
            debug!("Field {} yielded {} items", pattern.field, items.len());
            *fields.get_mut(pattern.field) = items;
        }
        fields
    }
}

fn extract_bounded(text: &str, pattern: &FieldPattern) -> Vec<String> {
    let Some(header) = pattern.header.regex.find(text) else {
        return Vec::new();
    };

    let content_start = header.end();
    let content_end = pattern
        .terminators
        .find_from(text, content_start)
        .map(|m| m.start())
        .unwrap_or(text.len())
        .max(content_start);

    split_items(&text[content_start..content_end])
}

/// Byte offset just past the newline ending the line that contains `pos`
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|offset| pos + offset + 1)
        .unwrap_or(text.len())
}

/// Split a span into trimmed, bullet-free, non-empty lines
pub fn split_items(span: &str) -> Vec<String> {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    let bullet = BULLET.get_or_init(|| {
        Regex::new(r"^(?:(?:[-*•]\s*)+|\d+\.\s+)").expect("Invalid bullet regex")
    });

    span.lines()
        .map(|line| bullet.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn resume_scanner() -> &'static GlobalHeaderScan {
    static SCANNER: OnceLock<GlobalHeaderScan> = OnceLock::new();
    SCANNER.get_or_init(GlobalHeaderScan::resume)
}

fn job_scanner() -> &'static FieldBoundaryScan {
    static SCANNER: OnceLock<FieldBoundaryScan> = OnceLock::new();
    SCANNER.get_or_init(FieldBoundaryScan::job_posting)
}

/// Résumé sections using the built-in vocabulary
pub fn extract_resume_sections(text: &str) -> ResumeSections {
    resume_scanner().extract(&normalize(text))
}

/// Job posting fields using the built-in vocabulary
pub fn extract_job_fields(text: &str) -> JobFields {
    job_scanner().extract(&normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nBackend Engineer\nExperience\n- Built REST APIs using FastAPI\n- Managed SQL databases\nSkills:\n* Python\n* SQL\nEducation\nBSc Computer Science\nCertifications\n1. AWS Solutions Architect";

    #[test]
    fn test_resume_sections_in_order() {
        let sections = extract_resume_sections(RESUME);

        assert_eq!(sections.experience, vec!["Built REST APIs using FastAPI", "Managed SQL databases"]);
        assert_eq!(sections.skills, vec!["Python", "SQL"]);
        assert_eq!(sections.education, vec!["BSc Computer Science"]);
        assert_eq!(sections.certifications, vec!["AWS Solutions Architect"]);
    }

    #[test]
    fn test_crlf_input_finds_headers() {
        let sections = extract_resume_sections(&RESUME.replace('\n', "\r\n"));
        assert_eq!(sections.skills, vec!["Python", "SQL"]);

        let fields = extract_job_fields("Requirements\r\n- Rust\r\n- SQL\r\nResponsibilities\r\n- Build services");
        assert_eq!(fields.required_skills, vec!["Rust", "SQL"]);
        assert_eq!(fields.responsibilities, vec!["Build services"]);
    }

    #[test]
    fn test_repeated_header_appends() {
        let text = "Skills\nRust\nExperience\nEngineer at Acme\nSkills\nGo";
        let sections = extract_resume_sections(text);

        assert_eq!(sections.skills, vec!["Rust", "Go"]);
        assert_eq!(sections.experience, vec!["Engineer at Acme"]);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_own_line() {
        let text = "WORK HISTORY:\nEngineer\nI have great skills in Rust\nTECHNICAL SKILLS :\nRust";
        let sections = extract_resume_sections(text);

        assert_eq!(sections.experience, vec!["Engineer", "I have great skills in Rust"]);
        assert_eq!(sections.skills, vec!["Rust"]);
    }

    #[test]
    fn test_no_headers_gives_empty_sections() {
        let sections = extract_resume_sections("Just a paragraph about me.\nAnother line.");
        assert!(sections.is_empty());
        assert_eq!(sections.iter().count(), 4);
    }

    #[test]
    fn test_header_at_end_of_text() {
        let sections = extract_resume_sections("Intro\nSkills");
        assert!(sections.skills.is_empty());
    }

    #[test]
    fn test_resume_extraction_is_idempotent() {
        assert_eq!(extract_resume_sections(RESUME), extract_resume_sections(RESUME));
    }

    #[test]
    fn test_requirements_do_not_leak_into_responsibilities() {
        let text = "Backend Engineer\nRequirements\n- Python\n- FastAPI\n- SQL\nResponsibilities\n- Build REST APIs\n- Manage databases";
        let fields = extract_job_fields(text);

        assert_eq!(fields.required_skills, vec!["Python", "FastAPI", "SQL"]);
        assert_eq!(fields.responsibilities, vec!["Build REST APIs", "Manage databases"]);
        assert!(fields.preferred_skills.is_empty());
    }

    #[test]
    fn test_each_field_uses_its_own_terminators() {
        let text = "Responsibilities\n- Ship features\nBenefits\n- Remote\nRequirements\n- Rust\nNice to have:\n- Kubernetes\nAbout us\nWe are a startup";
        let fields = extract_job_fields(text);

        assert_eq!(fields.responsibilities, vec!["Ship features"]);
        assert_eq!(fields.required_skills, vec!["Rust"]);
        assert_eq!(fields.preferred_skills, vec!["Kubernetes"]);
    }

    #[test]
    fn test_first_header_occurrence_wins() {
        let text = "Requirements\n- Rust\nBenefits\n- Gym\nRequirements\n- Go";
        let scanner = FieldBoundaryScan::job_posting();

        assert_eq!(scanner.extract_field(text, JobField::RequiredSkills), vec!["Rust"]);
    }

    #[test]
    fn test_missing_field_header_is_empty() {
        let fields = extract_job_fields("We are hiring a Rust engineer.");
        assert_eq!(fields, JobFields::default());
    }

    #[test]
    fn test_bullet_stripping() {
        let items = split_items("- Rust\n•Go\n* * Python\n2. Docker\n3.5 years of Kubernetes\n-\n\n   ");
        assert_eq!(items, vec!["Rust", "Go", "Python", "Docker", "3.5 years of Kubernetes"]);
    }

    #[test]
    fn test_custom_pattern_rejects_invalid_regex() {
        assert!(HeaderPattern::new(&["skills("]).is_err());
        assert!(HeaderPattern::new(&[]).is_err());
    }
}
