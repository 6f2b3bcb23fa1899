//! Structured document types produced by section extraction

use crate::error::{Result, ResumeMatcherError};
use crate::processing::normalizer::normalize;
use crate::processing::sections::{extract_job_fields, extract_resume_sections};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Section kinds recognised in a résumé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Skills,
    Experience,
    Education,
    Certifications,
}

impl ResumeSection {
    pub const ALL: [ResumeSection; 4] = [
        ResumeSection::Skills,
        ResumeSection::Experience,
        ResumeSection::Education,
        ResumeSection::Certifications,
    ];
}

/// Fields recognised in a job posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    RequiredSkills,
    PreferredSkills,
    Responsibilities,
}

impl JobField {
    pub const ALL: [JobField; 3] = [
        JobField::RequiredSkills,
        JobField::PreferredSkills,
        JobField::Responsibilities,
    ];
}

/// Every résumé section is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
}

impl ResumeSections {
    pub fn get(&self, section: ResumeSection) -> &[String] {
        match section {
            ResumeSection::Skills => &self.skills,
            ResumeSection::Experience => &self.experience,
            ResumeSection::Education => &self.education,
            ResumeSection::Certifications => &self.certifications,
        }
    }

    pub fn get_mut(&mut self, section: ResumeSection) -> &mut Vec<String> {
        match section {
            ResumeSection::Skills => &mut self.skills,
            ResumeSection::Experience => &mut self.experience,
            ResumeSection::Education => &mut self.education,
            ResumeSection::Certifications => &mut self.certifications,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResumeSection, &[String])> + '_ {
        ResumeSection::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }
}

/// Every job field is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFields {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl JobFields {
    pub fn get(&self, field: JobField) -> &[String] {
        match field {
            JobField::RequiredSkills => &self.required_skills,
            JobField::PreferredSkills => &self.preferred_skills,
            JobField::Responsibilities => &self.responsibilities,
        }
    }

    pub fn get_mut(&mut self, field: JobField) -> &mut Vec<String> {
        match field {
            JobField::RequiredSkills => &mut self.required_skills,
            JobField::PreferredSkills => &mut self.preferred_skills,
            JobField::Responsibilities => &mut self.responsibilities,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobField, &[String])> + '_ {
        JobField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub raw_text: String,
    pub sections: ResumeSections,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
    pub raw_text: String,
    pub fields: JobFields,
}

impl ResumeDocument {
    /// Normalize résumé text and split it into sections
    pub fn parse(text: &str) -> Result<Self> {
        let raw_text = normalize(text);
        if raw_text.is_empty() {
            return Err(ResumeMatcherError::InvalidInput(
                "resume contains no extractable text".to_string(),
            ));
        }

        let sections = extract_resume_sections(&raw_text);
        Ok(Self { raw_text, sections })
    }
}

impl JobDocument {
    /// Normalize a job description and extract its requirement fields
    pub fn analyze(text: &str) -> Result<Self> {
        let raw_text = normalize(text);
        if raw_text.is_empty() {
            return Err(ResumeMatcherError::InvalidInput(
                "job description is empty".to_string(),
            ));
        }

        let fields = extract_job_fields(&raw_text);
        Ok(Self { raw_text, fields })
    }
}

impl fmt::Display for ResumeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeSection::Skills => write!(f, "Skills"),
            ResumeSection::Experience => write!(f, "Experience"),
            ResumeSection::Education => write!(f, "Education"),
            ResumeSection::Certifications => write!(f, "Certifications"),
        }
    }
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobField::RequiredSkills => write!(f, "Required Skills"),
            JobField::PreferredSkills => write!(f, "Preferred Skills"),
            JobField::Responsibilities => write!(f, "Responsibilities"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_parse_normalizes_and_extracts() {
        let text = "Jane Doe\n\n\nSkills:\n-  Rust\n- Python\u{a0}3\n\nEducation\nBSc Computer Science";
        let doc = ResumeDocument::parse(text).unwrap();

        assert!(!doc.raw_text.contains("\n\n"));
        assert_eq!(doc.sections.skills, vec!["Rust", "Python 3"]);
        assert_eq!(doc.sections.education, vec!["BSc Computer Science"]);
        assert!(doc.sections.experience.is_empty());
    }

    #[test]
    fn test_blank_resume_is_invalid_input() {
        let result = ResumeDocument::parse(" \n\t ");
        assert!(matches!(result, Err(ResumeMatcherError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_job_is_invalid_input() {
        assert!(matches!(JobDocument::analyze(""), Err(ResumeMatcherError::InvalidInput(_))));
    }

    #[test]
    fn test_sections_serialize_with_all_keys() {
        let json = serde_json::to_value(ResumeSections::default()).unwrap();
        for key in ["skills", "experience", "education", "certifications"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }

        let json = serde_json::to_value(JobFields::default()).unwrap();
        for key in ["required_skills", "preferred_skills", "responsibilities"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_get_mut_targets_named_section() {
        let mut sections = ResumeSections::default();
        sections.get_mut(ResumeSection::Certifications).push("AWS SAA".to_string());

        assert_eq!(sections.get(ResumeSection::Certifications), ["AWS SAA".to_string()]);
        assert!(!sections.is_empty());
    }
}
