//! Source format detection

use crate::error::{Result, ResumeMatcherError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
    Text,
    Markdown,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            "txt" | "text" => Some(SourceFormat::Text),
            "md" | "markdown" => Some(SourceFormat::Markdown),
            _ => None,
        }
    }

    /// Detect by file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            ResumeMatcherError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
        })?;

        Self::from_extension(extension).ok_or_else(|| {
            ResumeMatcherError::UnsupportedFormat(format!(
                "Unsupported file type '.{}' for: {}",
                extension,
                path.display()
            ))
        })
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Pdf => write!(f, "PDF"),
            SourceFormat::Docx => write!(f, "DOCX"),
            SourceFormat::Text => write!(f, "plain text"),
            SourceFormat::Markdown => write!(f, "Markdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(SourceFormat::from_path(Path::new("cv.PDF")).unwrap(), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_path(Path::new("cv.docx")).unwrap(), SourceFormat::Docx);
        assert_eq!(SourceFormat::from_path(Path::new("job.txt")).unwrap(), SourceFormat::Text);
        assert_eq!(SourceFormat::from_path(Path::new("cv.markdown")).unwrap(), SourceFormat::Markdown);
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert!(matches!(
            SourceFormat::from_path(Path::new("cv.doc")),
            Err(ResumeMatcherError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceFormat::from_path(Path::new("README")),
            Err(ResumeMatcherError::UnsupportedFormat(_))
        ));
    }
}
