//! Input manager routing files to their extractor

use crate::error::{Result, ResumeMatcherError};
use crate::input::file_detector::SourceFormat;
use crate::input::text_extractor::{DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::normalizer::normalize;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads normalized text from local files, caching by path
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        let text = load_text(path).await?;
        self.cache.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Read a file and return its normalized text.
///
/// A missing file is `InvalidInput`; an unknown extension is `UnsupportedFormat`.
pub async fn load_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ResumeMatcherError::InvalidInput(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let format = SourceFormat::from_path(path)?;
    info!("Reading {} file: {}", format, path.display());

    let raw = match format {
        SourceFormat::Pdf => PdfExtractor.extract(path).await?,
        SourceFormat::Docx => DocxExtractor.extract(path).await?,
        SourceFormat::Text => PlainTextExtractor.extract(path).await?,
        SourceFormat::Markdown => MarkdownExtractor.extract(path).await?,
    };

    Ok(normalize(&raw))
}
