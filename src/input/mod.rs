//! Input processing module
//! Handles format detection and text extraction from local files

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::SourceFormat;
pub use manager::{load_text, InputManager};
