//! Report rendering

pub mod formatter;

pub use formatter::{
    format_report, format_search_hits, resolve_save_path, save_report_to_file, suggest_filename, OutputFormatter,
    ReportGenerator,
};
