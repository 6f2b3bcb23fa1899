//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Resume to job description matching tool")]
#[command(long_about = "Score how well a resume matches a job description using section extraction, embeddings and keyword overlap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Match {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown (defaults to the configured format)
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Save output to file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Generate tailoring suggestions
        #[arg(long)]
        suggest: bool,

        /// Ask the completion backend to rewrite the summary and experience bullets
        #[arg(long)]
        refine: bool,
    },

    /// Print the structured sections of a document as JSON
    Extract {
        /// Path to the document
        #[arg(short, long)]
        file: PathBuf,

        /// How to read the document
        #[arg(short, long, value_enum, default_value_t = DocumentKind::Resume)]
        kind: DocumentKind,
    },

    /// Split a document into overlapping chunks
    Chunk {
        /// Path to the document
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum characters per chunk (defaults to the configured size)
        #[arg(long)]
        size: Option<usize>,

        /// Characters shared by consecutive chunks (defaults to the configured overlap)
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Index documents and find the chunks nearest to a query
    Search {
        /// Documents to index
        #[arg(short, long, required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Query text
        #[arg(short, long)]
        query: String,

        /// Number of results (defaults to the configured top_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    Resume,
    Job,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::try_parse_from([
            "resume-matcher", "match", "--resume", "cv.pdf", "--job", "job.txt", "--output", "md", "--suggest",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { output, suggest, refine, .. } => {
                assert_eq!(output, Some(OutputFormat::Markdown));
                assert!(suggest);
                assert!(!refine);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_parse_search_with_several_files() {
        let cli = Cli::try_parse_from([
            "resume-matcher", "-v", "search", "--files", "a.txt", "b.md", "--query", "rust", "-k", "2",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Search { files, k, .. } => {
                assert_eq!(files.len(), 2);
                assert_eq!(k, Some(2));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_invalid_output_format() {
        assert!(parse_output_format("html").is_err());
        assert!(Cli::try_parse_from(["resume-matcher", "match", "-r", "a.txt", "-j", "b.txt", "-o", "pdf"]).is_err());
    }
}
