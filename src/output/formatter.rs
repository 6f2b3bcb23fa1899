//! Output formatters for match reports and search results

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::MatchReport;
use crate::processing::index::SearchHit;
use crate::suggestions::SuggestionOutcome;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for rendering a match report
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for a format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn verdict(score: f64) -> (&'static str, Color) {
    if score >= 75.0 {
        ("STRONG MATCH", Color::Green)
    } else if score >= 50.0 {
        ("PARTIAL MATCH", Color::Yellow)
    } else {
        ("WEAK MATCH", Color::Red)
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".blue().bold(), title.blue().bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn format_score(&self, label: &str, score: f64) -> String {
        let (_, color) = verdict(score);
        format!("  {:<18} {}\n", label, self.colorize(&format!("{:>6.2}%", score), color))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();
        let score = &report.match_score;
        let (badge, color) = verdict(score.overall_match);

        output.push_str(&self.format_header("RESUME MATCH ANALYSIS"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms
        ));

        output.push_str(&self.format_header("Score"));
        let overall = format!("{:.2}% [{}]", score.overall_match, badge);
        if self.use_colors {
            output.push_str(&format!("Overall match: {}\n", overall.color(color).bold()));
        } else {
            output.push_str(&format!("Overall match: {}\n", overall));
        }
        output.push_str(&self.format_score("Skills (40%)", score.components.skill_match));
        output.push_str(&self.format_score("Experience (40%)", score.components.experience_match));
        output.push_str(&self.format_score("Keywords (20%)", score.components.keyword_match));

        output.push_str(&self.format_header("Missing Skills"));
        if report.missing_skills.is_empty() {
            output.push_str(&format!("{}\n", self.colorize("None, every required skill is listed", Color::Green)));
        } else {
            for skill in &report.missing_skills {
                output.push_str(&format!("  {} {}\n", self.colorize("✗", Color::Red), skill));
            }
        }

        if let Some(outcome) = &report.suggestions {
            output.push_str(&self.format_header(&format!("Suggestions ({})", outcome.kind())));
            for (i, suggestion) in outcome.suggestions().iter().enumerate() {
                output.push_str(&format!(
                    "{}. [{}] {}\n",
                    i + 1,
                    self.colorize(&suggestion.section, Color::Cyan),
                    suggestion.suggestion
                ));
                if !suggestion.justification.is_empty() {
                    output.push_str(&format!("   {}\n", self.colorize(&suggestion.justification, Color::BrightBlack)));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();
        let score = &report.match_score;

        output.push_str("# Resume Match Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.processing_time_ms
            ));
        }

        output.push_str(&format!(
            "**Overall Match:** {:.2}% ({})\n\n",
            score.overall_match,
            verdict(score.overall_match).0.to_lowercase()
        ));

        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!("| Skills | {:.2}% | 40% |\n", score.components.skill_match));
        output.push_str(&format!("| Experience | {:.2}% | 40% |\n", score.components.experience_match));
        output.push_str(&format!("| Keywords | {:.2}% | 20% |\n\n", score.components.keyword_match));

        output.push_str("## Missing Skills\n\n");
        if report.missing_skills.is_empty() {
            output.push_str("None.\n\n");
        } else {
            for skill in &report.missing_skills {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        if let Some(outcome) = &report.suggestions {
            output.push_str("## Suggestions\n\n");
            if let SuggestionOutcome::Templated { .. } = outcome {
                output.push_str("_Generated from templates; no completion backend was used._\n\n");
            }
            for (i, suggestion) in outcome.suggestions().iter().enumerate() {
                output.push_str(&format!("{}. **{}**: {}\n", i + 1, suggestion.section, suggestion.suggestion));
                if !suggestion.justification.is_empty() {
                    output.push_str(&format!("   - _{}_\n", suggestion.justification));
                }
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a report in `format`; `color` only affects console output
pub fn format_report(report: &MatchReport, format: OutputFormat, color: bool) -> Result<String> {
    ReportGenerator::with_options(color, true, true).generate_report(report, format)
}

/// Render nearest-neighbour hits, closest first
pub fn format_search_hits(hits: &[SearchHit], color: bool) -> String {
    if hits.is_empty() {
        return "No results.\n".to_string();
    }

    let mut output = String::new();
    for (rank, hit) in hits.iter().enumerate() {
        let source = hit.metadata.get("source").and_then(|v| v.as_str()).unwrap_or("-");
        let text = hit.metadata.get("text").and_then(|v| v.as_str()).unwrap_or_default();
        let heading = format!("#{} {} (id {}, distance {:.4})", rank + 1, source, hit.id, hit.distance);

        if color {
            output.push_str(&format!("{}\n", heading.cyan().bold()));
        } else {
            output.push_str(&format!("{}\n", heading));
        }
        output.push_str(&format!("{}\n\n", text));
    }
    output
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Where `--save` writes: a directory gets a generated file name inside it
pub fn resolve_save_path(target: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, resume_name))
    } else {
        target.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

    match format {
        OutputFormat::Console => format!("{}_match_{}.txt", base_name, timestamp),
        OutputFormat::Json => format!("{}_match_{}.json", base_name, timestamp),
        OutputFormat::Markdown => format!("{}_match_{}.md", base_name, timestamp),
    }
}
