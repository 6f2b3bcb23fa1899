//! Tailoring suggestions from an external text-completion backend

pub mod parser;
pub mod prompts;

use crate::config::SuggestionsConfig;
use crate::error::{Result, ResumeMatcherError};
use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

pub use parser::{parse_refinement, parse_suggestions};
pub use prompts::{build_refine_prompt, build_suggestion_prompt};

/// A language model, or anything else that answers a prompt with text
pub trait TextCompletion: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default = "Suggestion::general_section")]
    pub section: String,
    pub suggestion: String,
    #[serde(default)]
    pub justification: String,
}

impl Suggestion {
    pub const GENERAL_SECTION: &'static str = "General";

    fn general_section() -> String {
        Self::GENERAL_SECTION.to_string()
    }

    fn new(section: &str, suggestion: impl Into<String>, justification: &str) -> Self {
        Self {
            section: section.to_string(),
            suggestion: suggestion.into(),
            justification: justification.to_string(),
        }
    }
}

/// Suggestions tagged with how they were obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestionOutcome {
    /// The backend returned a JSON array
    Structured { suggestions: Vec<Suggestion> },
    /// The backend returned prose; suggestions were scraped from its list lines
    FallbackText {
        raw_text: String,
        suggestions: Vec<Suggestion>,
    },
    /// No backend, or the backend failed
    Templated { suggestions: Vec<Suggestion> },
}

impl SuggestionOutcome {
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            SuggestionOutcome::Structured { suggestions }
            | SuggestionOutcome::FallbackText { suggestions, .. }
            | SuggestionOutcome::Templated { suggestions } => suggestions,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SuggestionOutcome::Structured { .. } => "structured",
            SuggestionOutcome::FallbackText { .. } => "fallback_text",
            SuggestionOutcome::Templated { .. } => "templated",
        }
    }
}

/// Rewritten résumé content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refinement {
    pub summary: String,
    /// Markdown list of rewritten experience bullets
    pub experience: String,
}

/// Fixed advice derived from the missing skills alone
pub fn template_suggestions(missing_skills: &[String]) -> Vec<Suggestion> {
    if missing_skills.is_empty() {
        return vec![Suggestion::new(
            "Summary",
            "Emphasize your strong match in the professional summary.",
            "You have all required skills, so focus on leadership and impact.",
        )];
    }

    let top: Vec<&str> = missing_skills.iter().take(3).map(String::as_str).collect();
    vec![
        Suggestion::new(
            "Skills",
            format!("Add {} to your skills section.", top.join(", ")),
            "These are key requirements mentioned in the job description that are missing from your resume.",
        ),
        Suggestion::new(
            "Experience",
            "Highlight projects where you used these skills.",
            "Demonstrating practical application increases relevance score.",
        ),
    ]
}

/// Runs a shell command, writing the prompts to its stdin and reading the completion from stdout
pub struct CommandCompletion {
    command: String,
}

impl CommandCompletion {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl TextCompletion for CommandCompletion {
    fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn completion command `{}`", self.command))?;

        // Written while stdout drains; a command that never reads stdin closes it early
        let mut stdin = child.stdin.take().context("completion command has no stdin")?;
        let input = format!("{}\n\n{}", system, prompt);
        let writer = thread::spawn(move || match stdin.write_all(input.as_bytes()) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        });

        let output = child
            .wait_with_output()
            .context("failed to read completion output")?;
        writer
            .join()
            .map_err(|_| anyhow::anyhow!("prompt writer thread panicked"))?
            .context("failed to write prompt")?;
        anyhow::ensure!(
            output.status.success(),
            "completion command exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Produces suggestions through an optional completion backend.
///
/// Without a backend, or when it fails, suggestions come from
/// [`template_suggestions`]. Nothing here writes résumé content the backend
/// did not return.
#[derive(Clone, Default)]
pub struct SuggestionGenerator {
    backend: Option<Arc<dyn TextCompletion>>,
}

impl SuggestionGenerator {
    pub fn new(backend: Option<Arc<dyn TextCompletion>>) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &SuggestionsConfig) -> Self {
        let backend = config
            .command
            .as_ref()
            .map(|command| Arc::new(CommandCompletion::new(command.clone())) as Arc<dyn TextCompletion>);
        Self::new(backend)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn generate(&self, resume_text: &str, job_text: &str, missing_skills: &[String]) -> SuggestionOutcome {
        let Some(backend) = &self.backend else {
            return SuggestionOutcome::Templated {
                suggestions: template_suggestions(missing_skills),
            };
        };

        let prompt = build_suggestion_prompt(resume_text, job_text, missing_skills);
        match backend.complete(prompts::SUGGESTION_SYSTEM_PROMPT, &prompt) {
            Ok(text) if !text.trim().is_empty() => {
                info!("Received {} characters of suggestions", text.len());
                parse_suggestions(&text)
            }
            Ok(_) => {
                warn!("Completion backend returned nothing, using template suggestions");
                SuggestionOutcome::Templated {
                    suggestions: template_suggestions(missing_skills),
                }
            }
            Err(e) => {
                warn!("Completion backend failed, using template suggestions: {:#}", e);
                SuggestionOutcome::Templated {
                    suggestions: template_suggestions(missing_skills),
                }
            }
        }
    }

    /// Ask the backend to rewrite the summary and experience bullets.
    ///
    /// Unlike [`SuggestionGenerator::generate`] there is no template to fall
    /// back to, so every failure is an error.
    pub fn refine(&self, resume_text: &str, job_text: &str) -> Result<Refinement> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            ResumeMatcherError::Suggestion("no completion backend configured".to_string())
        })?;

        let prompt = build_refine_prompt(resume_text, job_text);
        let text = backend
            .complete(prompts::REFINE_SYSTEM_PROMPT, &prompt)
            .map_err(|e| ResumeMatcherError::Suggestion(format!("{:#}", e)))?;

        parse_refinement(&text).ok_or_else(|| {
            ResumeMatcherError::Suggestion("completion did not contain a refinement object".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedCompletion {
        response: anyhow::Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(anyhow::anyhow!("rate limited")),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextCompletion for ScriptedCompletion {
        fn complete(&self, _system: &str, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    fn missing() -> Vec<String> {
        vec!["kubernetes".to_string(), "go".to_string(), "terraform".to_string(), "aws".to_string()]
    }

    #[test]
    fn test_templates_with_missing_skills() {
        let suggestions = template_suggestions(&missing());

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].section, "Skills");
        assert_eq!(suggestions[0].suggestion, "Add kubernetes, go, terraform to your skills section.");
        assert_eq!(suggestions[1].section, "Experience");
    }

    #[test]
    fn test_templates_without_missing_skills() {
        let suggestions = template_suggestions(&[]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].section, "Summary");
    }

    #[test]
    fn test_no_backend_uses_templates() {
        let outcome = SuggestionGenerator::default().generate("resume", "job", &missing());
        assert!(matches!(outcome, SuggestionOutcome::Templated { .. }));
    }

    #[test]
    fn test_backend_failure_uses_templates() {
        let generator = SuggestionGenerator::new(Some(ScriptedCompletion::failing()));
        let outcome = generator.generate("resume", "job", &[]);

        assert_eq!(outcome.kind(), "templated");
        assert_eq!(outcome.suggestions()[0].section, "Summary");
    }

    #[test]
    fn test_backend_json_is_structured() {
        let backend = ScriptedCompletion::replying(r#"[{"section": "Skills", "suggestion": "Add Go"}]"#);
        let generator = SuggestionGenerator::new(Some(backend.clone()));
        let outcome = generator.generate("Python developer", "Go engineer", &missing());

        assert_eq!(outcome.kind(), "structured");
        assert_eq!(outcome.suggestions()[0].suggestion, "Add Go");

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("kubernetes, go, terraform, aws"));
        assert!(prompts[0].contains("Python developer"));
    }

    #[test]
    fn test_blank_backend_reply_uses_templates() {
        let generator = SuggestionGenerator::new(Some(ScriptedCompletion::replying("  \n")));
        assert_eq!(generator.generate("r", "j", &[]).kind(), "templated");
    }

    #[test]
    fn test_refine_requires_backend() {
        let result = SuggestionGenerator::default().refine("resume", "job");
        assert!(matches!(result, Err(ResumeMatcherError::Suggestion(_))));
    }

    #[test]
    fn test_refine_parses_backend_reply() {
        let backend = ScriptedCompletion::replying(r#"{"summary": "Rust engineer", "experience": "- Shipped"}"#);
        let refinement = SuggestionGenerator::new(Some(backend)).refine("resume", "job").unwrap();
        assert_eq!(refinement.summary, "Rust engineer");

        let generator = SuggestionGenerator::new(Some(ScriptedCompletion::replying("sorry")));
        assert!(matches!(generator.refine("r", "j"), Err(ResumeMatcherError::Suggestion(_))));
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = SuggestionOutcome::Templated {
            suggestions: template_suggestions(&[]),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["kind"], "templated");
        assert_eq!(json["suggestions"][0]["section"], "Summary");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_completion_pipes_prompt() {
        let backend = CommandCompletion::new("cat");
        let text = backend.complete("system", "prompt").unwrap();
        assert_eq!(text, "system\n\nprompt");

        let failing = CommandCompletion::new("exit 3");
        assert!(failing.complete("system", "prompt").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_completion_ignoring_stdin() {
        let backend = CommandCompletion::new("echo '[]'");
        let prompt = "x".repeat(200 * 1024);

        let text = backend.complete("system", &prompt).unwrap();
        assert_eq!(text.trim(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_completion_large_prompt_round_trips() {
        let backend = CommandCompletion::new("cat");
        let prompt = "y".repeat(200 * 1024);

        let text = backend.complete("s", &prompt).unwrap();
        assert_eq!(text.len(), prompt.len() + 3);
    }
}
