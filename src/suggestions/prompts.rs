//! Prompt templates for the text-completion backend

pub const SUGGESTION_SYSTEM_PROMPT: &str = "You are an expert career coach and resume writer. \
Provide specific, actionable suggestions in JSON format.";

pub const REFINE_SYSTEM_PROMPT: &str = "You are an expert professional resume writer. \
Rewrite the resume content to be more impactful and relevant to the job description. Output purely JSON.";

const SUGGESTION_TEMPLATE: &str = r#"You are an expert career coach and resume writer.
I will provide you with a Resume and a Job Description.
Your goal is to provide specific, actionable suggestions to tailor the resume for this job.

### Job Description
{job}... (truncated)

### Resume
{resume}... (truncated)

### Missing Skills Detected
{missing}

### Instructions
1. Analyze the gap between the resume and the job description.
2. Provide 3 specific suggestions to improve the resume.
3. Suggestions should not fabricate experience, but highlight relevant existing experience.
4. Output MUST be in valid JSON format:
[
  {
    "section": "Target Section (e.g., Skills, Experience)",
    "suggestion": "Actionable advice...",
    "justification": "Why this matters..."
  }
]"#;

const REFINE_TEMPLATE: &str = r#"You are an expert resume writer.
I will provide a Resume and a Job Description.
Rewrite the "Professional Summary" and improve 3 key "Experience" bullet points to better match the job description.

### Job Description
{job}

### Resume
{resume}

### Instructions
1. Rewrite the **Professional Summary** to highlight relevant skills and experience for this specific job.
2. Select 3 existing experience bullet points and rewrite them to be more results-oriented and relevant to the job.
3. Output MUST be in valid JSON format with these exact keys:
{
  "summary": "Rewritten summary text...",
  "experience": "Markdown list of 3 rewritten bullet points..."
}"#;

const SUGGESTION_CONTEXT_CHARS: usize = 1000;
const REFINE_JOB_CHARS: usize = 1500;
const REFINE_RESUME_CHARS: usize = 2000;

/// Prompt asking for a JSON array of tailoring suggestions
pub fn build_suggestion_prompt(resume_text: &str, job_text: &str, missing_skills: &[String]) -> String {
    let missing = if missing_skills.is_empty() {
        "None - good match!".to_string()
    } else {
        missing_skills.join(", ")
    };

    render(
        SUGGESTION_TEMPLATE,
        &[
            ("{job}", truncate_chars(job_text, SUGGESTION_CONTEXT_CHARS)),
            ("{resume}", truncate_chars(resume_text, SUGGESTION_CONTEXT_CHARS)),
            ("{missing}", missing.as_str()),
        ],
    )
}

/// Prompt asking for a rewritten summary and experience bullets as a JSON object
pub fn build_refine_prompt(resume_text: &str, job_text: &str) -> String {
    render(
        REFINE_TEMPLATE,
        &[
            ("{job}", truncate_chars(job_text, REFINE_JOB_CHARS)),
            ("{resume}", truncate_chars(resume_text, REFINE_RESUME_CHARS)),
        ],
    )
}

/// Substitute placeholders in one pass over the template; inserted values are never rescanned
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some((at, key, value)) = values
        .iter()
        .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
        .min_by_key(|(at, _, _)| *at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }

    out.push_str(rest);
    out
}

/// Longest prefix of at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
