//! Prompt templates and builders for each stage of the chain.
//!
//! Every builder is pure: it reads the session (plus any newly entered input)
//! and returns the exact prompt string for that stage.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::AppError;
use crate::interview::session::{Session, TranscriptEntry};
use crate::llm_client::prompts::{NO_GENERIC_NAMES_INSTRUCTION, NO_PLACEHOLDERS_INSTRUCTION};

/// Job description prompt. Replace: {job_title}, {company}.
/// Requests strict JSON matching `StructuredJobDescription`.
pub const JOB_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Create a detailed job description for a **{job_title}** role at **{company}**, in structured JSON format.

### Guidelines:
- The job description must be tailored specifically to **{job_title}** at **{company}**.
- Include industry-relevant **requirements** and **responsibilities**.
- Mention technologies or tools this company might use.
- Use job market insights to define salary and job type.
- [STRICTLY] Structure the response exactly as follows:
{
    "title": "{job_title}",
    "type": "<Specify Remote/Hybrid/Onsite, Full-time/Part-time based on the role>",
    "salary_range": "<Generate a realistic salary range>",
    "requirements": [
        "<Years of experience required>",
        "<Key skills and domain expertise>",
        "<Commonly required certifications (if any)>",
        "<Additional 2-3 role-specific qualifications>"
    ],
    "responsibilities": [
        "<Core daily tasks>",
        "<Collaboration aspects>",
        "<Technical or managerial expectations>",
        "<2-3 additional responsibilities for this role>"
    ],
    "location": "<Generate a realistic location>"
}"#;

/// Resume prompt. Replace: {candidate_clause}, {no_generic_names}, {job_description}.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer.

Generate a realistic, professional resume tailored to the following job description {candidate_clause}.

Include realistic company names, job titles, universities, and certifications relevant to the role.

{no_generic_names} The resume should include:

- Contact Information (use realistic but fake values)
- Summary
- Work Experience (include realistic company names, locations, dates, responsibilities)
- Education (realistic universities and degrees)
- Skills
- Certifications

Job Description:
{job_description}"#;

/// Interview opener prompt.
/// Replace: {company}, {job_title}, {no_placeholders}, {resume}, {job_description}.
pub const INTERVIEW_OPENER_PROMPT_TEMPLATE: &str = r#"You are a recruiter for {company} hiring a {job_title}.

{no_placeholders}

Greet the candidate and ask about a specific relevant experience from their resume.

Candidate Resume:
{resume}

Job Description:
{job_description}"#;

/// Follow-up question prompt.
/// Replace: {job_title}, {company}, {no_placeholders_list_item}, {conversation}, {job_description}.
pub const INTERVIEW_FOLLOW_UP_PROMPT_TEMPLATE: &str = r#"Continue the interview for {job_title} at {company}.

Based on the following conversation, generate ONLY ONE follow-up question.

IMPORTANT:
1. {no_placeholders_list_item}
2. Do NOT prefix your response with "Interviewer:" - just ask your question directly.
3. Use the actual company name ({company}).

Interview so far:
{conversation}

Job Description:
{job_description}"#;

/// Closing message prompt. Replace: {job_title}, {no_placeholders}.
pub const INTERVIEW_CLOSING_PROMPT_TEMPLATE: &str = r#"The interview for {job_title} has concluded.
Write a short thank-you message to the candidate.

{no_placeholders}"#;

/// Who the resume is written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateName {
    Named(String),
    /// The model invents a realistic name.
    Generated,
}

impl CandidateName {
    fn clause(&self) -> String {
        match self {
            CandidateName::Named(name) => format!("for a candidate named **{name}**"),
            CandidateName::Generated => "for a fictional candidate. Invent a realistic full name \
                for the candidate and use it consistently throughout the resume"
                .to_string(),
        }
    }
}

pub fn build_job_description_prompt(company: &str, job_title: &str) -> String {
    fill_template(
        JOB_DESCRIPTION_PROMPT_TEMPLATE,
        &[("job_title", job_title), ("company", company)],
    )
}

pub fn build_resume_prompt(
    session: &Session,
    candidate: &CandidateName,
) -> Result<String, AppError> {
    Ok(fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("candidate_clause", &candidate.clause()),
            ("no_generic_names", NO_GENERIC_NAMES_INSTRUCTION),
            ("job_description", &rendered_job_description(session)?),
        ],
    ))
}

pub fn build_interview_opener_prompt(session: &Session) -> Result<String, AppError> {
    Ok(fill_template(
        INTERVIEW_OPENER_PROMPT_TEMPLATE,
        &[
            ("no_placeholders", NO_PLACEHOLDERS_INSTRUCTION),
            ("company", session.company()),
            ("job_title", session.job_title()),
            ("job_description", &rendered_job_description(session)?),
            ("resume", session.resume_text().unwrap_or_default()),
        ],
    ))
}

pub fn build_follow_up_prompt(session: &Session) -> Result<String, AppError> {
    let list_item = NO_PLACEHOLDERS_INSTRUCTION
        .strip_prefix("IMPORTANT: ")
        .unwrap_or(NO_PLACEHOLDERS_INSTRUCTION);

    Ok(fill_template(
        INTERVIEW_FOLLOW_UP_PROMPT_TEMPLATE,
        &[
            ("no_placeholders_list_item", list_item),
            ("job_title", session.job_title()),
            ("company", session.company()),
            ("job_description", &rendered_job_description(session)?),
            ("conversation", &render_transcript(session.transcript())),
        ],
    ))
}

pub fn build_closing_prompt(session: &Session) -> String {
    fill_template(
        INTERVIEW_CLOSING_PROMPT_TEMPLATE,
        &[
            ("no_placeholders", NO_PLACEHOLDERS_INSTRUCTION),
            ("job_title", session.job_title()),
        ],
    )
}

static TEMPLATE_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("invalid template field regex"));

/// Substitutes `{name}` fields in one pass over the template.
/// Inserted values are never scanned again; unknown fields are left as written.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    TEMPLATE_FIELD_RE
        .replace_all(template, |caps: &Captures| {
            fields
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Renders the transcript as alternating `Interviewer:` / `Candidate:` lines.
pub fn render_transcript(transcript: &[TranscriptEntry]) -> String {
    transcript
        .iter()
        .map(|entry| format!("{}: {}", entry.speaker.label(), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rendered_job_description(session: &Session) -> Result<String, AppError> {
    session
        .job_description()
        .map(|jd| jd.render_for_prompt())
        .transpose()
        .map(Option::unwrap_or_default)
}
