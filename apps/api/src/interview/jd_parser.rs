//! Job description artifact: a parsed structured record, or the raw model text when parsing fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::strip_json_fences;

/// The shape the job-description prompt asks the model to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredJobDescription {
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_range: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub location: String,
}

/// Generated job description as stored on the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JobDescription {
    Structured(StructuredJobDescription),
    Raw(String),
}

impl JobDescription {
    /// Text interpolated into every downstream prompt.
    /// Structured records are pretty-printed; raw text passes through verbatim.
    pub fn render_for_prompt(&self) -> Result<String, AppError> {
        match self {
            JobDescription::Structured(jd) => serde_json::to_string_pretty(jd).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to serialize job description: {e}"))
            }),
            JobDescription::Raw(text) => Ok(text.clone()),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, JobDescription::Structured(_))
    }
}

/// Best-effort parse of model output. Never fails: anything that is not a
/// complete structured record is kept verbatim as `Raw`.
pub fn parse_job_description(text: &str) -> JobDescription {
    match serde_json::from_str::<StructuredJobDescription>(strip_json_fences(text)) {
        Ok(jd) => JobDescription::Structured(jd),
        Err(e) => {
            debug!("Job description kept as raw text: {e}");
            JobDescription::Raw(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED_JD: &str = r#"{
        "title": "Backend Engineer",
        "type": "Hybrid, Full-time",
        "salary_range": "$140,000 - $175,000",
        "requirements": [
            "4+ years building backend services",
            "Proficiency in Go or Rust",
            "Experience with PostgreSQL"
        ],
        "responsibilities": [
            "Design and operate order-processing APIs",
            "Partner with the payments team on reliability"
        ],
        "location": "Austin, TX"
    }"#;

    #[test]
    fn test_structured_output_parses() {
        let jd = parse_job_description(STRUCTURED_JD);
        let JobDescription::Structured(parsed) = jd else {
            panic!("expected structured job description");
        };
        assert_eq!(parsed.title, "Backend Engineer");
        assert_eq!(parsed.job_type, "Hybrid, Full-time");
        assert_eq!(parsed.requirements.len(), 3);
        assert_eq!(
            parsed.responsibilities[1],
            "Partner with the payments team on reliability"
        );
        assert_eq!(parsed.location, "Austin, TX");
    }

    #[test]
    fn test_fenced_output_parses() {
        let fenced = format!("```json\n{STRUCTURED_JD}\n```");
        assert!(parse_job_description(&fenced).is_structured());
    }

    #[test]
    fn test_prose_falls_back_to_raw_verbatim() {
        let text = "**Backend Engineer at Acme**\n\nWe are looking for...";
        assert_eq!(
            parse_job_description(text),
            JobDescription::Raw(text.to_string())
        );
    }

    #[test]
    fn test_missing_field_falls_back_to_raw() {
        let text = r#"{"title": "Backend Engineer", "type": "Remote"}"#;
        assert_eq!(
            parse_job_description(text),
            JobDescription::Raw(text.to_string())
        );
    }

    #[test]
    fn test_extra_field_falls_back_to_raw() {
        let text = STRUCTURED_JD.replacen('{', r#"{"benefits": "401k","#, 1);
        assert!(!parse_job_description(&text).is_structured());
    }

    #[test]
    fn test_raw_fallback_keeps_fences() {
        let text = "```\nnot json at all\n```";
        assert_eq!(
            parse_job_description(text),
            JobDescription::Raw(text.to_string())
        );
    }

    #[test]
    fn test_render_structured_is_pretty_json_with_wire_names() {
        let jd = parse_job_description(STRUCTURED_JD);
        let rendered = jd.render_for_prompt().unwrap();
        assert!(rendered.starts_with("{\n  \"title\": \"Backend Engineer\""));
        assert!(rendered.contains("\"type\": \"Hybrid, Full-time\""));
        assert!(!rendered.contains("job_type"));

        let round: StructuredJobDescription = serde_json::from_str(&rendered).unwrap();
        assert_eq!(JobDescription::Structured(round), jd);
    }

    #[test]
    fn test_render_raw_passes_through() {
        let jd = JobDescription::Raw("Plain text JD".to_string());
        assert_eq!(jd.render_for_prompt().unwrap(), "Plain text JD");
    }

    #[test]
    fn test_snapshot_serialization_is_tagged() {
        let value = serde_json::to_value(JobDescription::Raw("text".to_string())).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "raw", "value": "text"}));
    }
}
