//! Interview chain: the forward-only state machine over a `Session`.
//!
//! Flow: job description → resume → interview opener →
//!       (candidate answer → follow-up) × 4 → candidate answer → closing.
//!
//! Each operation checks stage, then input, then the credential, and only then
//! builds a prompt and calls the generator. A failed call leaves the stage and
//! turn count untouched.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::jd_parser::parse_job_description;
use crate::interview::prompts::{
    build_closing_prompt, build_follow_up_prompt, build_interview_opener_prompt,
    build_job_description_prompt, build_resume_prompt, CandidateName,
};
use crate::interview::scrubber::scrub;
use crate::interview::session::{Session, Stage, MAX_INTERVIEW_TURNS};
use crate::llm_client::{Model, TextGenerator};

/// Where the candidate name in the generated resume comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResumeNamePolicy {
    /// The caller must supply a non-empty name.
    #[default]
    UserSupplied,
    /// Any supplied name is ignored; the model invents one.
    Generated,
}

impl FromStr for ResumeNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "user_supplied" => Ok(ResumeNamePolicy::UserSupplied),
            "generated" => Ok(ResumeNamePolicy::Generated),
            other => Err(format!(
                "unknown resume name policy '{other}' (expected 'user' or 'generated')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainSettings {
    pub model: Model,
    pub resume_name_policy: ResumeNamePolicy,
}

/// Drives a `Session` through the pipeline. Holds no session state itself,
/// so one instance serves every session.
#[derive(Clone)]
pub struct InterviewChain {
    generator: Arc<dyn TextGenerator>,
    settings: ChainSettings,
}

impl InterviewChain {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: ChainSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    /// Step 1: generate a job description for `job_title` at `company`.
    pub async fn submit_job_request(
        &self,
        session: &mut Session,
        company: &str,
        job_title: &str,
    ) -> Result<(), AppError> {
        require_stage(session, Stage::Idle, "generate a job description")?;
        let company = require_text(company, "company")?;
        let job_title = require_text(job_title, "job_title")?;
        self.require_credential()?;

        let prompt = build_job_description_prompt(company, job_title);
        let text = self.call("Job description generation", &prompt).await?;
        let job_description = parse_job_description(&text);

        info!(
            "Job description ready for '{}' at '{}' (structured={})",
            job_title,
            company,
            job_description.is_structured()
        );
        session.record_job_description(company, job_title, job_description);
        Ok(())
    }

    /// Step 2: generate a resume tailored to the stored job description.
    pub async fn submit_resume_request(
        &self,
        session: &mut Session,
        candidate_name: Option<&str>,
    ) -> Result<(), AppError> {
        require_stage(session, Stage::JobDescriptionReady, "generate a resume")?;
        if session.job_description().is_none() {
            return Err(AppError::Validation(
                "A job description is required before generating a resume".to_string(),
            ));
        }
        let candidate = match self.settings.resume_name_policy {
            ResumeNamePolicy::UserSupplied => CandidateName::Named(
                require_text(candidate_name.unwrap_or_default(), "candidate_name")?.to_string(),
            ),
            ResumeNamePolicy::Generated => CandidateName::Generated,
        };
        self.require_credential()?;

        let prompt = build_resume_prompt(session, &candidate)?;
        let resume = self.call("Resume generation", &prompt).await?;

        info!("Resume ready for '{}'", session.job_title());
        session.record_resume(resume);
        Ok(())
    }

    /// Step 3: open the interview with a greeting and a first question.
    pub async fn start_interview(&self, session: &mut Session) -> Result<(), AppError> {
        require_stage(session, Stage::ResumeReady, "start the interview")?;
        self.require_credential()?;

        let prompt = build_interview_opener_prompt(session)?;
        let opener = self.call("Interview opener", &prompt).await?;

        session.record_opener(scrub(&opener));
        info!("Interview started for '{}' (turn 1)", session.job_title());
        Ok(())
    }

    /// Records the candidate's answer, then asks a follow-up or, once
    /// `MAX_INTERVIEW_TURNS` questions have been asked, closes the interview.
    ///
    /// The answer is committed before the generator is called: if the call
    /// fails the answer stays in the transcript and nothing else changes.
    pub async fn submit_candidate_response(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), AppError> {
        require_stage(session, Stage::InterviewInProgress, "answer a question")?;
        if text.trim().is_empty() {
            return Err(AppError::Validation("Response cannot be empty".to_string()));
        }
        self.require_credential()?;

        session.push_candidate(text.to_string());

        if session.turn_count() >= MAX_INTERVIEW_TURNS {
            let prompt = build_closing_prompt(session);
            let closing = self.call("Interview closing", &prompt).await?;
            session.record_closing(scrub(&closing));
            info!(
                "Interview complete for '{}' after {} turns",
                session.job_title(),
                MAX_INTERVIEW_TURNS
            );
        } else {
            let prompt = build_follow_up_prompt(session)?;
            let question = self.call("Follow-up question", &prompt).await?;
            session.record_follow_up(scrub(&question));
            info!(
                "Follow-up asked (turn {}/{})",
                session.turn_count(),
                MAX_INTERVIEW_TURNS
            );
        }
        Ok(())
    }

    /// Valid from any stage.
    pub fn reset(&self, session: &mut Session) {
        info!("Session reset from stage {:?}", session.stage());
        session.reset();
    }

    fn require_credential(&self) -> Result<(), AppError> {
        if self.generator.is_configured() {
            Ok(())
        } else {
            Err(AppError::Configuration(
                "No API key configured (set OPENAI_API_KEY)".to_string(),
            ))
        }
    }

    async fn call(&self, step: &str, prompt: &str) -> Result<String, AppError> {
        self.generator
            .generate(prompt, self.settings.model)
            .await
            .map_err(|e| {
                warn!("{step} failed: {e}");
                AppError::from_llm(step, e)
            })
    }
}

fn require_stage(
    session: &Session,
    expected: Stage,
    operation: &'static str,
) -> Result<(), AppError> {
    if session.stage() == expected {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            operation,
            stage: session.stage(),
        })
    }
}

fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(format!("{field} cannot be empty")))
    } else {
        Ok(trimmed)
    }
}
