//! Session state for one run of the chain.
//!
//! Fields are only mutated through `InterviewChain`, which keeps the invariants:
//! - stage only moves forward (reset aside)
//! - `turn_count` equals the number of interviewer entries in the transcript
//! - the transcript is non-empty iff the interview has started

use serde::{Deserialize, Serialize};

use crate::interview::jd_parser::JobDescription;

/// Interviewer turns before the closing message.
pub const MAX_INTERVIEW_TURNS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    JobDescriptionReady,
    ResumeReady,
    InterviewInProgress,
    InterviewComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

impl Speaker {
    /// Label used when the transcript is replayed into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Interviewer => "Interviewer",
            Speaker::Candidate => "Candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    job_title: String,
    company: String,
    job_description: Option<JobDescription>,
    resume_text: Option<String>,
    turn_count: u32,
    transcript: Vec<TranscriptEntry>,
    stage: Stage,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn job_description(&self) -> Option<&JobDescription> {
        self.job_description.as_ref()
    }

    pub fn resume_text(&self) -> Option<&str> {
        self.resume_text.as_deref()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Restores every field to its initial value in one step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn record_job_description(
        &mut self,
        company: &str,
        job_title: &str,
        job_description: JobDescription,
    ) {
        self.company = company.to_string();
        self.job_title = job_title.to_string();
        self.job_description = Some(job_description);
        self.stage = Stage::JobDescriptionReady;
    }

    pub(crate) fn record_resume(&mut self, resume_text: String) {
        self.resume_text = Some(resume_text);
        self.stage = Stage::ResumeReady;
    }

    pub(crate) fn record_opener(&mut self, text: String) {
        self.push_interviewer(text);
        self.stage = Stage::InterviewInProgress;
    }

    pub(crate) fn record_follow_up(&mut self, text: String) {
        self.push_interviewer(text);
    }

    pub(crate) fn record_closing(&mut self, text: String) {
        self.push_interviewer(text);
        self.stage = Stage::InterviewComplete;
    }

    pub(crate) fn push_candidate(&mut self, text: String) {
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Candidate,
            text,
        });
    }

    fn push_interviewer(&mut self, text: String) {
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Interviewer,
            text,
        });
        self.turn_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interviewer_entries(session: &Session) -> u32 {
        session
            .transcript()
            .iter()
            .filter(|e| e.speaker == Speaker::Interviewer)
            .count() as u32
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new();
        assert_eq!(session.stage(), Stage::Idle);
        assert_eq!(session.turn_count(), 0);
        assert!(session.transcript().is_empty());
        assert!(session.job_description().is_none());
        assert!(session.resume_text().is_none());
        assert_eq!(session.company(), "");
        assert_eq!(session.job_title(), "");
    }

    #[test]
    fn test_stage_order_follows_pipeline() {
        assert!(Stage::Idle < Stage::JobDescriptionReady);
        assert!(Stage::JobDescriptionReady < Stage::ResumeReady);
        assert!(Stage::ResumeReady < Stage::InterviewInProgress);
        assert!(Stage::InterviewInProgress < Stage::InterviewComplete);
    }

    #[test]
    fn test_interviewer_entries_track_turn_count() {
        let mut session = Session::new();
        session.record_job_description("Acme", "SRE", JobDescription::Raw("jd".into()));
        session.record_resume("resume".into());
        session.record_opener("Hello".into());
        session.push_candidate("Hi".into());
        session.record_follow_up("Why?".into());

        assert_eq!(session.turn_count(), 2);
        assert_eq!(interviewer_entries(&session), session.turn_count());
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.stage(), Stage::InterviewInProgress);
    }

    #[test]
    fn test_reset_matches_fresh_session() {
        let mut session = Session::new();
        session.record_job_description("Acme", "SRE", JobDescription::Raw("jd".into()));
        session.record_resume("resume".into());
        session.record_opener("Hello".into());
        session.push_candidate("Hi".into());

        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_serializes_snake_case_stage_and_speaker() {
        let mut session = Session::new();
        session.record_job_description("Acme", "SRE", JobDescription::Raw("jd".into()));
        session.record_resume("resume".into());
        session.record_opener("Hello".into());

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["stage"], "interview_in_progress");
        assert_eq!(value["transcript"][0]["speaker"], "interviewer");
        assert_eq!(value["turn_count"], 1);
    }
}
