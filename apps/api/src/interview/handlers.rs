//! Axum route handlers for the Interview Chain API.
//!
//! Every action locks its session for the full operation (including the
//! generation call) and answers with the resulting snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::jd_parser::JobDescription;
use crate::interview::session::{Session, Stage, TranscriptEntry, MAX_INTERVIEW_TURNS};
use crate::interview::store::SessionHandle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub company: String,
    pub job_title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub candidate_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateResponse {
    pub text: String,
}

/// Everything the presentation layer needs to render the current step.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub stage: Stage,
    pub company: String,
    pub job_title: String,
    pub job_description: Option<JobDescription>,
    pub resume_text: Option<String>,
    pub turn_count: u32,
    pub max_turns: u32,
    pub transcript: Vec<TranscriptEntry>,
}

impl SessionSnapshot {
    fn capture(handle: &SessionHandle, session: &Session) -> Self {
        Self {
            session_id: handle.id,
            created_at: handle.created_at,
            stage: session.stage(),
            company: session.company().to_string(),
            job_title: session.job_title().to_string(),
            job_description: session.job_description().cloned(),
            resume_text: session.resume_text().map(str::to_string),
            turn_count: session.turn_count(),
            max_turns: MAX_INTERVIEW_TURNS,
            transcript: session.transcript().to_vec(),
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.sessions.create().await;
    let session = handle.session.lock().await;
    (
        StatusCode::CREATED,
        Json(SessionSnapshot::capture(&handle, &session)),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.session.lock().await;
    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/job-description
///
/// Step 1: generates a job description from company + job title.
pub async fn handle_submit_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.session.lock().await;

    state
        .chain
        .submit_job_request(&mut session, &request.company, &request.job_title)
        .await?;

    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}

/// POST /api/v1/sessions/:id/resume
///
/// Step 2: generates a resume tailored to the stored job description.
/// `candidate_name` is required unless the server invents names.
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.session.lock().await;

    state
        .chain
        .submit_resume_request(&mut session, request.candidate_name.as_deref())
        .await?;

    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}

/// POST /api/v1/sessions/:id/interview/start
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.session.lock().await;

    state.chain.start_interview(&mut session).await?;

    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}

/// POST /api/v1/sessions/:id/interview/responses
pub async fn handle_candidate_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CandidateResponse>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.session.lock().await;

    state
        .chain
        .submit_candidate_response(&mut session, &request.text)
        .await?;

    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.session.lock().await;

    state.chain.reset(&mut session);

    Ok(Json(SessionSnapshot::capture(&handle, &session)))
}
