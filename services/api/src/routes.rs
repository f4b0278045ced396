use crate::{error::ApiError, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use interview_core::{
    FinalResult, Interview, JobProfile, Question, Step, assessor::generate_question_set,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub question_index: usize,
    pub question: Question,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// When set, the answer is rejected unless this question is the one
    /// awaiting an answer. Guards against duplicate submissions.
    #[serde(default)]
    pub question_index: Option<usize>,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnswerResponse {
    Next {
        question_index: usize,
        question: Question,
    },
    Finished {
        result: FinalResult,
    },
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn create(
    State(state): State<AppState>,
    Json(profile): Json<JobProfile>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    profile.validate()?;
    let questions = generate_question_set(state.assessors.generator.as_ref(), &profile).await?;
    let mut interview = Interview::new(state.assessors.evaluator.clone(), profile.job_context())
        .with_evaluation_timeout(state.evaluation_timeout);
    let question = interview.start(questions).await?;

    let session_id = uuid::Uuid::new_v4().to_string();
    state.insert(session_id.clone(), interview).await;
    tracing::info!(%session_id, "Interview session started for '{}'", profile.job_title);

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            question_index: 0,
            question,
        }),
    ))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let interview = state
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {session_id}")))?;

    // Held for the whole evaluation: a second answer arriving meanwhile is
    // refused instead of queueing up for the next question.
    let mut interview = interview.try_lock_owned().map_err(|_| {
        ApiError::Conflict(format!(
            "An answer for session {session_id} is still being evaluated"
        ))
    })?;

    // The evaluation runs in its own task so a dropped request cannot leave
    // the session stuck mid-evaluation.
    let step = tokio::spawn(async move {
        match request.question_index {
            Some(index) => interview.submit_answer_at(index, request.answer).await,
            None => interview.submit_answer(request.answer).await,
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Answer task failed: {e}")))??;

    let response = match step {
        Step::Next { index, question } => AnswerResponse::Next {
            question_index: index,
            question,
        },
        Step::Finished(result) => {
            tracing::info!(%session_id, "Interview finished with score {}", result.final_score);
            AnswerResponse::Finished { result }
        }
    };
    Ok(Json(response))
}

pub async fn result(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FinalResult>, ApiError> {
    let interview = state
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {session_id}")))?;
    let interview = interview.lock().await;
    Ok(Json(interview.result()?.clone()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .remove(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {session_id}")))?;
    tracing::info!(%session_id, "Interview session removed");
    Ok(StatusCode::NO_CONTENT)
}
