//! Diagnostic HTTP Routes
//!
//! Endpoints for listing domains and driving diagnostic sessions. The
//! handlers only translate between JSON and the session manager.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainSummary;
use crate::session::{
    DiagnosticResult, PendingQuestion, SessionError, SessionManager, SessionResult, SessionStatus,
    Step,
};

// ==================
// Shared State
// ==================

/// Diagnostic state shared across handlers
pub struct DiagnosticState {
    pub manager: Arc<SessionManager>,
}

impl DiagnosticState {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct DomainsListResponse {
    pub domains: Vec<DomainSummary>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Kept as text so invalid values get a diagnostic error, not a 422
    pub answer: String,
}

/// Next question or final diagnosis of a session
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<PendingQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_result: Option<DiagnosticResult>,
}

impl StepResponse {
    fn new(session_id: Uuid, step: Step) -> Self {
        match step {
            Step::Question(question) => Self {
                session_id,
                question: Some(question),
                diagnostic_result: None,
            },
            Step::Diagnosis(result) => Self {
                session_id,
                question: None,
                diagnostic_result: Some(result),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&SessionError> for ErrorResponse {
    fn from(err: &SessionError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: SessionError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err)))
}

// ==================
// Diagnostic Routes
// ==================

/// Create diagnostic routes
pub fn diagnostic_routes(state: Arc<DiagnosticState>) -> Router {
    Router::new()
        .route("/domains", get(list_domains_handler))
        .route("/domains/:domain/sessions", post(start_session_handler))
        .route("/sessions/:session_id", get(session_status_handler))
        .route("/sessions/:session_id/answer", post(answer_handler))
        .with_state(state)
}

/// Runs a manager call off the async executor; archive writes sync to disk.
async fn blocking<T, F>(manager: &Arc<SessionManager>, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SessionManager) -> SessionResult<T> + Send + 'static,
{
    let manager = Arc::clone(manager);
    tokio::task::spawn_blocking(move || call(&manager))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "DIAG_HTTP_TASK_FAILED".to_string(),
                }),
            )
        })?
        .map_err(api_error)
}

// ==================
// Handlers
// ==================

async fn list_domains_handler(State(state): State<Arc<DiagnosticState>>) -> Json<DomainsListResponse> {
    let domains = state.manager.registry().summaries();
    Json(DomainsListResponse {
        total: domains.len(),
        domains,
    })
}

async fn start_session_handler(
    State(state): State<Arc<DiagnosticState>>,
    Path(domain): Path<String>,
) -> Result<(StatusCode, Json<StepResponse>), ApiError> {
    let started = blocking(&state.manager, move |m| m.start(&domain)).await?;
    Ok((
        StatusCode::CREATED,
        Json(StepResponse::new(started.session_id, started.step)),
    ))
}

async fn answer_handler(
    State(state): State<Arc<DiagnosticState>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    let id = SessionManager::parse_id(&session_id).map_err(api_error)?;
    let step = blocking(&state.manager, move |m| m.submit(id, &request.answer)).await?;
    Ok(Json(StepResponse::new(id, step)))
}

async fn session_status_handler(
    State(state): State<Arc<DiagnosticState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatus>, ApiError> {
    let id = SessionManager::parse_id(&session_id).map_err(api_error)?;
    state.manager.status(id).map(Json).map_err(api_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_response_shape() {
        let id = Uuid::new_v4();
        let response = StepResponse::new(
            id,
            Step::Question(PendingQuestion {
                key: "brakes_stop_car".into(),
                text: "Do the brakes stop the car?".into(),
            }),
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["question"]["key"], "brakes_stop_car");
        assert!(json.get("diagnostic_result").is_none());
    }

    #[test]
    fn test_error_response_from_session_error() {
        let (status, Json(body)) = api_error(SessionError::InvalidAnswer("maybe".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "DIAG_SESSION_INVALID_ANSWER");
    }
}
