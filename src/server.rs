//! HTTP surface and grading orchestration.
//!
//! Three routes: a status check at `/`, key verification and grading under
//! `/api`. The `/api` routes carry a permissive CORS layer so the grading
//! front-end can call them from any origin.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::category::Category;
use crate::checker;
use crate::config::Config;
use crate::extractor;
use crate::llm::{self, LlmClient, LlmError};
use crate::score::calculate_score;

/// Marker prefixed to the detail text when the local pattern check decided
/// the result without an LLM call.
const BASIC_CHECK_MARKER: &str = "[기본 체크]";

/// Detail text when no error was found.
const NO_ERRORS: &str = "오류 없음";

/// Shared per-request state: immutable configuration and the LLM client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<LlmClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = Arc::new(LlmClient::new(config.clone())?);
        Ok(Self {
            config: Arc::new(config),
            llm,
        })
    }
}

/// Grading request body.
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Grading result returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GradingResult {
    pub success: bool,
    pub score: u32,
    #[serde(rename = "errorCount")]
    pub error_count: usize,
    pub errors: Vec<String>,
    pub detail: String,
}

/// Errors surfaced to the client as JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Empty submission text
    #[error("텍스트가 비어있습니다.")]
    EmptyText,

    /// No credential configured on the server
    #[error("API 키가 설정되지 않았습니다.")]
    MissingApiKey,

    /// Upstream call failed
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyText => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey | ApiError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error payload: `{ "error": ..., "details": ... }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            ApiError::Llm(LlmError::Upstream { body, .. }) if !body.is_empty() => {
                Some(body.clone())
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/verify-key", post(verify_key))
        .route("/check-grammar", post(check_grammar))
        .layer(cors);

    Router::new()
        .route("/", get(home))
        .nest("/api", api)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    message: &'static str,
    api_key_configured: bool,
}

/// `GET /` — liveness and configuration status.
async fn home(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "HTML 채점 시스템 API 서버",
        api_key_configured: state.config.is_key_configured(),
    })
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// `POST /api/verify-key` — ping the upstream model-listing endpoint.
async fn verify_key(State(state): State<AppState>) -> (StatusCode, Json<VerifyResponse>) {
    if !state.config.is_key_configured() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(VerifyResponse {
                valid: false,
                status_code: None,
                error: Some("API 키가 서버에 설정되지 않았습니다.".to_string()),
            }),
        );
    }

    match state.llm.verify_key().await {
        Ok(status) => (
            StatusCode::OK,
            Json(VerifyResponse {
                valid: status == 200,
                status_code: Some(status),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Key verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VerifyResponse {
                    valid: false,
                    status_code: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// `POST /api/check-grammar` — grade a submission.
///
/// Word-category submissions run the local pattern check first; a hit
/// answers immediately without touching the upstream API.
async fn check_grammar(
    State(state): State<AppState>,
    Json(request): Json<GradeRequest>,
) -> Result<Json<GradingResult>, ApiError> {
    if !state.config.is_key_configured() {
        return Err(ApiError::MissingApiKey);
    }
    if request.text.is_empty() {
        return Err(ApiError::EmptyText);
    }

    let category = Category::from_param(request.category.as_deref());

    if let Some(result) = local_precheck(category, &request.text) {
        tracing::debug!(
            "Local pattern check decided the result: {} errors",
            result.error_count
        );
        return Ok(Json(result));
    }

    let prompt = category.build_prompt(&request.text);
    let reply = state.llm.grade(&prompt).await?;

    Ok(Json(grade_from_reply(category, &reply)))
}

/// Run the local pattern check for the word category.
///
/// Returns a complete grading result when any known-wrong pattern matches,
/// `None` when the submission must go to the upstream model. Categories
/// other than word never short-circuit.
fn local_precheck(category: Category, text: &str) -> Option<GradingResult> {
    if category != Category::Word {
        return None;
    }

    let clean_text = extractor::extract_text(text);
    let errors = checker::check(&clean_text);
    if errors.is_empty() {
        return None;
    }

    let error_count = errors.len();
    Some(GradingResult {
        success: true,
        score: calculate_score(error_count, category.max_score()),
        error_count,
        detail: format!("{}\n{}", BASIC_CHECK_MARKER, errors.join("\n")),
        errors,
    })
}

/// Turn a raw model reply into a grading result.
///
/// An unparseable reply is not a failure: it degrades to a single error
/// whose message is the reply itself, scored as one error.
fn grade_from_reply(category: Category, reply: &str) -> GradingResult {
    match llm::parse_reply(reply) {
        Ok(parsed) => GradingResult {
            success: true,
            score: calculate_score(parsed.error_count, category.max_score()),
            error_count: parsed.error_count,
            detail: if parsed.errors.is_empty() {
                NO_ERRORS.to_string()
            } else {
                parsed.errors.join("\n")
            },
            errors: parsed.errors,
        },
        Err(_) => GradingResult {
            success: true,
            score: calculate_score(1, category.max_score()),
            error_count: 1,
            errors: vec![reply.to_string()],
            detail: reply.to_string(),
        },
    }
}
