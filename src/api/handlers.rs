// src/api/handlers.rs

use crate::api::{types::*, ApiState};
use crate::infra::errors::InterpersonalError;
use crate::relay::{CompletionRequest, FeedbackRequest};
use crate::scenario;
use crate::util::log_preview;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    error(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Map relay failures to HTTP. `what` names the failed operation for 500s.
fn relay_error(err: InterpersonalError, empty_message: &str, what: &str) -> ApiError {
    match err {
        InterpersonalError::Validation(msg) => error(StatusCode::BAD_REQUEST, msg),
        InterpersonalError::NoApiKey { env_var } => {
            tracing::error!("Relay called without an API key ({env_var})");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Upstream API key not configured. Set {env_var} on the server."),
            )
        }
        InterpersonalError::EmptyResponse { .. } => {
            error(StatusCode::INTERNAL_SERVER_ERROR, empty_message)
        }
        e if e.is_upstream() => {
            tracing::error!("Upstream API error: {}", e);
            error(StatusCode::BAD_GATEWAY, format!("Upstream API error: {e}"))
        }
        e => {
            tracing::error!("Failed to {what}: {}", e);
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {what}. Check server logs."),
            )
        }
    }
}

fn required(field: Option<String>) -> String {
    field.unwrap_or_default()
}

/// POST /api/scenarios/test — Relay one in-character turn.
pub async fn relay_completion(
    State(state): State<ApiState>,
    body: Result<Json<CompletionBody>, JsonRejection>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let Json(body) = body.map_err(bad_json)?;

    let request = CompletionRequest {
        scenario_id: required(body.scenario_id),
        prompt: required(body.prompt),
        user_input: required(body.user_input),
        model: body.model,
        conversation_history: body
            .conversation_history
            .iter()
            .filter_map(HistoryEntry::to_turn)
            .collect(),
    };
    let scenario_id = request.scenario_id.clone();

    let reply = state
        .relay
        .complete(request)
        .await
        .map_err(|e| relay_error(e, "No response from upstream", "test scenario"))?;

    Ok(Json(CompletionResponse {
        success: true,
        response: reply.response,
        metadata: CompletionMetadata {
            scenario_id,
            model: reply.model,
            usage: reply.usage.into(),
            cost: reply.cost,
            timestamp: now(),
        },
    }))
}

/// POST /api/scenarios/feedback-generate — Coaching feedback on a transcript.
pub async fn relay_feedback(
    State(state): State<ApiState>,
    body: Result<Json<FeedbackBody>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(body) = body.map_err(bad_json)?;

    let conversation = body
        .conversation
        .unwrap_or_default()
        .iter()
        .map(HistoryEntry::to_transcript_turn)
        .collect();
    let request = FeedbackRequest {
        scenario_id: body.scenario_id.clone().unwrap_or_default(),
        conversation,
    };

    let feedback = state
        .relay
        .generate_feedback(request)
        .await
        .map_err(|e| relay_error(e, "No feedback generated", "generate feedback"))?;

    Ok(Json(FeedbackResponse {
        success: true,
        feedback,
        metadata: RecordMetadata {
            scenario_id: body.scenario_id,
            timestamp: now(),
        },
    }))
}

/// POST /api/scenarios/feedback — Record a tester's rating of a scenario prompt.
pub async fn save_rating(
    State(state): State<ApiState>,
    body: Result<Json<RatingBody>, JsonRejection>,
) -> Result<Json<RatingSavedResponse>, ApiError> {
    let Json(body) = body.map_err(bad_json)?;

    let (Some(scenario_id), Some(rating)) = (
        body.scenario_id.filter(|s| !s.trim().is_empty()),
        body.rating.filter(|r| *r > 0),
    ) else {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: scenarioId and rating",
        ));
    };
    if rating > 5 {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Rating must be between 1 and 5",
        ));
    }

    let timestamp = now();
    let entry = ScenarioRating {
        id: uuid::Uuid::new_v4().to_string(),
        scenario_id: scenario_id.clone(),
        rating,
        notes: body.notes,
        improvements: body.improvements,
        prompt: body.prompt,
        timestamp: timestamp.clone(),
    };

    tracing::info!(
        scenario = %entry.scenario_id,
        rating = entry.rating,
        notes = entry.notes.as_deref().unwrap_or(""),
        improvements = entry.improvements.as_deref().unwrap_or(""),
        prompt = %entry.prompt.as_deref().map(|p| log_preview(p, 100)).unwrap_or_default(),
        "Scenario rating received"
    );

    if let Ok(mut ratings) = state.ratings.lock() {
        ratings.push(entry);
    } else {
        return Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save feedback. Check server logs.",
        ));
    }

    Ok(Json(RatingSavedResponse {
        success: true,
        message: "Feedback saved successfully".into(),
        metadata: RecordMetadata {
            scenario_id: Some(scenario_id),
            timestamp,
        },
    }))
}

/// GET /api/scenarios/feedback?scenarioId= — Ratings recorded for one scenario.
pub async fn list_ratings(
    State(state): State<ApiState>,
    Query(query): Query<RatingQuery>,
) -> Result<Json<RatingListResponse>, ApiError> {
    let Some(scenario_id) = query.scenario_id.filter(|s| !s.is_empty()) else {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Missing scenarioId parameter",
        ));
    };

    let feedback: Vec<ScenarioRating> = state
        .ratings
        .lock()
        .map(|ratings| {
            ratings
                .iter()
                .filter(|r| r.scenario_id == scenario_id)
                .cloned()
                .collect()
        })
        .map_err(|_| {
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve feedback. Check server logs.",
            )
        })?;

    Ok(Json(RatingListResponse {
        success: true,
        feedback,
    }))
}

/// GET /api/scenarios — The scenario catalog, grouped by category.
pub async fn list_scenarios() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "categories": scenario::categories(),
    }))
}

/// GET /api/health — Simple health check.
pub async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "upstream_configured": state.relay.is_configured(),
    }))
}
