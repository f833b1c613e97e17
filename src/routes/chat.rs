use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dashboard::collect_stats;
use super::ApiJson;
use crate::chat::{compose_reply, detect_intent, Intent};
use crate::error::AppError;
use crate::AppState;

const MAX_MESSAGE_CHARS: usize = 1_000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: Intent,
}

/// Answer a question about the catalog, deals or theses
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply to the message", body = ChatResponse),
        (status = 400, description = "Empty or oversized message")
    ),
    tag = "chat"
)]
#[tracing::instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.unwrap_or_default();
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidRequest("Message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::InvalidRequest(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let intent = detect_intent(message);
    tracing::debug!(?intent, "chat intent");

    let reply = match intent {
        Intent::Greeting | Intent::Help | Intent::Unknown => {
            // no numbers needed
            compose_reply(intent, &Default::default())
        }
        _ => compose_reply(intent, &collect_stats(&state.db).await?),
    };

    Ok(Json(ChatResponse { reply, intent }))
}
