use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::chat::{extract_interests, respond};
use crate::error::{AppError, AppResult};
use crate::extractors::JsonBody;
use crate::models::{ChatMessage, Sender};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageForm {
    #[serde(default)]
    pub content: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/history", get(history))
        .route("/api/chat/message", post(send_message))
}

async fn history(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.store.lock().await.transcript().to_vec())
}

async fn send_message(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<SendMessageForm>,
) -> AppResult<Json<ChatMessage>> {
    let content = form.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Message content cannot be empty".into()));
    }

    // Record the user's message, then release the lock for the model call
    let (profile, transcript) = {
        let mut store = state.store.lock().await;
        if store.profile().is_none() {
            return Err(AppError::NotFound("Create a profile before chatting".into()));
        }
        store.push_message(ChatMessage::new(Sender::User, content.clone()));
        let learned = store
            .learn_interests(&extract_interests(&content))
            .unwrap_or(0);
        if learned > 0 {
            tracing::debug!(learned, "Learned interests from chat");
        }
        let profile = store
            .profile()
            .cloned()
            .ok_or_else(|| AppError::NotFound("Create a profile before chatting".into()))?;
        (profile, store.transcript().to_vec())
    };

    let reply = respond(state.llm.as_ref(), &profile, &transcript, &content).await;
    let message = ChatMessage::new(Sender::Agent, reply);
    state.store.lock().await.push_message(message.clone());

    Ok(Json(message))
}
