use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extractors::JsonBody;
use crate::models::{ChatMessage, Sender, TextingTone, UserProfile, DEFAULT_TONE};
use crate::state::AppState;

// --- Forms ---

/// Onboarding form. Everything is optional at the parsing layer so that a
/// missing field reports a clear 400 instead of a deserialization error.
#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProfileForm {
    pub name: Option<String>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub interested_in: Option<String>,
    pub bio: Option<String>,
    pub relationship_goal: Option<String>,
    pub texting_tone: Option<TextingToneForm>,
    pub self_rating: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TextingToneForm {
    pub positivity: Option<i64>,
    pub playfulness: Option<i64>,
    pub response_length: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileResponse {
    pub profile: UserProfile,
    pub welcome_message: ChatMessage,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/profile",
        get(get_profile).post(create_profile).delete(reset),
    )
}

// --- Handlers ---

async fn create_profile(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<CreateProfileForm>,
) -> AppResult<(StatusCode, Json<CreateProfileResponse>)> {
    let profile = build_profile(form)?;
    let welcome_message = ChatMessage::new(Sender::Agent, welcome_text(&profile));

    state
        .store
        .lock()
        .await
        .replace_profile(profile.clone(), welcome_message.clone());
    tracing::info!(profile_id = %profile.id, "Profile created");

    Ok((
        StatusCode::CREATED,
        Json(CreateProfileResponse {
            profile,
            welcome_message,
        }),
    ))
}

async fn get_profile(State(state): State<AppState>) -> AppResult<Json<UserProfile>> {
    let store = state.store.lock().await;
    store
        .profile()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No profile created yet".into()))
}

async fn reset(State(state): State<AppState>) -> StatusCode {
    state.store.lock().await.reset();
    tracing::info!("Store reset");
    StatusCode::NO_CONTENT
}

// --- Helpers ---

pub fn build_profile(form: CreateProfileForm) -> AppResult<UserProfile> {
    let tone = form.texting_tone.unwrap_or_default();
    let self_rating = match form.self_rating {
        None => None,
        Some(r @ 1..=5) => Some(r as u8),
        Some(_) => {
            return Err(AppError::BadRequest(
                "selfRating must be between 1 and 5".into(),
            ))
        }
    };

    let mut profile = UserProfile {
        id: uuid::Uuid::now_v7().to_string(),
        name: required(form.name, "name")?,
        age_range: required(form.age_range, "ageRange")?,
        gender: required(form.gender, "gender")?,
        interested_in: required(form.interested_in, "interestedIn")?,
        bio: form.bio.map(|b| b.trim().to_string()).unwrap_or_default(),
        relationship_goal: required(form.relationship_goal, "relationshipGoal")?,
        texting_tone: TextingTone {
            positivity: slider(tone.positivity, "positivity")?,
            playfulness: slider(tone.playfulness, "playfulness")?,
            response_length: slider(tone.response_length, "responseLength")?,
        },
        self_rating,
        photos: Vec::new(),
        interests: Vec::new(),
        completeness: 0.0,
        created_at: Utc::now(),
    };
    profile.refresh_completeness();
    Ok(profile)
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", field)))
}

fn slider(value: Option<i64>, field: &str) -> AppResult<u8> {
    match value {
        None => Ok(DEFAULT_TONE),
        Some(v @ 0..=100) => Ok(v as u8),
        Some(_) => Err(AppError::BadRequest(format!(
            "{} must be between 0 and 100",
            field
        ))),
    }
}

fn welcome_text(profile: &UserProfile) -> String {
    format!(
        "Hey {}! I'm your dating coach. I'll help you put your best foot forward while you look for {}. \
         Upload a few photos, tell me a bit about how you like to chat, and run a simulation whenever you're \
         ready to see how you come across.",
        profile.name,
        profile.relationship_goal.to_lowercase()
    )
}
