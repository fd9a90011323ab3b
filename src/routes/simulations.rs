use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{ChatMessage, Sender, SimulationSummary};
use crate::simulation;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub summary: SimulationSummary,
    pub chat_message: ChatMessage,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/simulations/run", post(run))
        .route("/api/simulations/results", get(results))
}

async fn run(State(state): State<AppState>) -> AppResult<Json<RunResponse>> {
    let (profile, transcript) = {
        let store = state.store.lock().await;
        let profile = store
            .profile()
            .cloned()
            .ok_or_else(|| AppError::NotFound("Create a profile before running simulations".into()))?;
        (profile, store.transcript().to_vec())
    };

    tracing::info!(profile_id = %profile.id, "Running simulation batch");
    let summary = simulation::run_batch(
        &profile,
        &transcript,
        state.config.simulation.step_delay(),
        &mut StdRng::from_entropy(),
    )
    .await;
    let chat_message = ChatMessage::new(Sender::Agent, simulation::format_chat_summary(&summary));

    {
        let mut store = state.store.lock().await;
        store.set_simulation(summary.clone());
        store.push_message(chat_message.clone());
    }
    tracing::info!(
        average = summary.average_compatibility,
        "Simulation batch complete"
    );

    Ok(Json(RunResponse {
        summary,
        chat_message,
    }))
}

async fn results(State(state): State<AppState>) -> AppResult<Json<SimulationSummary>> {
    let store = state.store.lock().await;
    store
        .simulation()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No simulation has been run yet".into()))
}
