pub mod aggregator;
pub mod generator;
pub mod vibe;

use std::time::Duration;

use rand::Rng;

use crate::models::{ChatMessage, SimulationSummary, UserProfile};

pub use self::aggregator::aggregate;
pub use self::generator::generate_scenario;
pub use self::vibe::analyze_vibe;

/// Every run simulates exactly this many matches.
pub const SIMULATION_BATCH_SIZE: usize = 50;

/// Generates a full batch one scenario at a time, pausing `step_delay` after
/// each, then reduces it into a summary.
pub async fn run_batch<R: Rng + Send>(
    profile: &UserProfile,
    transcript: &[ChatMessage],
    step_delay: Duration,
    rng: &mut R,
) -> SimulationSummary {
    let profile_summary = profile.summary();
    let mut results = Vec::with_capacity(SIMULATION_BATCH_SIZE);

    for index in 0..SIMULATION_BATCH_SIZE {
        results.push(generate_scenario(&profile_summary, index, rng));
        if !step_delay.is_zero() {
            tokio::time::sleep(step_delay).await;
        }
    }
    tracing::debug!(count = results.len(), "Simulation batch generated");

    let vibe = analyze_vibe(profile, transcript);
    aggregate(&results, &vibe, profile)
}

/// Renders the agent message posted to the chat after a run.
pub fn format_chat_summary(summary: &SimulationSummary) -> String {
    let mut lines = vec![
        format!(
            "I just ran {} simulated conversations. Your average compatibility was {}%.",
            summary.total_simulations, summary.average_compatibility
        ),
        String::new(),
        format!("Best matches: {}", summary.top_archetypes.join(", ")),
    ];

    if !summary.common_issues.is_empty() {
        lines.push(format!(
            "Things that tripped you up: {}",
            summary.common_issues.join("; ")
        ));
    }

    lines.push(String::new());
    lines.push("Coaching tips:".to_string());
    lines.extend(summary.coaching_tips.iter().map(|tip| format!("- {}", tip)));
    lines.push(String::new());
    lines.push(summary.overall_impression.clone());

    lines.join("\n")
}
