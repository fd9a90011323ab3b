use rand::Rng;

use crate::models::SimulationResult;

pub const ARCHETYPES: &[&str] = &[
    "The Adventurer",
    "The Intellectual",
    "The Creative",
    "The Homebody",
    "The Social Butterfly",
    "The Career Climber",
    "The Hopeless Romantic",
    "The Fitness Enthusiast",
];

pub const OPENERS: &[&str] = &[
    "Hey! Your profile made me smile. What's the story behind your favorite photo?",
    "Hi there! If you could be anywhere in the world right now, where would it be?",
    "Okay, important question: pineapple on pizza, yes or no?",
    "Hey! What's something you've been really excited about lately?",
    "Hi! I'm curious, what does a perfect Sunday look like for you?",
    "You seem like someone with great taste in music. What's on repeat?",
    "Hey! What's the best thing that happened to you this week?",
];

/// The empty slot means the scenario went without a notable issue.
pub const ISSUES: &[&str] = &[
    "Asked too few questions to keep the conversation going",
    "Came across as overly eager early on",
    "Replies were too brief to build momentum",
    "Not enough personal sharing to create a connection",
    "",
];

const REACTIONS: &[&str] = &[
    "warmly, matching your energy",
    "with curiosity and a follow-up question",
    "playfully, teasing back a little",
    "politely but briefly",
    "with a long, thoughtful message",
];

/// Compatibility scores are drawn from this half-open range.
pub const SCORE_RANGE: std::ops::Range<u8> = 60..95;

/// Builds the synthetic match for batch position `index`.
///
/// Archetype, opener and issue each cycle with their own list length. The
/// compatibility score is the only random draw.
pub fn generate_scenario<R: Rng>(
    profile_summary: &str,
    index: usize,
    rng: &mut R,
) -> SimulationResult {
    let archetype = ARCHETYPES[index % ARCHETYPES.len()];
    let opening_line = OPENERS[index % OPENERS.len()];
    let issue = ISSUES[index % ISSUES.len()];
    let reaction = REACTIONS[index % REACTIONS.len()];

    SimulationResult {
        archetype: archetype.to_string(),
        opening_line: opening_line.to_string(),
        expected_reply: format!(
            "{} replies {} after reading about {}.",
            archetype, reaction, profile_summary
        ),
        compatibility_score: rng.gen_range(SCORE_RANGE),
        issue: (!issue.is_empty()).then(|| issue.to_string()),
    }
}
