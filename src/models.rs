use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Neutral value used for any texting-tone slider the client leaves out.
pub const DEFAULT_TONE: u8 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub age_range: String,
    pub gender: String,
    pub interested_in: String,
    pub bio: String,
    pub relationship_goal: String,
    pub texting_tone: TextingTone,
    pub self_rating: Option<u8>,
    pub photos: Vec<String>,
    /// Interests picked up from the user's chat messages.
    pub interests: Vec<String>,
    /// How filled-in the profile is, in `[0, 1]`.
    pub completeness: f64,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// One-line description fed to the scenario generator and the chat prompt.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} ({})", self.name, self.age_range),
            format!("{} interested in {}", self.gender, self.interested_in),
            format!("looking for {}", self.relationship_goal),
        ];
        if !self.interests.is_empty() {
            parts.push(format!("into {}", self.interests.join(", ")));
        }
        if !self.bio.trim().is_empty() {
            parts.push(format!("bio: {}", self.bio.trim()));
        }
        parts.join(", ")
    }

    /// Adds interests not already on the profile, keeping first-learned order.
    /// Returns how many were new.
    pub fn learn_interests(&mut self, interests: &[String]) -> usize {
        let before = self.interests.len();
        for interest in interests {
            if !self.interests.contains(interest) {
                self.interests.push(interest.clone());
            }
        }
        self.refresh_completeness();
        self.interests.len() - before
    }

    /// Recomputes `completeness` from the optional parts of the profile.
    ///
    /// The required onboarding fields are always present and count for 0.3.
    /// Bio length, photos and learned interests fill the rest up to their
    /// targets, and a self-rating adds the last 0.05.
    pub fn refresh_completeness(&mut self) {
        fn filled(have: usize, target: usize) -> f64 {
            (have as f64 / target as f64).min(1.0)
        }

        let score = COMPLETENESS_BASE
            + 0.2 * filled(self.bio.trim().chars().count(), BIO_TARGET_CHARS)
            + 0.25 * filled(self.photos.len(), PHOTO_TARGET)
            + 0.2 * filled(self.interests.len(), INTEREST_TARGET)
            + if self.self_rating.is_some() { 0.05 } else { 0.0 };

        self.completeness = (score * 100.0).round() / 100.0;
    }
}

const COMPLETENESS_BASE: f64 = 0.3;
const BIO_TARGET_CHARS: usize = 50;
const PHOTO_TARGET: usize = 3;
const INTEREST_TARGET: usize = 5;

/// Slider values from onboarding, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextingTone {
    pub positivity: u8,
    pub playfulness: u8,
    pub response_length: u8,
}

impl Default for TextingTone {
    fn default() -> Self {
        Self {
            positivity: DEFAULT_TONE,
            playfulness: DEFAULT_TONE,
            response_length: DEFAULT_TONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One synthetic match from a simulation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub archetype: String,
    pub opening_line: String,
    pub expected_reply: String,
    pub compatibility_score: u8,
    pub issue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vibe {
    pub tone: String,
    pub energy: String,
    pub style: String,
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_simulations: usize,
    pub average_compatibility: u8,
    pub top_archetypes: Vec<String>,
    pub common_issues: Vec<String>,
    pub coaching_tips: Vec<String>,
    pub suggested_openers: Vec<String>,
    pub overall_impression: String,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub vibe: Vibe,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Success,
    Inconclusive,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoVerification {
    pub status: VerificationStatus,
    pub confidence: u8,
    pub message: String,
}
