use crate::models::{ChatMessage, SimulationSummary, UserProfile};

/// Process-wide, single-tenant state: one profile, one transcript, one summary.
///
/// Every client of the server shares this slot. Nothing is persisted.
#[derive(Debug, Default)]
pub struct Store {
    profile: Option<UserProfile>,
    transcript: Vec<ChatMessage>,
    simulation: Option<SimulationSummary>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new profile, replacing any previous one.
    ///
    /// The transcript restarts from `welcome` and the previous simulation
    /// summary is dropped, since both belonged to the old profile.
    pub fn replace_profile(&mut self, profile: UserProfile, welcome: ChatMessage) {
        self.profile = Some(profile);
        self.transcript = vec![welcome];
        self.simulation = None;
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Appends photo filenames to the current profile and returns the full list.
    /// Returns `None` when no profile exists.
    pub fn add_photos(&mut self, filenames: &[String]) -> Option<&[String]> {
        let profile = self.profile.as_mut()?;
        profile.photos.extend_from_slice(filenames);
        profile.refresh_completeness();
        Some(&profile.photos)
    }

    /// Merges interests learned from chat into the current profile.
    /// Returns how many were new, or `None` when no profile exists.
    pub fn learn_interests(&mut self, interests: &[String]) -> Option<usize> {
        self.profile
            .as_mut()
            .map(|profile| profile.learn_interests(interests))
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.transcript.push(message);
    }

    pub fn simulation(&self) -> Option<&SimulationSummary> {
        self.simulation.as_ref()
    }

    pub fn set_simulation(&mut self, summary: SimulationSummary) {
        self.simulation = Some(summary);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
