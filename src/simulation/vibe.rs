use crate::models::{ChatMessage, Sender, UserProfile, Vibe};

const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "awesome", "excited", "happy", "fun", "amazing", "enjoy",
];

/// Trait label and the keywords that signal it.
const TRAIT_KEYWORDS: &[(&str, &[&str])] = &[
    ("authentic", &["honest", "genuine", "authentic", "real", "myself"]),
    ("curious", &["?", "wonder", "curious"]),
    ("playful", &["haha", "lol", "joke", "funny", "😂"]),
    ("adventurous", &["travel", "hike", "hiking", "adventure", "explore"]),
];

/// Matches `keyword` in already-lowercased `text`.
///
/// Alphanumeric keywords must match a whole word, so "real" does not fire on
/// "really". Punctuation and emoji keywords match anywhere.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.chars().all(char::is_alphanumeric) {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    } else {
        text.contains(keyword)
    }
}

/// Describes how the user comes across, from their own chat messages and the
/// texting-tone sliders chosen at onboarding.
pub fn analyze_vibe(profile: &UserProfile, transcript: &[ChatMessage]) -> Vibe {
    let user_text: Vec<String> = transcript
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.content.to_lowercase())
        .collect();
    let tone = &profile.texting_tone;

    let positive_hits = user_text
        .iter()
        .flat_map(|text| text.split(|c: char| !c.is_alphanumeric()))
        .filter(|word| POSITIVE_WORDS.contains(word))
        .count();
    let tone_label = if positive_hits >= 2 || tone.positivity >= 70 {
        "warm and upbeat"
    } else if tone.positivity < 40 {
        "calm and reserved"
    } else {
        "friendly and easygoing"
    };

    let exclamations: usize = user_text.iter().map(|t| t.matches('!').count()).sum();
    let energy = if (!user_text.is_empty() && exclamations >= user_text.len())
        || tone.playfulness >= 70
    {
        "high-energy"
    } else if tone.playfulness < 40 {
        "laid-back"
    } else {
        "balanced"
    };

    let style = if user_text.is_empty() {
        match tone.response_length {
            0..=29 => "short and punchy",
            30..=70 => "conversational",
            _ => "thoughtful and detailed",
        }
    } else {
        let words: usize = user_text.iter().map(|t| t.split_whitespace().count()).sum();
        let average = words / user_text.len();
        if average > 25 {
            "thoughtful and detailed"
        } else if average < 8 {
            "short and punchy"
        } else {
            "conversational"
        }
    };

    let mut traits: Vec<String> = TRAIT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| {
            user_text
                .iter()
                .any(|text| keywords.iter().any(|k| contains_keyword(text, k)))
        })
        .map(|(label, _)| label.to_string())
        .collect();
    if traits.is_empty() {
        traits.push("easygoing".to_string());
    }

    Vibe {
        tone: tone_label.to_string(),
        energy: energy.to_string(),
        style: style.to_string(),
        traits,
    }
}
