use crate::chat::llm::{CompletionClient, CompletionRequest, PromptMessage};
use crate::models::{ChatMessage, Sender, UserProfile};

/// How many of the most recent transcript messages go into the prompt.
pub const HISTORY_WINDOW: usize = 10;

enum Pattern {
    /// Every keyword must appear.
    All(&'static [&'static str]),
    /// At least one keyword must appear.
    Any(&'static [&'static str]),
}

impl Pattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::All(keywords) => keywords.iter().all(|k| text.contains(k)),
            Pattern::Any(keywords) => keywords.iter().any(|k| text.contains(k)),
        }
    }
}

struct FallbackRule {
    pattern: Pattern,
    reply: &'static str,
}

/// Canned replies used when the language model is unavailable. First match wins.
const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        pattern: Pattern::All(&["analyze", "vibe"]),
        reply: "From what you've shared so far, you come across as warm and genuine. \
                Run a simulation and I'll break down exactly how your vibe lands with different people.",
    },
    FallbackRule {
        pattern: Pattern::Any(&["simulation", "scenario"]),
        reply: "I can run 50 simulated conversations with different personality types and show you \
                what's working. Hit \"Run simulation\" whenever you're ready.",
    },
    FallbackRule {
        pattern: Pattern::Any(&["coaching", "tips"]),
        reply: "Quick tip: open with something specific from their profile and end with a question. \
                It gives them an easy way to reply and shows you actually read it.",
    },
    FallbackRule {
        pattern: Pattern::Any(&["check in", "feeling"]),
        reply: "Thanks for checking in. Dating can be a lot, so go easy on yourself. \
                How have your recent conversations been going?",
    },
];

const GENERIC_REPLY: &str = "Tell me more! The more I know about how you like to connect, \
                             the better I can coach you.";

pub fn fallback_reply(message: &str) -> &'static str {
    let text = message.to_lowercase();
    FALLBACK_RULES
        .iter()
        .find(|rule| rule.pattern.matches(&text))
        .map(|rule| rule.reply)
        .unwrap_or(GENERIC_REPLY)
}

pub fn build_system_prompt(profile: &UserProfile, transcript: &[ChatMessage]) -> String {
    let tone = &profile.texting_tone;
    let self_rating = profile
        .self_rating
        .map(|r| format!("{}/5", r))
        .unwrap_or_else(|| "not given".to_string());

    let start = transcript.len().saturating_sub(HISTORY_WINDOW);
    let recent: Vec<String> = transcript[start..]
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::User => "User",
                Sender::Agent => "Coach",
            };
            format!("{}: {}", who, m.content)
        })
        .collect();

    format!(
        "You are a friendly, encouraging dating coach chatting with {name}.\n\
         \n\
         Profile:\n\
         - Age range: {age}\n\
         - Gender: {gender}, interested in {interested}\n\
         - Looking for: {goal}\n\
         - Bio: {bio}\n\
         - Interests: {interests}\n\
         - Texting tone: positivity {pos}/100, playfulness {play}/100, response length {len}/100\n\
         - Self-rating: {rating}\n\
         \n\
         Recent conversation:\n\
         {recent}\n\
         \n\
         Keep replies to 2-4 sentences, be specific and supportive, and ask at most one question.",
        name = profile.name,
        age = profile.age_range,
        gender = profile.gender,
        interested = profile.interested_in,
        goal = profile.relationship_goal,
        bio = if profile.bio.is_empty() { "(none)" } else { profile.bio.as_str() },
        interests = if profile.interests.is_empty() {
            "(none yet)".to_string()
        } else {
            profile.interests.join(", ")
        },
        pos = tone.positivity,
        play = tone.playfulness,
        len = tone.response_length,
        rating = self_rating,
        recent = recent.join("\n"),
    )
}

/// Turns the recent transcript into alternating user/assistant turns.
///
/// The window matches the system prompt's. Leading coach messages are dropped
/// because a conversation must open with the user, and back-to-back messages
/// from the same side are joined into one turn. Falls back to `message` alone
/// when the transcript has no user turn.
pub fn prompt_messages(transcript: &[ChatMessage], message: &str) -> Vec<PromptMessage> {
    let start = transcript.len().saturating_sub(HISTORY_WINDOW);
    let mut turns: Vec<PromptMessage> = Vec::new();

    for m in transcript[start..]
        .iter()
        .skip_while(|m| m.sender == Sender::Agent)
    {
        let role = match m.sender {
            Sender::User => "user",
            Sender::Agent => "assistant",
        };
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&m.content);
            }
            _ => turns.push(PromptMessage {
                role: role.to_string(),
                content: m.content.clone(),
            }),
        }
    }

    if turns.last().map(|t| t.role.as_str()) != Some("user") {
        turns.push(PromptMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });
    }
    turns
}

/// Produces the coach's reply to `message`.
///
/// `transcript` should already end with the user's message. Model failures
/// never surface to the caller; they degrade to [`fallback_reply`].
pub async fn respond(
    client: &dyn CompletionClient,
    profile: &UserProfile,
    transcript: &[ChatMessage],
    message: &str,
) -> String {
    let request = CompletionRequest {
        system: build_system_prompt(profile, transcript),
        messages: prompt_messages(transcript, message),
    };

    match client.complete(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Language model unavailable, using canned reply: {}", e);
            fallback_reply(message).to_string()
        }
    }
}
