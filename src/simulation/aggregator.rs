use chrono::Utc;

use crate::models::{SimulationResult, SimulationSummary, UserProfile, Vibe};

const TOP_ARCHETYPES: usize = 5;
const TOP_ISSUES: usize = 3;
const MAX_TIPS: usize = 5;
const MAX_IMPROVEMENTS: usize = 4;

/// Issue substring and the remediation it maps to.
const REMEDIATIONS: &[(&str, &str)] = &[
    (
        "question",
        "Ask more open-ended questions so the other person has something to answer",
    ),
    (
        "eager",
        "Match their pace instead of leading with too much enthusiasm",
    ),
    (
        "brief",
        "Give your replies a little more detail so conversations have momentum",
    ),
    (
        "sharing",
        "Share more about yourself so they have something to connect with",
    ),
];

const DEFAULT_REMEDIATION: &str = "Keep replies consistent and engaged across the whole conversation";

/// Reduces a batch of simulated matches into coaching feedback.
pub fn aggregate(results: &[SimulationResult], vibe: &Vibe, profile: &UserProfile) -> SimulationSummary {
    let average = average_compatibility(results);
    let common_issues = common_issues(results);

    SimulationSummary {
        total_simulations: results.len(),
        average_compatibility: average,
        top_archetypes: top_archetypes(results),
        coaching_tips: coaching_tips(average, profile, &common_issues),
        suggested_openers: suggested_openers(profile),
        overall_impression: overall_impression(average, vibe),
        strengths: strengths(average, vibe, profile),
        areas_to_improve: areas_to_improve(&common_issues),
        common_issues,
        vibe: vibe.clone(),
        completed_at: Utc::now(),
    }
}

pub fn average_compatibility(results: &[SimulationResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let total: u32 = results.iter().map(|r| u32::from(r.compatibility_score)).sum();
    (f64::from(total) / results.len() as f64).round() as u8
}

/// Archetypes ranked by their mean score. Equal means keep first-seen order.
pub fn top_archetypes(results: &[SimulationResult]) -> Vec<String> {
    // (label, score sum, count), in first-seen order
    let mut groups: Vec<(&str, u32, u32)> = Vec::new();
    for result in results {
        let score = u32::from(result.compatibility_score);
        match groups.iter_mut().find(|(label, _, _)| *label == result.archetype) {
            Some(group) => {
                group.1 += score;
                group.2 += 1;
            }
            None => groups.push((&result.archetype, score, 1)),
        }
    }

    let mut ranked: Vec<(&str, f64)> = groups
        .into_iter()
        .map(|(label, sum, count)| (label, f64::from(sum) / f64::from(count)))
        .collect();
    // sort_by is stable, so ties stay in first-seen order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_ARCHETYPES)
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Most frequent non-empty issues. Equal counts keep first-seen order.
pub fn common_issues(results: &[SimulationResult]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for issue in results.iter().filter_map(|r| r.issue.as_deref()) {
        if issue.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(label, _)| *label == issue) {
            Some(entry) => entry.1 += 1,
            None => counts.push((issue, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_ISSUES)
        .map(|(label, _)| label.to_string())
        .collect()
}

pub fn coaching_tips(average: u8, profile: &UserProfile, common_issues: &[String]) -> Vec<String> {
    let tone = &profile.texting_tone;
    let mut tips = Vec::new();

    tips.push(
        if average >= 75 {
            "Your conversations land well. Keep leading with the same energy and let things progress naturally."
        } else if average >= 60 {
            "You're making solid connections. Small tweaks to how you open and follow up will push things further."
        } else {
            "Focus on building rapport before steering toward plans. Early messages set the tone."
        }
        .to_string(),
    );

    if tone.positivity < 50 {
        tips.push("Let a bit more warmth and positivity show in your messages.".to_string());
    }
    if tone.playfulness < 40 {
        tips.push("Try adding some light humor. A little playfulness goes a long way.".to_string());
    }
    if tone.playfulness > 80 {
        tips.push("Balance the jokes with a few sincere moments so matches see your depth.".to_string());
    }
    if tone.response_length < 30 {
        tips.push("Longer replies give matches more to respond to.".to_string());
    }
    if tone.response_length > 80 {
        tips.push("Keep messages a little shorter early on. Leave room for them to talk.".to_string());
    }
    if common_issues.iter().any(|i| i.contains("question")) {
        tips.push("End more messages with a question to keep the conversation flowing.".to_string());
    }
    if common_issues
        .iter()
        .any(|i| i.contains("eager") || i.contains("enthusias"))
    {
        tips.push("Slow down a little. Mirror their pace before suggesting a date.".to_string());
    }

    tips.truncate(MAX_TIPS);
    tips
}

pub fn strengths(average: u8, vibe: &Vibe, profile: &UserProfile) -> Vec<String> {
    let tone = &profile.texting_tone;
    let mut strengths = Vec::new();

    if tone.positivity >= 70 {
        strengths.push("Positive, upbeat texting style".to_string());
    }
    if tone.playfulness >= 60 {
        strengths.push("Playful sense of humor".to_string());
    }
    if profile.bio.chars().count() > 50 {
        strengths.push("Detailed bio that gives matches plenty to talk about".to_string());
    }
    if average >= 70 {
        strengths.push("Strong compatibility across many personality types".to_string());
    }
    if vibe.traits.iter().any(|t| t == "authentic") {
        strengths.push("Comes across as genuine and authentic".to_string());
    }
    if (40..=70).contains(&tone.response_length) {
        strengths.push("Well-balanced message length".to_string());
    }

    if strengths.is_empty() {
        strengths.push("Willingness to put yourself out there".to_string());
        strengths.push("Open to feedback and growth".to_string());
    }
    strengths
}

pub fn areas_to_improve(common_issues: &[String]) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for issue in common_issues {
        let Some((_, remediation)) = REMEDIATIONS.iter().find(|(key, _)| issue.contains(key)) else {
            continue;
        };
        if !areas.iter().any(|a| a == *remediation) {
            areas.push(remediation.to_string());
        }
    }
    if areas.is_empty() {
        areas.push(DEFAULT_REMEDIATION.to_string());
    }
    areas.truncate(MAX_IMPROVEMENTS);
    areas
}

pub fn suggested_openers(profile: &UserProfile) -> Vec<String> {
    let goal = profile.relationship_goal.to_lowercase();
    let playful = profile.texting_tone.playfulness >= 60;

    vec![
        "Hey! What's something you're weirdly passionate about?".to_string(),
        if playful {
            "Quick, pitch me your ideal first date in three emojis.".to_string()
        } else {
            "What's a small thing that always makes your day better?".to_string()
        },
        format!(
            "I'm here for {}. What brings you to the apps right now?",
            goal
        ),
        "What's the last place you traveled to that surprised you?".to_string(),
        if playful {
            "Two truths and a lie, go. I'll guess.".to_string()
        } else {
            "What are you most looking forward to this month?".to_string()
        },
    ]
}

pub fn overall_impression(average: u8, vibe: &Vibe) -> String {
    if average >= 75 {
        format!(
            "You come across as {} with a {} presence, and your {} messages resonate with a wide range of people. \
             Most simulated matches responded enthusiastically.",
            vibe.tone, vibe.energy, vibe.style
        )
    } else if average >= 60 {
        format!(
            "Your {} tone and {} energy make a good first impression. Your {} style works with many matches, \
             and a few adjustments could turn good conversations into great ones.",
            vibe.tone, vibe.energy, vibe.style
        )
    } else {
        format!(
            "Your {} tone and {} energy have potential, but your {} style isn't connecting consistently yet. \
             The coaching tips below are a good place to start.",
            vibe.tone, vibe.energy, vibe.style
        )
    }
}
