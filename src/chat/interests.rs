use crate::simulation::vibe::contains_keyword;

/// Interest label and the words that reveal it in a chat message.
const INTEREST_KEYWORDS: &[(&str, &[&str])] = &[
    ("travel", &["travel", "traveling", "travelling", "trip", "trips", "abroad"]),
    ("hiking", &["hike", "hikes", "hiking", "trail", "trails"]),
    ("outdoors", &["camping", "beach", "outdoors", "climbing", "kayaking"]),
    ("fitness", &["gym", "running", "workout", "yoga", "lifting"]),
    ("cooking", &["cook", "cooking", "bake", "baking", "recipe", "recipes"]),
    ("music", &["music", "concert", "concerts", "guitar", "piano", "singing"]),
    ("reading", &["book", "books", "reading", "novel", "novels"]),
    ("movies", &["movie", "movies", "film", "films", "cinema"]),
    ("gaming", &["gaming", "videogames", "games", "boardgames"]),
    ("art", &["art", "painting", "drawing", "museum", "museums"]),
    ("pets", &["dog", "dogs", "cat", "cats", "puppy"]),
];

/// Interests mentioned in one user message, in table order.
pub fn extract_interests(message: &str) -> Vec<String> {
    let text = message.to_lowercase();
    INTEREST_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| contains_keyword(&text, k)))
        .map(|(label, _)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_interests_in_table_order() {
        assert_eq!(
            extract_interests("Weekends are for Hiking with my dog, then a movie"),
            vec!["hiking", "movies", "pets"]
        );
    }

    #[test]
    fn partial_words_do_not_count() {
        assert!(extract_interests("I'm smart and catch on fast").is_empty());
    }
}
