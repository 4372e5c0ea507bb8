// src/core/search.rs — Topic derivation for the knowledge lookup

use std::collections::BTreeSet;

/// Topics always worth looking up once the question is about the disaster.
const BASE_TOPICS: &[&str] = &[
    "Titanic",
    "RMS Titanic",
    "Titanic disaster",
    "Titanic sinking",
    "Titanic passengers",
];

/// Question words that mark it as disaster-related.
const DISASTER_TRIGGERS: &[&str] = &["titanic", "ship", "disaster", "sinking"];

/// Derive the topic set handed to the knowledge-lookup responder.
///
/// Disaster-related questions pull in the base topics; mentions of class,
/// survival, or age in the primary analysis each add one focused topic.
/// Returned as a set: deduplicated, order not significant.
pub fn derive_topics(user_text: &str, primary_output: &str) -> BTreeSet<String> {
    let question = user_text.to_lowercase();
    let output = primary_output.to_lowercase();

    let mut topics = BTreeSet::new();

    if DISASTER_TRIGGERS.iter().any(|t| question.contains(t)) {
        for topic in BASE_TOPICS {
            topics.insert((*topic).to_string());
        }
    }

    if output.contains("class") {
        topics.insert("Titanic passenger classes".to_string());
    }
    if output.contains("survival") {
        topics.insert("Titanic survival factors".to_string());
    }
    if output.contains("age") {
        topics.insert("Titanic passenger demographics".to_string());
    }

    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disaster_question_adds_base_topics() {
        let topics = derive_topics("what happened to the Titanic?", "");
        for topic in BASE_TOPICS {
            assert!(topics.contains(*topic), "missing {topic}");
        }
    }

    #[test]
    fn test_output_keywords_add_focused_topics() {
        let topics = derive_topics("", "survival differed by class and age band");
        assert!(topics.contains("Titanic passenger classes"));
        assert!(topics.contains("Titanic survival factors"));
        assert!(topics.contains("Titanic passenger demographics"));
        assert_eq!(topics.len(), 3);
    }

    #[test]
    fn test_no_triggers_empty_set() {
        assert!(derive_topics("hello", "fine output").is_empty());
    }

    #[test]
    fn test_deduplicated() {
        // "Titanic survival factors" can only appear once however often
        // "survival" shows up
        let topics = derive_topics("the ship", "survival survival survival");
        assert_eq!(
            topics.iter().filter(|t| t.contains("survival factors")).count(),
            1
        );
    }
}
