// src/core/intent.rs — Keyword intent classification

use super::types::Intent;

/// Words whose presence means the user wants some kind of chart.
const VISUALIZATION_KEYWORDS: &[&str] = &[
    "chart",
    "graph",
    "plot",
    "visualize",
    "show",
    "create",
    "display",
    "analysis",
    "data",
    "survival",
    "class",
    "age",
    "fare",
    "demographic",
];

/// Words whose presence means the user wants a compiled report.
const REPORT_KEYWORDS: &[&str] = &[
    "report",
    "summary",
    "document",
    "notebook",
    "comprehensive",
    "complete",
    "generate",
    "create report",
    "full analysis",
];

/// Classify free-text input into the two routing flags.
///
/// Pure substring membership over the lower-cased input: no tokenization,
/// no negation handling, so "I don't want a report" still sets
/// `needs_report`. That is the observed heuristic, tuned to do too much
/// rather than too little, and it is kept as-is.
pub fn classify(user_text: &str) -> Intent {
    let lower = user_text.to_lowercase();
    Intent {
        needs_visualization: contains_any(&lower, VISUALIZATION_KEYWORDS),
        needs_report: contains_any(&lower, REPORT_KEYWORDS),
    }
}

/// True when any needle occurs as a substring. Callers lower-case first.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_only() {
        let intent = classify("I need a report on the findings");
        assert!(intent.needs_report);
        // "report" is not in the visualization set and nothing else matches
        assert!(!intent.needs_visualization);
    }

    #[test]
    fn test_no_keywords() {
        let intent = classify("hello there");
        assert!(!intent.needs_visualization);
        assert!(!intent.needs_report);
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(classify(""), Intent::default());
        assert_eq!(classify("   "), Intent::default());
    }

    #[test]
    fn test_case_insensitive() {
        let intent = classify("PLOT the SURVIVAL numbers");
        assert!(intent.needs_visualization);
        assert!(!intent.needs_report);
    }

    #[test]
    fn test_comprehensive_report_request() {
        // "create" trips the visualization set, "comprehensive"/"report"
        // trip the report set
        let intent = classify("Create a comprehensive report about the Titanic");
        assert!(intent.needs_visualization);
        assert!(intent.needs_report);
    }

    #[test]
    fn test_negation_is_not_handled() {
        // Documented limitation: substring match ignores negation
        let intent = classify("I don't want a report");
        assert!(intent.needs_report);
    }

    #[test]
    fn test_substring_match_inside_word() {
        // "classical" contains "class"; that is how substring matching works
        let intent = classify("some classical music please");
        assert!(intent.needs_visualization);
    }
}
