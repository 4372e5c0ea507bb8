// src/core/artifacts.rs — Artifact-path extraction from responder text

use regex::Regex;
use std::sync::OnceLock;

static PNG_TOKEN: OnceLock<Regex> = OnceLock::new();

fn png_token() -> &'static Regex {
    PNG_TOKEN.get_or_init(|| Regex::new(r"[^/\s]+\.png").expect("valid literal pattern"))
}

/// Pull `*.png` filename tokens out of free responder text.
///
/// Purely lexical, kept isolated so its heuristic nature stays visible and
/// swappable: a responder that merely *talks about* a png file still
/// matches, and directory prefixes are stripped (`plots/fares.png` yields
/// `fares.png`). Duplicates are preserved in encounter order; callers that
/// want set semantics dedup themselves.
pub fn extract_artifact_paths(text: &str) -> Vec<String> {
    png_token()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
