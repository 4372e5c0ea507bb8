// src/core/types.rs — Core data types

use serde::{Deserialize, Serialize};

/// One responder's contribution to an orchestration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub responder: String,
    pub text: String,
}

impl TeamResponse {
    pub fn new(responder: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            responder: responder.into(),
            text: text.into(),
        }
    }
}

/// Render a transcript the way it appears in prompts and notebook cells:
/// `name: text` blocks separated by blank lines.
pub fn combine_transcript(responses: &[TeamResponse]) -> String {
    responses
        .iter()
        .map(|r| format!("{}: {}", r.responder, r.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// What the classifier decided the user wants from this question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub needs_visualization: bool,
    pub needs_report: bool,
}

/// Real-time events emitted at key transitions of an orchestration pass.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    ResponderStart { name: String },
    ResponderDone { name: String, chars: usize },
    LookupTriggered { topics: usize },
    ArtifactsFound { count: usize },
    RecordAppended { interactions: usize },
}

/// Outcome of one orchestration pass.
///
/// `summary` is what the user sees: the compiled report when one was
/// requested, the primary analysis otherwise. The full transcript and any
/// artifact references ride along for callers that want them.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: String,
    pub responses: Vec<TeamResponse>,
    pub artifacts: Vec<String>,
}
