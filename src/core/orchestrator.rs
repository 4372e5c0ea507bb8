// src/core/orchestrator.rs — Team pipeline controller

use std::time::Duration;

use tokio::time::timeout;

use super::artifacts;
use super::fallback;
use super::intent;
use super::search;
use super::types::{combine_transcript, ProgressEvent, RunReport, TeamResponse};
use crate::responder::Responder;
use crate::session::SessionLog;
use crate::util::ellipsize;

/// Per-pass tunables.
#[derive(Debug, Clone)]
pub struct TeamConfig {
    /// Wall-clock budget for a single responder call, so one stalled
    /// external process cannot block the pass indefinitely.
    pub responder_timeout: Duration,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            responder_timeout: Duration::from_secs(120),
        }
    }
}

/// Sequences the four responders over one question and feeds the collected
/// outputs into the session log.
///
/// The sequencing is fixed, not data-driven: data analysis always runs,
/// the knowledge lookup runs when the fallback unit says the primary answer
/// is thin, the chart responder runs when the classifier sees a
/// visualization request, and the report compiler runs when one was asked
/// for. A responder failure never aborts the pass; it degrades to
/// placeholder text and every later step still runs.
pub struct Orchestrator {
    data: Box<dyn Responder>,
    lookup: Box<dyn Responder>,
    chart: Box<dyn Responder>,
    report: Box<dyn Responder>,
    session: SessionLog,
    config: TeamConfig,
    on_progress: Option<Box<dyn Fn(ProgressEvent) + Send>>,
}

impl Orchestrator {
    pub fn new(
        data: Box<dyn Responder>,
        lookup: Box<dyn Responder>,
        chart: Box<dyn Responder>,
        report: Box<dyn Responder>,
        session: SessionLog,
        config: TeamConfig,
    ) -> Self {
        Self {
            data,
            lookup,
            chart,
            report,
            session,
            config,
            on_progress: None,
        }
    }

    /// Set a callback for real-time progress events.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    /// Fire a progress event if a callback is set.
    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Call one responder under the timeout budget, degrading every failure
    /// mode to placeholder text.
    async fn call(&self, responder: &dyn Responder, input: &str) -> String {
        let name = responder.name().to_string();
        self.emit(ProgressEvent::ResponderStart { name: name.clone() });

        let text = match timeout(self.config.responder_timeout, responder.respond(input)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(responder = %name, error = %e, "Responder call failed");
                format!("[{} unavailable: {}]", name, e)
            }
            Err(_) => {
                tracing::warn!(responder = %name, "Responder call timed out");
                format!(
                    "[{} unavailable: timed out after {}s]",
                    name,
                    self.config.responder_timeout.as_secs()
                )
            }
        };

        self.emit(ProgressEvent::ResponderDone {
            name,
            chars: text.len(),
        });
        text
    }

    /// Run one full orchestration pass and return the user-facing summary.
    pub async fn run(&mut self, user_text: &str) -> RunReport {
        let intent = intent::classify(user_text);
        let mut responses: Vec<TeamResponse> = Vec::new();
        let mut artifact_refs: Vec<String> = Vec::new();

        // 1. Data analysis always runs first.
        let primary = self.call(self.data.as_ref(), user_text).await;
        tracing::debug!(output = %ellipsize(&primary, 200), "Primary analysis complete");
        responses.push(TeamResponse::new(self.data.name(), primary.clone()));

        // 2. Supplementary lookup when the primary answer looks thin.
        if fallback::needs_lookup(user_text, &primary) {
            let topics = search::derive_topics(user_text, &primary);
            self.emit(ProgressEvent::LookupTriggered {
                topics: topics.len(),
            });
            if !topics.is_empty() {
                let joined = topics.iter().cloned().collect::<Vec<_>>().join(", ");
                let query = format!("Search for additional information about: {joined}");
                let text = self.call(self.lookup.as_ref(), &query).await;
                responses.push(TeamResponse::new(self.lookup.name(), text));
            }
        }

        // 3. Charts when the question asks for them. The chart responder
        // owns the image files; we only record path references.
        if intent.needs_visualization {
            let prompt = format!("Create visualizations based on this analysis: {primary}");
            let text = self.call(self.chart.as_ref(), &prompt).await;
            let found = artifacts::extract_artifact_paths(&text);
            if !found.is_empty() {
                self.emit(ProgressEvent::ArtifactsFound { count: found.len() });
            }
            artifact_refs.extend(found);
            responses.push(TeamResponse::new(self.chart.name(), text));
        }

        // 4. The session log gets every pass, whatever happened above. A
        // failed write is logged and the pass still returns an answer.
        if let Err(e) = self
            .session
            .append_interaction(user_text, &responses, &artifact_refs)
        {
            tracing::error!(error = %e, "Failed to append interaction to session notebook");
        } else {
            self.emit(ProgressEvent::RecordAppended {
                interactions: self.session.interactions(),
            });
        }

        // 5. Compile a report only when asked; otherwise the primary answer
        // is the summary.
        let summary = if intent.needs_report {
            let combined = combine_transcript(&responses);
            let plots_summary = if artifact_refs.is_empty() {
                "No visualizations available".to_string()
            } else {
                artifact_refs
                    .iter()
                    .map(|a| format!("- {a}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let prompt = format!(
                "Create a comprehensive report with these team responses: {combined}\n\nPlots created: {plots_summary}"
            );
            let text = self.call(self.report.as_ref(), &prompt).await;
            responses.push(TeamResponse::new(self.report.name(), text.clone()));
            text
        } else {
            primary
        };

        RunReport {
            summary,
            responses,
            artifacts: artifact_refs,
        }
    }

    /// Release responder-held resources (child processes, handles).
    pub async fn shutdown(&self) {
        for responder in [
            self.data.as_ref(),
            self.lookup.as_ref(),
            self.chart.as_ref(),
            self.report.as_ref(),
        ] {
            responder.shutdown().await;
        }
    }
}
