// src/responder/report.rs — Report compiler

use async_trait::async_trait;
use chrono::Local;

use super::Responder;
use crate::infra::errors::TillerError;

const TRANSCRIPT_PREFIX: &str = "Create a comprehensive report with these team responses:";
const PLOTS_MARKER: &str = "Plots created:";

/// Compiles the team transcript into a structured markdown report. The one
/// team member that never leaves the process.
pub struct ReportResponder {
    title: String,
}

impl ReportResponder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for ReportResponder {
    fn default() -> Self {
        Self::new("Analysis Report")
    }
}

#[async_trait]
impl Responder for ReportResponder {
    fn name(&self) -> &str {
        "report_generator"
    }

    async fn respond(&self, input: &str) -> Result<String, TillerError> {
        Ok(compile_report(&self.title, input))
    }
}

/// Split the orchestrator's prompt back into findings and plot list, then
/// lay them out as a dated markdown report.
fn compile_report(title: &str, input: &str) -> String {
    let body = input
        .strip_prefix(TRANSCRIPT_PREFIX)
        .map(str::trim)
        .unwrap_or(input);
    let (findings, plots) = match body.split_once(PLOTS_MARKER) {
        Some((f, p)) => (f.trim(), p.trim()),
        None => (body.trim(), ""),
    };

    let mut out = String::new();
    out.push_str(&format!("# {title}\n\n"));
    out.push_str(&format!(
        "**Generated on:** {}\n\n---\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("## Team Findings\n\n");
    if findings.is_empty() {
        out.push_str("No findings were collected for this question.\n\n");
    } else {
        out.push_str(findings);
        out.push_str("\n\n");
    }

    if !plots.is_empty() && plots != "No visualizations available" {
        out.push_str("## Visualizations\n\n");
        out.push_str("The following visualizations were generated based on the analysis:\n\n");
        out.push_str(plots);
        out.push_str("\n\n");
    }

    out.push_str("## Conclusions\n\n");
    out.push_str(
        "Compiled from the team responses above; the session notebook holds the full \
         transcript with embedded charts.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_prompt() {
        let responder = ReportResponder::default();
        let input = format!(
            "{TRANSCRIPT_PREFIX} data_analyst: survival differed sharply by class\n\n\
             {PLOTS_MARKER} - survival_by_class.png"
        );
        let out = responder.respond(&input).await.unwrap();
        assert!(out.starts_with("# Analysis Report\n"));
        assert!(out.contains("## Team Findings"));
        assert!(out.contains("survival differed sharply by class"));
        assert!(out.contains("## Visualizations"));
        assert!(out.contains("- survival_by_class.png"));
        assert!(out.contains("## Conclusions"));
    }

    #[tokio::test]
    async fn test_no_plots_section_when_none_available() {
        let responder = ReportResponder::default();
        let input =
            format!("{TRANSCRIPT_PREFIX} data_analyst: ok\n\n{PLOTS_MARKER} No visualizations available");
        let out = responder.respond(&input).await.unwrap();
        assert!(!out.contains("## Visualizations"));
    }

    #[test]
    fn test_bare_input_still_reported() {
        let out = compile_report("Weekly Report", "just some text");
        assert!(out.starts_with("# Weekly Report\n"));
        assert!(out.contains("just some text"));
    }

    #[test]
    fn test_empty_findings_placeholder() {
        let out = compile_report("R", TRANSCRIPT_PREFIX);
        assert!(out.contains("No findings were collected"));
    }
}
