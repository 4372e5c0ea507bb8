// src/session/mod.rs — Append-only session log persisted as a notebook

pub mod notebook;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::core::types::{combine_transcript, TeamResponse};
use crate::infra::errors::TillerError;
use self::notebook::{Cell, Notebook};

/// One user exchange: the question, the responses collected during the
/// pass, and references to artifact files other responders produced (the
/// log references them, it does not own the bytes).
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub responses: Vec<TeamResponse>,
    pub artifacts: Vec<String>,
}

/// A bounded sequence of interaction records sharing one identifier and one
/// notebook file. Records only grow; a record is never mutated or removed
/// after append.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub records: Vec<InteractionRecord>,
}

/// Owns a session and its on-disk notebook.
///
/// Persistence is load-append-overwrite of the full document after every
/// append, so a crash loses at most the in-flight interaction. Appends take
/// `&mut self`: a session is confined to one owning context, and concurrent
/// sessions each get their own log (the overwrite pattern is last-writer-
/// wins and must not be shared).
pub struct SessionLog {
    session: Session,
    notebook_path: PathBuf,
}

impl SessionLog {
    /// Start a new session: timestamp-derived id, reports directory
    /// created, initial notebook written with a header cell.
    ///
    /// The id has second granularity; two sessions started within the same
    /// second would share a notebook file, which is accepted for this
    /// durability tier (individual records still carry uuids).
    pub fn new(reports_dir: impl AsRef<Path>) -> Result<Self, TillerError> {
        let created_at = Utc::now();
        let session_id = Local::now().format("%Y%m%d_%H%M%S").to_string();

        let reports_dir = reports_dir.as_ref();
        fs::create_dir_all(reports_dir)?;
        let notebook_path = reports_dir.join(format!("analysis_session_{session_id}.ipynb"));

        let log = Self {
            session: Session {
                session_id,
                created_at,
                records: Vec::new(),
            },
            notebook_path,
        };
        log.write_notebook(&log.header_notebook())?;
        Ok(log)
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn notebook_path(&self) -> &Path {
        &self.notebook_path
    }

    pub fn interactions(&self) -> usize {
        self.session.records.len()
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.session.records
    }

    /// Append one interaction and persist the full document. The record is
    /// committed to memory only after the write succeeds, so a failed write
    /// leaves the in-memory session consistent with the last good file.
    pub fn append_interaction(
        &mut self,
        question: &str,
        responses: &[TeamResponse],
        artifacts: &[String],
    ) -> Result<(), TillerError> {
        let record = InteractionRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            question: question.to_string(),
            responses: responses.to_vec(),
            artifacts: artifacts.to_vec(),
        };

        let mut nb = self.load_notebook();
        append_record_cells(&mut nb, &record);
        self.write_notebook(&nb)?;
        self.session.records.push(record);
        Ok(())
    }

    fn header_notebook(&self) -> Notebook {
        let mut nb = Notebook::new();
        nb.push(Cell::markdown(vec![
            format!("# Analysis Session - {}\n", self.session.session_id),
            "\n".into(),
            format!(
                "**Session Started:** {}\n",
                self.session
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
            ),
            "\n".into(),
            "---\n".into(),
        ]));
        nb
    }

    /// Load the on-disk notebook. A missing or malformed document is
    /// rebuilt from the in-memory records so one bad write never wedges the
    /// session.
    fn load_notebook(&self) -> Notebook {
        let parsed = fs::read_to_string(&self.notebook_path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Notebook>(&raw).map_err(|e| e.to_string()));
        match parsed {
            Ok(nb) => nb,
            Err(e) => {
                tracing::warn!(
                    path = %self.notebook_path.display(),
                    error = %e,
                    "Session notebook unreadable, rebuilding from in-memory records"
                );
                self.rebuild_notebook()
            }
        }
    }

    fn rebuild_notebook(&self) -> Notebook {
        let mut nb = self.header_notebook();
        for record in &self.session.records {
            append_record_cells(&mut nb, record);
        }
        nb
    }

    fn write_notebook(&self, nb: &Notebook) -> Result<(), TillerError> {
        let text = serde_json::to_string_pretty(nb).map_err(|e| TillerError::Notebook {
            path: self.notebook_path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.notebook_path, text)?;
        Ok(())
    }
}

/// The cells one interaction contributes: question header, team analysis,
/// optional visualization cells, separator.
fn append_record_cells(nb: &mut Notebook, record: &InteractionRecord) {
    let stamp = record.timestamp.with_timezone(&Local).format("%H:%M:%S");
    nb.push(Cell::markdown(vec![
        format!("## Question ({stamp})\n"),
        "\n".into(),
        format!("**User:** {}\n", record.question),
        "\n".into(),
    ]));

    nb.push(Cell::markdown(vec![
        "### Team Analysis\n".into(),
        "\n".into(),
        format!("{}\n", combine_transcript(&record.responses)),
        "\n".into(),
    ]));

    if !record.artifacts.is_empty() {
        nb.push(Cell::markdown(vec![
            "### Visualizations\n".into(),
            "\n".into(),
        ]));
        for artifact in &record.artifacts {
            nb.push(notebook::image_cell(artifact));
        }
    }

    nb.push(Cell::separator());
}
