// src/session/notebook.rs — Jupyter-notebook document model

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A minimal Jupyter notebook: an ordered list of markdown cells plus the
/// fixed metadata block viewers expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: serde_json::Value,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    pub metadata: serde_json::Value,
    pub source: Vec<String>,
}

impl Cell {
    pub fn markdown(source: Vec<String>) -> Self {
        Self {
            cell_type: "markdown".into(),
            metadata: json!({}),
            source,
        }
    }

    /// Horizontal-rule cell used between interactions.
    pub fn separator() -> Self {
        Self::markdown(vec!["---\n".into()])
    }
}

impl Notebook {
    /// Fresh notebook with the standard Python kernelspec metadata, so
    /// Jupyter and VS Code render the file without complaint.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            metadata: json!({
                "kernelspec": {
                    "display_name": "Python 3",
                    "language": "python",
                    "name": "python3"
                },
                "language_info": {
                    "codemirror_mode": { "name": "ipython", "version": 3 },
                    "file_extension": ".py",
                    "mimetype": "text/x-python",
                    "name": "python",
                    "nbconvert_exporter": "python",
                    "pygments_lexer": "ipython3",
                    "version": "3.8.0"
                }
            }),
            nbformat: 4,
            nbformat_minor: 4,
        }
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one artifact as an embedded-image markdown cell.
///
/// A missing or unreadable artifact becomes a textual placeholder instead;
/// one bad file must not abort the surrounding append.
pub fn image_cell(path: &str) -> Cell {
    match std::fs::read(path) {
        Ok(bytes) => Cell::markdown(vec![format!(
            "![Plot](data:image/png;base64,{})\n",
            BASE64.encode(bytes)
        )]),
        Err(e) => Cell::markdown(vec![format!("*Error loading plot {path}: {e}*\n")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut nb = Notebook::new();
        nb.push(Cell::markdown(vec!["# Title\n".into()]));
        nb.push(Cell::separator());

        let text = serde_json::to_string_pretty(&nb).unwrap();
        let back: Notebook = serde_json::from_str(&text).unwrap();
        assert_eq!(back.cells, nb.cells);
        assert_eq!(back.nbformat, 4);
    }

    #[test]
    fn test_image_cell_embeds_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let cell = image_cell(path.to_str().unwrap());
        let line = &cell.source[0];
        assert!(line.starts_with("![Plot](data:image/png;base64,"));
        assert!(line.contains(&BASE64.encode([0x89, b'P', b'N', b'G'])));
    }

    #[test]
    fn test_image_cell_missing_file_placeholder() {
        let cell = image_cell("/missing.png");
        assert!(cell.source[0].starts_with("*Error loading plot /missing.png:"));
    }

    #[test]
    fn test_cell_type_field_name() {
        // nbformat requires the key "cell_type", not "cellType" or similar
        let cell = Cell::markdown(vec![]);
        let value = serde_json::to_value(&cell).unwrap();
        assert!(value.get("cell_type").is_some());
    }
}
