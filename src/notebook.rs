//! Text extraction for Jupyter notebooks.

use crate::error::FileError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const HEADER: &str = "# Jupyter Notebook Content\n\n";

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows either a list of lines or one string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Lines(Vec::new())
    }
}

impl CellSource {
    /// A list with no fragments. A single string always counts as one.
    fn is_absent(&self) -> bool {
        matches!(self, CellSource::Lines(lines) if lines.is_empty())
    }

    fn joined(&self) -> String {
        match self {
            CellSource::Lines(lines) => lines.concat(),
            CellSource::Text(text) => text.clone(),
        }
    }
}

/// Returns true for `.ipynb` files, ignoring case.
pub fn is_notebook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ipynb"))
}

/// Reads a notebook from disk and renders its code, markdown and raw cells.
pub fn extract(path: &Path) -> Result<String, FileError> {
    let data = fs::read(path).map_err(FileError::Read)?;
    extract_from_slice(&data).map_err(FileError::Notebook)
}

/// Renders notebook JSON. Cells are numbered by their 1-based position in the
/// document, so skipped cell types leave gaps in the numbering.
pub fn extract_from_slice(data: &[u8]) -> Result<String, serde_json::Error> {
    let notebook: Notebook = serde_json::from_slice(data)?;

    let mut out = String::from(HEADER);
    for (index, cell) in notebook.cells.iter().enumerate() {
        if !matches!(cell.cell_type.as_str(), "code" | "markdown" | "raw") {
            continue;
        }
        out.push_str(&format!("## Cell {} ({})\n\n", index + 1, cell.cell_type));

        if cell.source.is_absent() {
            continue;
        }
        let body = cell.source.joined();
        out.push_str(&body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_cells_in_document_order() {
        let json = br##"{
          "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "\n", "Intro."]},
            {"cell_type": "code", "metadata": {}, "source": ["x = 1\n", "print(x)\n"]},
            {"cell_type": "raw", "metadata": {}, "source": "raw text"}
          ],
          "nbformat": 4
        }"##;
        let text = extract_from_slice(json).unwrap();
        assert_eq!(
            text,
            "# Jupyter Notebook Content\n\n\
             ## Cell 1 (markdown)\n\n# Title\n\nIntro.\n\n\
             ## Cell 2 (code)\n\nx = 1\nprint(x)\n\n\
             ## Cell 3 (raw)\n\nraw text\n\n"
        );
    }

    #[test]
    fn numbering_follows_original_position() {
        let json = br#"{"cells": [
            {"cell_type": "markdown", "source": ["a"]},
            {"cell_type": "heading", "source": ["skipped"]},
            {"cell_type": "code", "source": ["b"]}
        ]}"#;
        let text = extract_from_slice(json).unwrap();
        assert!(text.contains("## Cell 3 (code)"));
        assert!(!text.contains("## Cell 2"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn empty_source_emits_header_only() {
        let json = br#"{"cells": [{"cell_type": "code", "source": []}]}"#;
        let text = extract_from_slice(json).unwrap();
        assert_eq!(text, "# Jupyter Notebook Content\n\n## Cell 1 (code)\n\n");
    }

    #[test]
    fn empty_fragment_still_separates_cells() {
        let json = br#"{"cells": [
            {"cell_type": "code", "source": [""]},
            {"cell_type": "code", "source": ["b"]}
        ]}"#;
        let text = extract_from_slice(json).unwrap();
        assert_eq!(
            text,
            "# Jupyter Notebook Content\n\n\
             ## Cell 1 (code)\n\n\n\n\
             ## Cell 2 (code)\n\nb\n\n"
        );
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(extract_from_slice(b"{not json").is_err());
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_notebook(Path::new("analysis.IPYNB")));
        assert!(is_notebook(Path::new("dir/nb.ipynb")));
        assert!(!is_notebook(Path::new("notes.json")));
    }
}
