//! Extraction of the score row and comment block from a GOLD solution file.
//!
//! GOLD writes each docked pose as a mol2 file whose `@<TRIPOS>COMMENT` record holds
//! SD-style data blocks. The `Gold.Score` block is a header line of field names
//! followed by a line of values.

use crate::core::io::mol2::MOLECULE_TAG;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const SCORE_TAG: &str = "> <Gold.Score>";
pub const COMMENT_TAG: &str = "@<TRIPOS>COMMENT";

#[derive(Debug, Error)]
pub enum SolutionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing mandatory tag '{0}'")]
    MissingTag(&'static str),
    #[error("Missing {what} line after '{tag}'")]
    MissingLine {
        tag: &'static str,
        what: &'static str,
    },
}

/// The parts of a solution file that feed the score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    /// Field names declared by the score block, in order.
    pub score_fields: Vec<String>,
    /// Values of the score row, aligned with `score_fields` by position. A field
    /// without a value is `None`.
    pub score_values: Vec<Option<String>>,
    /// Raw lines following the comment tag, up to the end of the record.
    pub comment: Vec<String>,
}

/// Reads and parses a solution file. The file is read in full and closed before parsing.
pub fn read_solution(path: &Path) -> Result<SolutionFile, SolutionError> {
    let text = fs::read_to_string(path)?;
    parse_solution(&text)
}

/// Parses the text of a solution file.
///
/// # Errors
///
/// Fails if either mandatory tag is absent or the score block is truncated. A score
/// row shorter than its header leaves the trailing fields empty; surplus values are
/// dropped.
pub fn parse_solution(text: &str) -> Result<SolutionFile, SolutionError> {
    let lines: Vec<&str> = text.lines().collect();

    let score_idx = find_tag(&lines, SCORE_TAG).ok_or(SolutionError::MissingTag(SCORE_TAG))?;
    let header = lines.get(score_idx + 1).ok_or(SolutionError::MissingLine {
        tag: SCORE_TAG,
        what: "header",
    })?;
    let row = lines.get(score_idx + 2).ok_or(SolutionError::MissingLine {
        tag: SCORE_TAG,
        what: "values",
    })?;
    let score_fields: Vec<String> = header.split_whitespace().map(str::to_string).collect();
    let score_values = align_values(&score_fields, row);

    let comment_idx =
        find_tag(&lines, COMMENT_TAG).ok_or(SolutionError::MissingTag(COMMENT_TAG))?;
    let comment = lines[comment_idx + 1..]
        .iter()
        .take_while(|line| !line.trim().eq_ignore_ascii_case(MOLECULE_TAG))
        .map(|line| line.to_string())
        .collect();

    Ok(SolutionFile {
        score_fields,
        score_values,
        comment,
    })
}

fn align_values(fields: &[String], row: &str) -> Vec<Option<String>> {
    let mut values: Vec<Option<String>> =
        row.split_whitespace().map(|v| Some(v.to_string())).collect();
    if values.len() != fields.len() {
        warn!(
            fields = fields.len(),
            values = values.len(),
            "Score row length differs from its header; aligning by position."
        );
        values.resize(fields.len(), None);
    }
    values
}

fn find_tag(lines: &[&str], tag: &str) -> Option<usize> {
    lines.iter().position(|line| line.trim() == tag)
}
