use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::table::TableError;
use crate::core::io::conf::ConfError;
use crate::core::io::solution::SolutionError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read configuration: {0}")]
    Conf(#[from] ConfError),

    #[error("Invalid solution pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse solution '{path}': {source}")]
    Solution {
        path: PathBuf,
        #[source]
        source: SolutionError,
    },

    #[error("Score fields of '{path}' ({found:?}) differ from the table schema ({expected:?})")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("No solution named '{0}'")]
    SolutionNotFound(String),

    #[error("No table row with key {0}")]
    RowNotFound(usize),

    #[error("Failed to load structure '{path}': {source}")]
    StructureLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Score table error: {0}")]
    Table(#[from] TableError),
}

impl EngineError {
    pub(crate) fn structure_load<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::StructureLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
