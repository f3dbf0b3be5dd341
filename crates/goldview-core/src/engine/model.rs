use super::error::EngineError;
use super::indexer::Discovery;
use super::table::ScoreTable;
use crate::core::io::conf::GoldConf;
use crate::core::io::traits::StructureLoader;
use crate::core::models::structure::Structure;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the optional table column whose values back [`ResultModel::details`] when
/// no solution is named.
pub const COMMENTS_COLUMN: &str = "Comments";
const DETAILS_SEPARATOR: &str = "\n  ";

/// One loaded GOLD experiment: the score table, the comment block of every solution
/// and, when the configuration names one, the receptor shared by all solutions.
#[derive(Debug, Clone)]
pub struct ResultModel {
    conf: GoldConf,
    table: ScoreTable,
    metadata: BTreeMap<String, Vec<String>>,
    common_path: PathBuf,
    receptor: Option<Structure>,
}

impl ResultModel {
    /// Assembles the model, loading the receptor once if the experiment declares one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StructureLoad`] if the receptor cannot be loaded.
    pub fn new<L: StructureLoader>(
        conf: GoldConf,
        discovery: Discovery,
        loader: &L,
    ) -> Result<Self, EngineError> {
        let receptor = match conf.protein_path() {
            Some(path) => {
                info!(path = %path.display(), "Loading receptor.");
                let structure = loader
                    .load(path)
                    .map_err(|e| EngineError::structure_load(path, e))?;
                Some(structure)
            }
            None => None,
        };

        Ok(Self {
            conf,
            table: discovery.table,
            metadata: discovery.metadata,
            common_path: discovery.common_path,
            receptor,
        })
    }

    pub fn conf(&self) -> &GoldConf {
        &self.conf
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ScoreTable {
        &mut self.table
    }

    pub fn metadata(&self) -> &BTreeMap<String, Vec<String>> {
        &self.metadata
    }

    pub fn common_path(&self) -> &Path {
        &self.common_path
    }

    pub fn protein_path(&self) -> Option<&Path> {
        self.conf.protein_path()
    }

    pub fn receptor(&self) -> Option<&Structure> {
        self.receptor.as_ref()
    }

    pub fn receptor_mut(&mut self) -> Option<&mut Structure> {
        self.receptor.as_mut()
    }

    /// Human-readable details for one solution, addressed by file base name.
    ///
    /// Without a name, the values of a `Comments` column are joined instead, or an
    /// empty string is returned when the table has no such column.
    pub fn details(&self, name: Option<&str>) -> Result<String, EngineError> {
        match name {
            Some(name) => self
                .metadata
                .get(name)
                .map(|lines| lines.join(DETAILS_SEPARATOR))
                .ok_or_else(|| EngineError::SolutionNotFound(name.to_string())),
            None => {
                let Some(column) = self.table.schema().index_of(COMMENTS_COLUMN) else {
                    return Ok(String::new());
                };
                let values: Vec<String> = self
                    .table
                    .rows()
                    .filter_map(|record| self.table.cell(record, column))
                    .map(|cell| cell.into_owned())
                    .collect();
                Ok(values.join(DETAILS_SEPARATOR))
            }
        }
    }

    /// Absolute location of a table `Filename` identifier.
    pub fn resolve(&self, identifier: impl AsRef<Path>) -> PathBuf {
        self.common_path.join(identifier)
    }

    /// The `Filename` identifier of a row.
    pub fn filename_of(&self, key: usize) -> Option<&Path> {
        self.table.record(key).map(|r| r.filename.as_path())
    }
}
