use super::config::IndexerConfig;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::table::{ScoreTable, TableBuilder};
use crate::core::io::conf::GoldConf;
use crate::core::io::solution::read_solution;
use crate::core::utils::paths::{common_path_of_filenames, normalize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Everything discovery extracts from an experiment's output directories.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Parsed score rows; `Filename` cells are relative to `common_path`.
    pub table: ScoreTable,
    /// Comment-section lines keyed by solution file base name.
    pub metadata: BTreeMap<String, Vec<String>>,
    /// Longest common directory of all discovered files.
    pub common_path: PathBuf,
    /// Canonical paths of the discovered files, in row-key order.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct SolutionIndexer {
    config: IndexerConfig,
}

impl SolutionIndexer {
    pub fn new(config: IndexerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Resolves the solution patterns of `conf` and parses every distinct file.
    ///
    /// Files are visited pattern by pattern (directories outermost) and in glob order
    /// within a pattern. A file reachable through several routes is parsed once, under
    /// the first route that reached it.
    ///
    /// # Errors
    ///
    /// Any unreadable or malformed solution file aborts discovery, as does a header that
    /// the schema policy rejects. Unreadable glob entries are skipped with a warning.
    #[instrument(skip_all, name = "solution_discovery")]
    pub fn discover(
        &self,
        conf: &GoldConf,
        reporter: &ProgressReporter,
    ) -> Result<Discovery, EngineError> {
        let patterns = conf.solution_patterns();
        info!(
            patterns = patterns.len(),
            policy = ?self.config.schema_policy,
            "Discovering solution files."
        );
        reporter.report(Progress::TaskStart {
            total_steps: patterns.len() as u64,
        });

        let mut seen = HashSet::new();
        let mut builder = TableBuilder::new(self.config.schema_policy);
        let mut metadata = BTreeMap::new();
        let mut files = Vec::new();

        for solution_pattern in &patterns {
            let entries = glob::glob(&solution_pattern.pattern).map_err(|source| {
                EngineError::Pattern {
                    pattern: solution_pattern.pattern.clone(),
                    source,
                }
            })?;

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable match.");
                        continue;
                    }
                };
                let canonical = fs::canonicalize(&path).map_err(|source| EngineError::Io {
                    path: path.clone(),
                    source,
                })?;
                if !seen.insert(canonical.clone()) {
                    debug!(path = %path.display(), "Already indexed through another route.");
                    continue;
                }

                let solution =
                    read_solution(&canonical).map_err(|source| EngineError::Solution {
                        path: canonical.clone(),
                        source,
                    })?;
                let key = builder.push(
                    canonical.clone(),
                    solution.score_fields,
                    solution.score_values,
                )?;

                let name = canonical
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if metadata.insert(name.clone(), solution.comment).is_some() {
                    warn!(name = %name, "Duplicate solution name; keeping the later comment.");
                }
                debug!(key, path = %canonical.display(), "Indexed solution.");
                files.push(canonical);
            }
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        let common_path = common_path_of_filenames(&files)
            .unwrap_or_else(|| normalize(conf.base_dir()));
        let mut table = builder.finish();
        table.rewrite_filenames(&common_path);

        info!(
            solutions = table.len(),
            common_path = %common_path.display(),
            "Discovery complete."
        );
        Ok(Discovery {
            table,
            metadata,
            common_path,
            files,
        })
    }
}
