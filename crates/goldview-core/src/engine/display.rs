use super::error::EngineError;
use super::model::ResultModel;
use super::progress::ProgressReporter;
use super::rotamers::{RotamerError, RotamerOutcome, apply_rotamers};
use crate::core::io::traits::StructureLoader;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info, instrument, warn};

/// Outcome of one display request.
#[derive(Debug, Default)]
pub struct DisplayReport {
    /// Keys shown by this request, in request order.
    pub displayed: Vec<String>,
    /// Keys that could not be shown, with the reason.
    pub failures: Vec<(String, EngineError)>,
}

impl DisplayReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads solution structures on demand and tracks which ones are on screen.
///
/// Structures are cached by their table `Filename` identifier for the lifetime of the
/// coordinator; nothing is evicted.
#[derive(Debug, Default)]
pub struct DisplayCoordinator {
    cache: HashMap<String, Structure>,
    displayed: Vec<String>,
}

impl DisplayCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the structures behind `keys`, loading those not seen before.
    ///
    /// A key that fails to load is reported in [`DisplayReport::failures`]; the
    /// remaining keys are still attempted.
    #[instrument(skip_all, name = "display")]
    pub fn display<L, S>(&mut self, keys: &[S], model: &ResultModel, loader: &L) -> DisplayReport
    where
        L: StructureLoader,
        S: AsRef<str>,
    {
        let mut report = DisplayReport::default();
        for key in keys {
            let key = key.as_ref();
            match self.ensure_loaded(key, model, loader) {
                Ok(_) => {
                    if !self.displayed.iter().any(|k| k == key) {
                        self.displayed.push(key.to_string());
                    }
                    report.displayed.push(key.to_string());
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to display structure.");
                    report.failures.push((key.to_string(), e));
                }
            }
        }
        report
    }

    /// Shows the structures of table rows addressed by key.
    pub fn display_rows<L: StructureLoader>(
        &mut self,
        rows: &[usize],
        model: &ResultModel,
        loader: &L,
    ) -> DisplayReport {
        let mut keys = Vec::with_capacity(rows.len());
        let mut missing = Vec::new();
        for &row in rows {
            match model.filename_of(row) {
                Some(filename) => keys.push(filename.to_string_lossy().into_owned()),
                None => missing.push((row.to_string(), EngineError::RowNotFound(row))),
            }
        }

        let mut report = self.display(&keys, model, loader);
        report.failures.extend(missing);
        report
    }

    /// Transfers the rotamer annotations of solution `key` onto the shared receptor.
    ///
    /// The solution is loaded on demand. Without a receptor nothing happens; a solution
    /// without rotamer annotations is reported through `reporter` and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StructureLoad`] if the solution cannot be loaded.
    #[instrument(skip_all, name = "process_rotamers", fields(key = %key))]
    pub fn process<L: StructureLoader>(
        &mut self,
        key: &str,
        model: &mut ResultModel,
        loader: &L,
        reporter: &ProgressReporter,
    ) -> Result<RotamerOutcome, EngineError> {
        if model.receptor().is_none() {
            debug!("No receptor declared; nothing to patch.");
            return Ok(RotamerOutcome::NoReceptor);
        }

        let solution = self.ensure_loaded(key, model, loader)?;
        let payload = solution.payload().unwrap_or_default();
        let Some(receptor) = model.receptor_mut() else {
            return Ok(RotamerOutcome::NoReceptor);
        };

        match apply_rotamers(receptor, payload) {
            Ok(report) => {
                info!(
                    applied = report.applied,
                    skipped = report.skipped,
                    "Applied rotamers to the receptor."
                );
                Ok(RotamerOutcome::Applied(report))
            }
            Err(RotamerError::Unavailable) => {
                warn!("No rotamer information in solution.");
                reporter.warn(format!("No rotamer information available in '{key}'"));
                Ok(RotamerOutcome::Unavailable)
            }
        }
    }

    pub fn structure(&self, key: &str) -> Option<&Structure> {
        self.cache.get(key)
    }

    pub fn displayed(&self) -> &[String] {
        &self.displayed
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    fn ensure_loaded<L: StructureLoader>(
        &mut self,
        key: &str,
        model: &ResultModel,
        loader: &L,
    ) -> Result<&Structure, EngineError> {
        match self.cache.entry(key.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = model.resolve(key);
                debug!(path = %path.display(), "Loading solution structure.");
                let structure = loader
                    .load(&path)
                    .map_err(|e| EngineError::structure_load(&path, e))?;
                Ok(entry.insert(structure))
            }
        }
    }
}
