use crate::core::io::conf::GoldConf;
use crate::core::io::traits::StructureLoader;
use crate::engine::config::IndexerConfig;
use crate::engine::error::EngineError;
use crate::engine::indexer::SolutionIndexer;
use crate::engine::model::ResultModel;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{info, instrument};

/// Opens a GOLD experiment: parses `conf_path`, discovers every solution file and loads
/// the receptor if one is declared.
///
/// # Errors
///
/// Fails on an unreadable or malformed configuration, on any malformed solution file
/// and on a receptor that cannot be loaded. No partial model is returned.
#[instrument(skip_all, name = "open_workflow", fields(conf = %conf_path.display()))]
pub fn run<L: StructureLoader>(
    conf_path: &Path,
    config: &IndexerConfig,
    loader: &L,
    reporter: &ProgressReporter,
) -> Result<ResultModel, EngineError> {
    // === Phase 1: Configuration ===
    reporter.report(Progress::PhaseStart {
        name: "Configuration",
    });
    let conf = GoldConf::from_path(conf_path)?;
    info!(
        ligands = conf.ligand_bases().len(),
        directories = conf.directories().len(),
        protein = conf.protein_path().is_some(),
        "Configuration parsed."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Solution discovery ===
    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let discovery = SolutionIndexer::new(*config).discover(&conf, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Receptor ===
    reporter.report(Progress::PhaseStart { name: "Receptor" });
    let model = ResultModel::new(conf, discovery, loader)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::Message(format!(
        "Loaded {} solutions from {}",
        model.table().len(),
        model.common_path().display()
    )));
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::conf::ConfError;
    use crate::core::io::loader::FileLoader;
    use crate::core::io::mol2::Mol2Loader;
    use crate::engine::fixtures;
    use std::sync::Mutex;

    #[test]
    fn opens_experiment_and_reports_phases() {
        let experiment = fixtures::two_solution_experiment(true);
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));

        let model = run(
            &experiment.conf_path,
            &IndexerConfig::default(),
            &Mol2Loader,
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(model.table().len(), 2);
        assert!(model.receptor().is_some());
        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Configuration", "Discovery", "Receptor"]
        );
    }

    #[test]
    fn missing_configuration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            &dir.path().join("gold.conf"),
            &IndexerConfig::default(),
            &Mol2Loader,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::Conf(ConfError::Io(_)))));
    }

    #[test]
    fn opens_experiment_with_pdb_receptor() {
        let experiment = fixtures::pdb_receptor_experiment();

        let model = run(
            &experiment.conf_path,
            &IndexerConfig::default(),
            &FileLoader,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(model.table().len(), 2);
        let receptor = model.receptor().unwrap();
        assert_eq!(receptor.atom_count(), 4);
        assert!(receptor.path().ends_with("receptor.pdb"));
    }

    #[test]
    fn pdb_receptor_fails_with_mol2_only_loader() {
        let experiment = fixtures::pdb_receptor_experiment();
        let result = run(
            &experiment.conf_path,
            &IndexerConfig::default(),
            &Mol2Loader,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::StructureLoad { .. })));
    }
}
