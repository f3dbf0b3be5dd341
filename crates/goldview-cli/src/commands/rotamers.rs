use super::open_experiment;
use crate::cli::RotamersArgs;
use crate::config::PartialSettings;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use goldview::core::io::loader::{FileLoader, write_structure};
use goldview::engine::display::DisplayCoordinator;
use goldview::engine::model::ResultModel;
use goldview::engine::progress::ProgressReporter;
use goldview::engine::rotamers::{RotamerOutcome, RotamerReport};
use tracing::info;

pub fn run(
    args: RotamersArgs,
    settings: &PartialSettings,
    progress: &CliProgressHandler,
) -> Result<()> {
    let mut model = open_experiment(&args.experiment, settings, progress)?;
    let mut coordinator = DisplayCoordinator::new();
    let reporter = ProgressReporter::with_callback(progress.get_callback());

    let outcome = coordinator.process(&args.id, &mut model, &FileLoader, &reporter)?;
    match &outcome {
        RotamerOutcome::NoReceptor => {
            println!("The experiment declares no protein_datafile; nothing to apply.");
        }
        RotamerOutcome::Unavailable => {
            println!("No rotamer information in {}.", args.id);
        }
        RotamerOutcome::Applied(report) => {
            println!("{}", describe(&model, report));
        }
    }

    if let (Some(path), RotamerOutcome::Applied(_)) = (&args.output, &outcome) {
        let receptor = model
            .receptor()
            .ok_or_else(|| CliError::Config("The experiment has no receptor.".to_string()))?;
        info!("Writing patched receptor to {:?}", path);
        write_structure(receptor, path).map_err(|e| CliError::FileWriting {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Patched receptor written to: {}", path.display());
    }
    Ok(())
}

pub(crate) fn describe(model: &ResultModel, report: &RotamerReport) -> String {
    let mut text = format!(
        "✓ Moved {} atom(s), skipped {} line(s); {} residue(s) updated",
        report.applied,
        report.skipped,
        report.residues.len()
    );
    let Some(receptor) = model.receptor() else {
        return text;
    };
    for location in &report.residues {
        let residue = receptor
            .molecules()
            .get(location.molecule)
            .and_then(|m| m.system.residue(location.residue_id));
        if let Some(residue) = residue {
            text.push_str(&format!("\n  {} ({})", residue.name, residue.number));
        }
    }
    text
}
