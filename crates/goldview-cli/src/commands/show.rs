use super::open_experiment;
use crate::cli::ShowArgs;
use crate::config::PartialSettings;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use goldview::core::io::loader::FileLoader;
use goldview::core::models::structure::Structure;
use goldview::engine::display::{DisplayCoordinator, DisplayReport};
use goldview::engine::model::ResultModel;
use tracing::{info, warn};

pub fn run(args: ShowArgs, settings: &PartialSettings, progress: &CliProgressHandler) -> Result<()> {
    if args.ids.is_empty() && args.rows.is_empty() {
        return Err(CliError::Argument(
            "Name at least one solution identifier or --row key.".to_string(),
        ));
    }
    let model = open_experiment(&args.experiment, settings, progress)?;
    let mut coordinator = DisplayCoordinator::new();
    let report = show(&mut coordinator, &model, &args.ids, &args.rows);

    for key in coordinator.displayed() {
        if let Some(structure) = coordinator.structure(key) {
            println!("{}", summarize(key, structure));
        }
    }
    for (key, error) in &report.failures {
        eprintln!("✗ {}: {}", key, error);
    }

    if report.displayed.is_empty() {
        return Err(CliError::Other(anyhow::anyhow!(
            "None of the requested solutions could be loaded."
        )));
    }
    Ok(())
}

pub(crate) fn show(
    coordinator: &mut DisplayCoordinator,
    model: &ResultModel,
    ids: &[String],
    rows: &[usize],
) -> DisplayReport {
    let mut report = coordinator.display(ids, model, &FileLoader);
    let by_row = coordinator.display_rows(rows, model, &FileLoader);
    report.displayed.extend(by_row.displayed);
    report.failures.extend(by_row.failures);

    info!(
        displayed = report.displayed.len(),
        failed = report.failures.len(),
        "Display request finished."
    );
    if !report.is_complete() {
        warn!("{} solution(s) could not be loaded.", report.failures.len());
    }
    report
}

pub(crate) fn summarize(key: &str, structure: &Structure) -> String {
    let names: Vec<&str> = structure
        .molecules()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    format!(
        "{}: {} molecule(s), {} atom(s) [{}]",
        key,
        structure.molecules().len(),
        structure.atom_count(),
        names.join(", ")
    )
}
