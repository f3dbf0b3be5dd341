pub mod details;
pub mod rotamers;
pub mod show;
pub mod table;

use crate::cli::ExperimentArgs;
use crate::config::PartialSettings;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use goldview::core::io::loader::FileLoader;
use goldview::engine::model::ResultModel;
use goldview::engine::progress::ProgressReporter;
use goldview::workflows;
use tracing::info;

/// Opens the experiment named by `args` with the merged discovery settings.
pub(crate) fn open_experiment(
    args: &ExperimentArgs,
    settings: &PartialSettings,
    progress: &CliProgressHandler,
) -> Result<ResultModel> {
    let config = settings.indexer_config(args);
    info!("Opening experiment {:?} ({:?} schema).", &args.conf, config.schema_policy);
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let model = workflows::open::run(&args.conf, &config, &FileLoader, &reporter)?;
    Ok(model)
}
