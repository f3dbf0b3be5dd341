use super::open_experiment;
use crate::cli::DetailsArgs;
use crate::config::PartialSettings;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use goldview::engine::model::ResultModel;
use tracing::debug;

pub fn run(
    args: DetailsArgs,
    settings: &PartialSettings,
    progress: &CliProgressHandler,
) -> Result<()> {
    let model = open_experiment(&args.experiment, settings, progress)?;
    println!("{}", describe(&model, args.name.as_deref())?);
    Ok(())
}

/// The comment block of `name`, or the joined `Comments` column without a name.
pub(crate) fn describe(model: &ResultModel, name: Option<&str>) -> Result<String> {
    let details = model.details(name)?;
    if details.is_empty() {
        debug!("No details to print.");
    }
    Ok(details)
}
