use clap::{Args, Parser, Subcommand, ValueEnum};
use goldview::engine::config::SchemaPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "GoldView CLI - Browse the results of a GOLD docking experiment: score tables, solution details and receptor rotamers.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a settings file in TOML format
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the score table of every solution found for an experiment.
    Table(TableArgs),
    /// Print the comment block recorded in a solution file.
    Details(DetailsArgs),
    /// Load solution structures and print a summary of each.
    Show(ShowArgs),
    /// Apply the rotated receptor atoms of a solution to the receptor.
    Rotamers(RotamersArgs),
}

/// Arguments shared by every command that opens an experiment.
#[derive(Args, Debug, Clone)]
pub struct ExperimentArgs {
    /// Path to the GOLD configuration file (gold.conf).
    #[arg(required = true, value_name = "CONF")]
    pub conf: PathBuf,

    /// How to handle solutions whose score fields differ.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub schema: Option<SchemaArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaArg {
    /// Fail on any solution whose score fields differ from the first one.
    Strict,
    /// Merge the score fields of all solutions.
    Union,
}

impl From<SchemaArg> for SchemaPolicy {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Strict => SchemaPolicy::Strict,
            SchemaArg::Union => SchemaPolicy::Union,
        }
    }
}

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Sort rows by this column, overriding the settings file.
    #[arg(short, long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort in descending order.
    #[arg(short, long)]
    pub descending: bool,

    /// Comma-separated list of columns to print.
    #[arg(short, long, value_delimiter = ',', value_name = "A,B,...")]
    pub columns: Vec<String>,

    /// Write the table as CSV to this path instead of printing it.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `details` subcommand.
#[derive(Args, Debug)]
pub struct DetailsArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// File name of the solution (e.g. 1_ligand_1_1.mol2). Without it, the
    /// `Comments` column of the table is printed.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Solution identifiers as printed in the `Filename` column.
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Address solutions by table row key instead. Can be used multiple times.
    #[arg(short, long = "row", value_name = "KEY")]
    pub rows: Vec<usize>,
}

/// Arguments for the `rotamers` subcommand.
#[derive(Args, Debug)]
pub struct RotamersArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Solution identifier as printed in the `Filename` column.
    #[arg(required = true, value_name = "ID")]
    pub id: String,

    /// Write the patched receptor to this file, in the receptor's own format.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
