mod defaults;

use crate::cli::{ExperimentArgs, TableArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use goldview::engine::config::{IndexerConfig, SchemaPolicy};
use goldview::engine::table::SortOrder;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialTableSettings {
    #[serde(rename = "sort-by")]
    sort_by: Option<String>,
    order: Option<SortOrder>,
    columns: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialDiscoverySettings {
    #[serde(rename = "schema-policy")]
    schema_policy: Option<SchemaPolicy>,
}

/// Settings read from the optional TOML file; every field may be overridden on the
/// command line.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    table: Option<PartialTableSettings>,
    discovery: Option<PartialDiscoverySettings>,
}

/// How the `table` command presents the score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub sort_by: Option<String>,
    pub order: SortOrder,
    /// Columns to print; empty means all.
    pub columns: Vec<String>,
}

impl PartialSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading settings from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn indexer_config(&self, args: &ExperimentArgs) -> IndexerConfig {
        let defaults = DefaultsConfig::default();
        let schema_policy = args
            .schema
            .map(SchemaPolicy::from)
            .or(self.discovery.as_ref().and_then(|d| d.schema_policy))
            .unwrap_or(defaults.schema_policy);
        IndexerConfig::default().with_schema_policy(schema_policy)
    }

    pub fn table_view(&self, args: &TableArgs) -> TableView {
        let defaults = DefaultsConfig::default();
        let file = self.table.clone().unwrap_or_default();

        let order = if args.descending {
            SortOrder::Descending
        } else {
            file.order.unwrap_or(defaults.sort_order)
        };
        let columns = if args.columns.is_empty() {
            file.columns.unwrap_or_default()
        } else {
            args.columns.clone()
        };

        TableView {
            sort_by: args.sort.clone().or(file.sort_by),
            order,
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn table_args(extra: &[&str]) -> TableArgs {
        let mut argv = vec!["goldview", "table", "gold.conf"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Table(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn write_settings(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goldview.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_settings_file() {
        let settings = PartialSettings::load(None).unwrap();
        let args = table_args(&[]);

        let view = settings.table_view(&args);
        assert_eq!(view.sort_by, None);
        assert_eq!(view.order, SortOrder::Ascending);
        assert!(view.columns.is_empty());
        assert_eq!(
            settings.indexer_config(&args.experiment).schema_policy,
            SchemaPolicy::Strict
        );
    }

    #[test]
    fn settings_file_values_are_used() {
        let (_dir, path) = write_settings(
            r#"
            [table]
            sort-by = "Score"
            order = "descending"
            columns = ["Filename", "Score"]

            [discovery]
            schema-policy = "union"
            "#,
        );
        let settings = PartialSettings::from_file(&path).unwrap();
        let args = table_args(&[]);

        let view = settings.table_view(&args);
        assert_eq!(view.sort_by.as_deref(), Some("Score"));
        assert_eq!(view.order, SortOrder::Descending);
        assert_eq!(view.columns, vec!["Filename", "Score"]);
        assert_eq!(
            settings.indexer_config(&args.experiment).schema_policy,
            SchemaPolicy::Union
        );
    }

    #[test]
    fn cli_arguments_override_settings_file() {
        let (_dir, path) = write_settings(
            r#"
            [table]
            sort-by = "Score"
            columns = ["Score"]

            [discovery]
            schema-policy = "union"
            "#,
        );
        let settings = PartialSettings::from_file(&path).unwrap();
        let args = table_args(&[
            "--sort",
            "S(PLP)",
            "--columns",
            "Filename",
            "--descending",
            "--schema",
            "strict",
        ]);

        let view = settings.table_view(&args);
        assert_eq!(view.sort_by.as_deref(), Some("S(PLP)"));
        assert_eq!(view.order, SortOrder::Descending);
        assert_eq!(view.columns, vec!["Filename"]);
        assert_eq!(
            settings.indexer_config(&args.experiment).schema_policy,
            SchemaPolicy::Strict
        );
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        let (_dir, path) = write_settings("[table]\nsort = \"Score\"\n");
        assert!(matches!(
            PartialSettings::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_settings_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            PartialSettings::load(Some(&dir.path().join("absent.toml"))),
            Err(CliError::Io(_))
        ));
    }
}
