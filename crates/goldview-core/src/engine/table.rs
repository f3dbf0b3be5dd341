use super::config::SchemaPolicy;
use super::error::EngineError;
use serde::Deserialize;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the synthetic first column holding each row's solution file.
pub const FILENAME_COLUMN: &str = "Filename";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// The column set of a score table: [`FILENAME_COLUMN`] followed by the score fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<String>,
}

impl TableSchema {
    pub fn new<I, S>(score_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = std::iter::once(FILENAME_COLUMN.to_string())
            .chain(score_fields.into_iter().map(Into::into))
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn score_fields(&self) -> &[String] {
        &self.columns[1..]
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn field_index(&self, field: &str) -> Option<usize> {
        self.score_fields().iter().position(|f| f == field)
    }
}

/// One parsed solution file.
///
/// `values` is aligned with [`TableSchema::score_fields`]; a cell is `None` when the
/// file did not declare that field or its score row ended early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionRecord {
    pub key: usize,
    pub filename: PathBuf,
    pub values: Vec<Option<String>>,
}

/// A table of solution scores with a stable row identity and a separate display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    schema: TableSchema,
    records: Vec<SolutionRecord>,
    order: Vec<usize>,
}

impl ScoreTable {
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a row by its key.
    pub fn record(&self, key: usize) -> Option<&SolutionRecord> {
        self.records.get(key).filter(|r| r.key == key)
    }

    /// Rows in the current display order.
    pub fn rows(&self) -> impl Iterator<Item = &SolutionRecord> {
        self.order.iter().filter_map(|&key| self.records.get(key))
    }

    /// Keys in the current display order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Text of one cell, addressed by schema column index.
    pub fn cell<'a>(&self, record: &'a SolutionRecord, column: usize) -> Option<Cow<'a, str>> {
        match column {
            0 => Some(record.filename.to_string_lossy()),
            n => record
                .values
                .get(n - 1)
                .and_then(|v| v.as_deref())
                .map(Cow::Borrowed),
        }
    }

    /// Reorders the rows by `column`.
    ///
    /// Cells that parse as numbers compare numerically and come before text cells,
    /// which compare lexically; empty cells come last. The sort is stable and row keys
    /// are not changed.
    pub fn sort_by(&mut self, column: &str, order: SortOrder) -> Result<(), TableError> {
        let index = self
            .schema
            .index_of(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;

        let mut order_keys = std::mem::take(&mut self.order);
        order_keys.sort_by(|&a, &b| {
            let left = self.records.get(a).and_then(|r| self.cell(r, index));
            let right = self.records.get(b).and_then(|r| self.cell(r, index));
            compare_cells(left.as_deref(), right.as_deref(), order)
        });
        self.order = order_keys;
        Ok(())
    }

    /// Selects a subset of columns, rows in the current order.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Projection, TableError> {
        let indices = columns
            .iter()
            .map(|c| {
                self.schema
                    .index_of(c.as_ref())
                    .ok_or_else(|| TableError::UnknownColumn(c.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows()
            .map(|record| ProjectedRow {
                key: record.key,
                cells: indices
                    .iter()
                    .map(|&i| self.cell(record, i).map(Cow::into_owned).unwrap_or_default())
                    .collect(),
            })
            .collect();

        Ok(Projection {
            columns: indices
                .iter()
                .map(|&i| self.schema.columns[i].clone())
                .collect(),
            rows,
        })
    }

    /// All columns, rows in the current order.
    pub fn to_projection(&self) -> Projection {
        let rows = self
            .rows()
            .map(|record| ProjectedRow {
                key: record.key,
                cells: (0..self.schema.columns.len())
                    .map(|i| self.cell(record, i).map(Cow::into_owned).unwrap_or_default())
                    .collect(),
            })
            .collect();
        Projection {
            columns: self.schema.columns.clone(),
            rows,
        }
    }

    pub fn write_csv(&self, writer: impl Write) -> Result<(), TableError> {
        self.to_projection().write_csv(writer)
    }

    pub(crate) fn rewrite_filenames(&mut self, common: &Path) {
        for record in &mut self.records {
            if let Ok(relative) = record.filename.strip_prefix(common) {
                record.filename = relative.to_path_buf();
            }
        }
    }
}

fn compare_cells(left: Option<&str>, right: Option<&str>, order: SortOrder) -> Ordering {
    fn rank(cell: Option<&str>) -> (u8, Option<f64>) {
        match cell {
            None => (2, None),
            Some(text) => match text.parse::<f64>() {
                Ok(value) if !value.is_nan() => (0, Some(value)),
                _ => (1, None),
            },
        }
    }

    let (left_rank, left_num) = rank(left);
    let (right_rank, right_num) = rank(right);
    if left_rank != right_rank {
        return left_rank.cmp(&right_rank);
    }

    let ordering = match (left_num, right_num) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => left.cmp(&right),
    };
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// A rectangular text view of a score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub columns: Vec<String>,
    pub rows: Vec<ProjectedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    pub key: usize,
    pub cells: Vec<String>,
}

impl Projection {
    pub fn write_csv(&self, writer: impl Write) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(&row.cells)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Accumulates parsed solutions into a [`ScoreTable`] under a schema policy.
#[derive(Debug)]
pub(crate) struct TableBuilder {
    policy: SchemaPolicy,
    schema: Option<TableSchema>,
    records: Vec<SolutionRecord>,
}

impl TableBuilder {
    pub(crate) fn new(policy: SchemaPolicy) -> Self {
        Self {
            policy,
            schema: None,
            records: Vec::new(),
        }
    }

    /// Adds one solution and returns its key.
    ///
    /// The first solution fixes the schema. Under [`SchemaPolicy::Strict`] any later
    /// header that differs fails; under [`SchemaPolicy::Union`] new fields are appended.
    pub(crate) fn push(
        &mut self,
        filename: PathBuf,
        fields: Vec<String>,
        values: Vec<Option<String>>,
    ) -> Result<usize, EngineError> {
        let schema = self
            .schema
            .get_or_insert_with(|| TableSchema::new(fields.iter().cloned()));

        if schema.score_fields() != fields.as_slice() {
            match self.policy {
                SchemaPolicy::Strict => {
                    return Err(EngineError::SchemaMismatch {
                        path: filename,
                        expected: schema.score_fields().to_vec(),
                        found: fields,
                    });
                }
                SchemaPolicy::Union => {
                    for field in &fields {
                        if schema.field_index(field).is_none() {
                            schema.columns.push(field.clone());
                        }
                    }
                }
            }
        }

        let mut row = vec![None; schema.score_fields().len()];
        for (field, value) in fields.iter().zip(values) {
            if let Some(index) = schema.field_index(field) {
                row[index] = value;
            }
        }

        let key = self.records.len();
        self.records.push(SolutionRecord {
            key,
            filename,
            values: row,
        });
        Ok(key)
    }

    pub(crate) fn finish(self) -> ScoreTable {
        let schema = self.schema.unwrap_or_else(|| TableSchema::new(Vec::<String>::new()));
        let width = schema.score_fields().len();
        let mut records = self.records;
        for record in &mut records {
            record.values.resize(width, None);
        }
        let order = (0..records.len()).collect();
        ScoreTable {
            schema,
            records,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn cells(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(s.to_string())).collect()
    }

    fn sample_table() -> ScoreTable {
        let mut builder = TableBuilder::new(SchemaPolicy::Strict);
        let fields = strings(&["Score", "S(PLP)"]);
        builder
            .push("out/1_a_1_1.mol2".into(), fields.clone(), cells(&["55.1", "-40"]))
            .unwrap();
        builder
            .push("out/2_a_1_2.mol2".into(), fields.clone(), cells(&["61.0", "n/a"]))
            .unwrap();
        builder
            .push("out/3_a_1_3.mol2".into(), fields, cells(&["9.5", "-52"]))
            .unwrap();
        builder.finish()
    }

    #[test]
    fn builder_assigns_sequential_keys_and_filename_column() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.schema().columns(), &strings(&["Filename", "Score", "S(PLP)"]));
        assert_eq!(table.order(), &[0, 1, 2]);
        let keys: Vec<usize> = table.rows().map(|r| r.key).collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(table.record(1).unwrap().values[0].as_deref(), Some("61.0"));
    }

    #[test]
    fn strict_policy_rejects_different_header() {
        let mut builder = TableBuilder::new(SchemaPolicy::Strict);
        builder
            .push("a.mol2".into(), strings(&["Score"]), cells(&["1"]))
            .unwrap();
        let err = builder
            .push("b.mol2".into(), strings(&["Fitness"]), cells(&["2"]))
            .unwrap_err();
        match err {
            EngineError::SchemaMismatch { expected, found, .. } => {
                assert_eq!(expected, strings(&["Score"]));
                assert_eq!(found, strings(&["Fitness"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn union_policy_merges_columns_and_pads_rows() {
        let mut builder = TableBuilder::new(SchemaPolicy::Union);
        builder
            .push("a.mol2".into(), strings(&["Score", "A"]), cells(&["1", "x"]))
            .unwrap();
        builder
            .push("b.mol2".into(), strings(&["B", "Score"]), cells(&["y", "2"]))
            .unwrap();
        let table = builder.finish();

        assert_eq!(table.schema().score_fields(), &strings(&["Score", "A", "B"]));
        assert_eq!(
            table.record(0).unwrap().values,
            vec![Some("1".into()), Some("x".into()), None]
        );
        assert_eq!(
            table.record(1).unwrap().values,
            vec![Some("2".into()), None, Some("y".into())]
        );
    }

    #[test]
    fn sort_puts_numbers_before_text_and_keeps_keys() {
        let mut table = sample_table();
        table.sort_by("S(PLP)", SortOrder::Ascending).unwrap();
        assert_eq!(table.order(), &[2, 0, 1]);

        table.sort_by("Score", SortOrder::Descending).unwrap();
        assert_eq!(table.order(), &[1, 0, 2]);
        assert_eq!(table.record(2).unwrap().key, 2);
    }

    #[test]
    fn sort_is_stable_for_equal_cells() {
        let mut builder = TableBuilder::new(SchemaPolicy::Strict);
        for name in ["c", "a", "b"] {
            builder
                .push(format!("{name}.mol2").into(), strings(&["Score"]), cells(&["1.0"]))
                .unwrap();
        }
        let mut table = builder.finish();
        table.sort_by("Score", SortOrder::Descending).unwrap();
        assert_eq!(table.order(), &[0, 1, 2]);
        table.sort_by(FILENAME_COLUMN, SortOrder::Ascending).unwrap();
        assert_eq!(table.order(), &[1, 2, 0]);
    }

    #[test]
    fn sort_by_unknown_column_fails() {
        let mut table = sample_table();
        assert!(matches!(
            table.sort_by("Fitness", SortOrder::Ascending),
            Err(TableError::UnknownColumn(c)) if c == "Fitness"
        ));
    }

    #[test]
    fn project_selects_columns_in_display_order() {
        let mut table = sample_table();
        table.sort_by("Score", SortOrder::Ascending).unwrap();
        let projection = table.project(&["Score", "Filename"]).unwrap();
        assert_eq!(projection.columns, strings(&["Score", "Filename"]));
        assert_eq!(projection.rows[0].key, 2);
        assert_eq!(projection.rows[0].cells, strings(&["9.5", "out/3_a_1_3.mol2"]));
        assert!(table.project(&["Nope"]).is_err());
    }

    #[test]
    fn write_csv_emits_header_and_rows() {
        let table = sample_table();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Filename,Score,S(PLP)");
        assert_eq!(lines[1], "out/1_a_1_1.mol2,55.1,-40");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn rewrite_filenames_strips_common_prefix() {
        let mut builder = TableBuilder::new(SchemaPolicy::Strict);
        builder
            .push("/data/run/out/1.mol2".into(), strings(&["Score"]), cells(&["1"]))
            .unwrap();
        let mut table = builder.finish();
        table.rewrite_filenames(Path::new("/data/run"));
        assert_eq!(table.record(0).unwrap().filename, PathBuf::from("out/1.mol2"));
    }

    #[test]
    fn empty_builder_yields_filename_only_schema() {
        let table = TableBuilder::new(SchemaPolicy::Strict).finish();
        assert!(table.is_empty());
        assert_eq!(table.schema().columns(), &strings(&["Filename"]));
    }
}
