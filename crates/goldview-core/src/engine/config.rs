use serde::Deserialize;

/// How discovery treats solution files whose score header differs from the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaPolicy {
    /// Every file must declare exactly the fields of the first parsed file.
    #[default]
    Strict,
    /// Columns are the union of all headers in first-seen order; absent cells are empty.
    Union,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexerConfig {
    pub schema_policy: SchemaPolicy,
}

impl IndexerConfig {
    pub fn with_schema_policy(mut self, schema_policy: SchemaPolicy) -> Self {
        self.schema_policy = schema_policy;
        self
    }
}
