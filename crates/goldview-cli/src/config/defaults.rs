use goldview::engine::config::SchemaPolicy;
use goldview::engine::table::SortOrder;

pub struct DefaultsConfig {
    pub schema_policy: SchemaPolicy,
    pub sort_order: SortOrder,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            schema_policy: SchemaPolicy::Strict,
            sort_order: SortOrder::Ascending,
        }
    }
}
