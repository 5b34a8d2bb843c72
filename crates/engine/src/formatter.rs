//! Cost formatter registry.
//!
//! Raw engine estimates are turned into normalized [`CostReport`]s by a
//! formatter. Lookup is two-tier: a per-engine override registered here wins,
//! otherwise the adapter's own default formatter applies. No engine name is
//! special-cased in code; the registry is just a map with a fallback.

use std::collections::HashMap;
use std::sync::Arc;

use costgate_core::{CostLineItem, CostReport};

use crate::adapter::{EngineAdapter, RawCost};

/// A formatter callable: raw engine estimate in, normalized report out.
pub type CostFormatter = Arc<dyn Fn(RawCost) -> CostReport + Send + Sync>;

/// Per-engine formatter overrides, keyed by lowercase engine tag.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    by_engine: HashMap<String, CostFormatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override for an engine tag, replacing any previous one.
    pub fn register(&mut self, engine_tag: impl Into<String>, formatter: CostFormatter) {
        self.by_engine.insert(engine_tag.into(), formatter);
    }

    pub fn contains(&self, engine_tag: &str) -> bool {
        self.by_engine.contains_key(engine_tag)
    }

    /// Format a raw estimate: the override for `engine_tag` if registered,
    /// else the adapter's default formatter.
    pub fn format(&self, engine_tag: &str, adapter: &dyn EngineAdapter, raw: RawCost) -> CostReport {
        match self.by_engine.get(engine_tag) {
            Some(formatter) => formatter(raw),
            None => adapter.cost_formatter(raw),
        }
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut engines: Vec<&str> = self.by_engine.keys().map(String::as_str).collect();
        engines.sort_unstable();
        f.debug_struct("FormatterRegistry")
            .field("engines", &engines)
            .finish()
    }
}

/// Convert a raw JSON array of objects into a report, one line item per
/// object, values passed through untouched. Non-array input or non-object
/// elements yield an empty report, i.e. "no estimate available".
pub fn format_rows(raw: RawCost) -> CostReport {
    let Some(rows) = raw.as_array() else {
        return CostReport::new();
    };

    rows.iter()
        .filter_map(|row| row.as_object())
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<CostLineItem>()
        })
        .collect()
}

/// The stock formatter: [`format_rows`] as a registrable callable.
pub fn rows_formatter() -> CostFormatter {
    Arc::new(format_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{EngineError, QuerySource};
    use crate::database::Database;
    use async_trait::async_trait;
    use costgate_core::{BYTES_SCANNED_KEY, COST_KEY};
    use serde_json::json;

    /// Adapter whose default formatter tags every item, so tests can tell
    /// which tier of the lookup ran.
    struct TaggingAdapter;

    #[async_trait]
    impl EngineAdapter for TaggingAdapter {
        fn engine_name(&self) -> &str {
            "presto"
        }

        async fn estimate_query_cost(
            &self,
            _database: &Database,
            _catalog: Option<&str>,
            _schema: &str,
            _sql: &str,
            _source: QuerySource,
        ) -> Result<RawCost, EngineError> {
            Ok(json!([]))
        }

        fn cost_formatter(&self, raw: RawCost) -> CostReport {
            let mut report = format_rows(raw);
            let mut tagged = CostLineItem::new();
            tagged.insert("Source", json!("adapter default"));
            report.push(tagged);
            report
        }
    }

    #[test]
    fn format_rows_passes_objects_through() {
        let raw = json!([
            {"Bytes Scanned": "5.2 GB", "Cost": "42", "Relative cost": "high"},
            {"Cost": 7}
        ]);

        let report = format_rows(raw);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.items()[0].get(BYTES_SCANNED_KEY),
            Some(&json!("5.2 GB"))
        );
        assert_eq!(report.items()[0].get("Relative cost"), Some(&json!("high")));
        assert_eq!(report.items()[1].get(COST_KEY), Some(&json!(7)));
    }

    #[test]
    fn format_rows_rejects_non_array_shapes() {
        assert!(format_rows(json!({"Cost": 1})).is_empty());
        assert!(format_rows(json!("5.2 GB")).is_empty());
        assert!(format_rows(json!(null)).is_empty());
    }

    #[test]
    fn format_rows_skips_non_object_elements() {
        let report = format_rows(json!([{"Cost": 1}, "stray", 42]));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn registry_falls_back_to_adapter_default() {
        let registry = FormatterRegistry::new();
        let adapter = TaggingAdapter;

        let report = registry.format("presto", &adapter, json!([]));
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.items()[0].get("Source"),
            Some(&json!("adapter default"))
        );
    }

    #[test]
    fn registered_override_wins_over_adapter_default() {
        let mut registry = FormatterRegistry::new();
        registry.register("presto", rows_formatter());
        let adapter = TaggingAdapter;

        let report = registry.format("presto", &adapter, json!([{"Cost": 1}]));
        // The stock formatter ran, so no adapter tag was appended.
        assert_eq!(report.len(), 1);
        assert_eq!(report.items()[0].get("Source"), None);
    }

    #[test]
    fn override_for_other_engine_does_not_apply() {
        let mut registry = FormatterRegistry::new();
        registry.register("trino", rows_formatter());
        let adapter = TaggingAdapter;

        let report = registry.format("presto", &adapter, json!([]));
        assert_eq!(
            report.items()[0].get("Source"),
            Some(&json!("adapter default"))
        );
    }
}
