use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input payload for a cost-estimation run. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationRequest {
    /// Identifier of the database connection to estimate against.
    pub database_id: i64,
    /// Raw query text, possibly containing template placeholders.
    #[serde(default)]
    pub sql: String,
    /// Placeholder name → value. Empty means the SQL is used verbatim.
    #[serde(default)]
    pub template_params: HashMap<String, Value>,
    /// Optional catalog name.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Optional schema name; an empty string is treated as unspecified.
    #[serde(default)]
    pub schema: Option<String>,
}

impl EstimationRequest {
    /// Request with just a database and SQL text, no templating.
    pub fn new(database_id: i64, sql: impl Into<String>) -> Self {
        Self {
            database_id,
            sql: sql.into(),
            template_params: HashMap::new(),
            catalog: None,
            schema: None,
        }
    }

    /// Schema normalized to `""` when absent, so adapters see one type.
    pub fn schema_or_default(&self) -> &str {
        self.schema.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_payload_deserializes() {
        let json = r#"{"database_id": 3, "sql": "SELECT 1"}"#;
        let request: EstimationRequest = serde_json::from_str(json).expect("deserialize");

        assert_eq!(request.database_id, 3);
        assert_eq!(request.sql, "SELECT 1");
        assert!(request.template_params.is_empty());
        assert_eq!(request.catalog, None);
        assert_eq!(request.schema, None);
        assert_eq!(request.schema_or_default(), "");
    }

    #[test]
    fn full_payload_deserializes() {
        let json = r#"{
            "database_id": 7,
            "sql": "SELECT * FROM events WHERE ds = '{{ ds }}'",
            "template_params": {"ds": "2026-08-06"},
            "catalog": "hive",
            "schema": "analytics"
        }"#;
        let request: EstimationRequest = serde_json::from_str(json).expect("deserialize");

        assert_eq!(request.database_id, 7);
        assert_eq!(request.template_params.get("ds"), Some(&json!("2026-08-06")));
        assert_eq!(request.catalog.as_deref(), Some("hive"));
        assert_eq!(request.schema_or_default(), "analytics");
    }

    #[test]
    fn sql_may_be_empty() {
        let json = r#"{"database_id": 1}"#;
        let request: EstimationRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.sql, "");
    }
}
