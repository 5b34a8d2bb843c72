//! SQL template expansion.
//!
//! User SQL may carry Jinja-style placeholders that are rewritten before the
//! engine sees the query. The processor is a seam: hosts with their own macro
//! layer implement [`TemplateProcessor`] themselves, everyone else uses the
//! minijinja-backed default. Templates are arbitrary strings (not
//! pre-registered), so a fresh [`minijinja::Environment`] is created per
//! render call.

use std::collections::HashMap;

use serde_json::Value;

use crate::adapter::EngineError;
use crate::database::Database;

/// Expands template placeholders in user SQL.
pub trait TemplateProcessor: Send + Sync {
    /// Rewrite `sql`, substituting the given parameters.
    fn process_template(
        &self,
        sql: &str,
        params: &HashMap<String, Value>,
    ) -> Result<String, EngineError>;
}

/// Builds a [`TemplateProcessor`] bound to a database.
///
/// Binding matters for hosts whose macros expose connection context (current
/// schema, engine-specific helpers); the default Jinja factory only records
/// the connection name for error context.
pub trait TemplateProcessorFactory: Send + Sync {
    fn processor_for(&self, database: &Database) -> Box<dyn TemplateProcessor>;
}

// ── Minijinja default ────────────────────────────────────────────

/// Default processor rendering SQL through minijinja.
#[derive(Debug)]
pub struct JinjaTemplateProcessor {
    database_name: String,
}

impl JinjaTemplateProcessor {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
        }
    }
}

impl TemplateProcessor for JinjaTemplateProcessor {
    fn process_template(
        &self,
        sql: &str,
        params: &HashMap<String, Value>,
    ) -> Result<String, EngineError> {
        let env = minijinja::Environment::new();
        env.render_str(sql, params).map_err(|e| {
            tracing::warn!(
                database = %self.database_name,
                error = %e,
                "SQL template rendering failed"
            );
            EngineError::Template(e.to_string())
        })
    }
}

/// Factory yielding [`JinjaTemplateProcessor`]s.
#[derive(Debug, Default)]
pub struct JinjaTemplateFactory;

impl TemplateProcessorFactory for JinjaTemplateFactory {
    fn processor_for(&self, database: &Database) -> Box<dyn TemplateProcessor> {
        Box::new(JinjaTemplateProcessor::new(database.name.clone()))
    }
}
