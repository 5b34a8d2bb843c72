use std::sync::Arc;

use costgate_core::SqlLabConfig;
use costgate_engine::{
    DatabaseRepository, FormatterRegistry, JinjaTemplateFactory, TemplateProcessorFactory,
};

/// Process-wide collaborators shared by the estimation commands.
///
/// Constructed once at startup and read-only thereafter; concurrent requests
/// share it behind an `Arc` and no command mutates it.
pub struct SqlLabContext {
    /// Cost-checking configuration (feature switch, timeout, thresholds).
    pub config: SqlLabConfig,
    /// Resolves database ids to connection records.
    pub databases: Arc<dyn DatabaseRepository>,
    /// Builds template processors bound to a database.
    pub templates: Arc<dyn TemplateProcessorFactory>,
    /// Per-engine cost formatter overrides.
    pub formatters: FormatterRegistry,
}

impl SqlLabContext {
    pub fn new(
        config: SqlLabConfig,
        databases: Arc<dyn DatabaseRepository>,
        templates: Arc<dyn TemplateProcessorFactory>,
        formatters: FormatterRegistry,
    ) -> Self {
        Self {
            config,
            databases,
            templates,
            formatters,
        }
    }

    /// Context with the minijinja template factory and no formatter overrides.
    pub fn with_defaults(config: SqlLabConfig, databases: Arc<dyn DatabaseRepository>) -> Self {
        Self::new(
            config,
            databases,
            Arc::new(JinjaTemplateFactory),
            FormatterRegistry::new(),
        )
    }
}
