pub mod adapter;
pub mod database;
pub mod formatter;
pub mod template;

pub use adapter::{EngineAdapter, EngineError, QuerySource, RawCost};
pub use database::{Database, DatabaseRepository, StaticDatabaseRepository};
pub use formatter::{rows_formatter, CostFormatter, FormatterRegistry};
pub use template::{
    JinjaTemplateFactory, JinjaTemplateProcessor, TemplateProcessor, TemplateProcessorFactory,
};
