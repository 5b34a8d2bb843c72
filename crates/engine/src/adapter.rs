//! Engine adapter capability surface.
//!
//! Each analytical engine (Trino, Presto, BigQuery, ...) plugs in through
//! [`EngineAdapter`]: it produces a raw, engine-shaped cost estimate for a
//! not-yet-executed query and knows how to format that raw shape into a
//! normalized [`CostReport`]. The estimation logic itself (EXPLAIN queries,
//! dry runs) lives entirely behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use costgate_core::CostReport;

use crate::database::Database;
use crate::formatter::format_rows;

/// Opaque engine-shaped cost estimate. Its structure is known only to the
/// adapter's paired formatter.
pub type RawCost = serde_json::Value;

/// The surface a query originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySource {
    Chart,
    Dashboard,
    SqlLab,
}

/// Errors that can occur inside an engine adapter.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Anything the adapter raised while talking to its engine,
    /// propagated unchanged.
    #[error(transparent)]
    Adapter(#[from] anyhow::Error),

    /// SQL template rendering failed before the adapter was invoked.
    #[error("Template rendering failed: {0}")]
    Template(String),
}

/// Per-engine capability set consumed by the cost-estimation commands.
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Engine name (e.g. "trino", "presto", "bigquery"). Lowercased on use to
    /// key per-engine formatters and threshold policies.
    fn engine_name(&self) -> &str;

    /// Ask the engine for a cost estimate of `sql` without executing it.
    ///
    /// This is the single blocking call of the subsystem; callers wrap it in
    /// a scoped timeout. Adapters perform no timeout handling of their own.
    async fn estimate_query_cost(
        &self,
        database: &Database,
        catalog: Option<&str>,
        schema: &str,
        sql: &str,
        source: QuerySource,
    ) -> Result<RawCost, EngineError>;

    /// Convert the adapter's raw estimate into a normalized report.
    ///
    /// The default expects a JSON array of objects and passes each object
    /// through as a line item; adapters with another raw shape override this.
    fn cost_formatter(&self, raw: RawCost) -> CostReport {
        format_rows(raw)
    }
}
