//! Query cost estimation command.
//!
//! Validates the request, expands SQL templates, runs the engine adapter's
//! estimate call under the configured timeout, and normalizes the raw result
//! through the engine's preferred formatter. Callers that only want a
//! go / no-go verdict use [`crate::ThresholdCheckCommand`] instead, which
//! wraps this command and never fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use costgate_core::CostReport;
use costgate_engine::{Database, EngineError, QuerySource};

use crate::context::SqlLabContext;
use crate::request::EstimationRequest;

/// Errors from a cost-estimation run.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// The supplied database id did not resolve. The 404 of this subsystem.
    #[error("The database could not be found (id {database_id})")]
    DatabaseNotFound { database_id: i64 },

    /// The adapter call exceeded the configured timeout.
    #[error(
        "The query estimation exceeded the {seconds} second timeout. \
         The query may be too complex, or the database may be under heavy load"
    )]
    Timeout {
        seconds: u64,
        #[source]
        source: tokio::time::error::Elapsed,
    },

    /// Template or adapter failure, propagated unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Asks the engine for the cost of a not-yet-executed query.
///
/// Each run is independent: nothing is cached, so estimates reflect current
/// engine state, and the request is never mutated.
pub struct EstimateCommand {
    context: Arc<SqlLabContext>,
    request: EstimationRequest,
}

impl EstimateCommand {
    pub fn new(context: Arc<SqlLabContext>, request: EstimationRequest) -> Self {
        Self { context, request }
    }

    /// Resolve the target database, failing fast when the id is unknown.
    pub fn validate(&self) -> Result<Arc<Database>, EstimateError> {
        self.context
            .databases
            .find_by_id(self.request.database_id)
            .ok_or(EstimateError::DatabaseNotFound {
                database_id: self.request.database_id,
            })
    }

    /// Run the estimation: validate → expand templates → estimate under
    /// timeout → format.
    pub async fn run(&self) -> Result<CostReport, EstimateError> {
        let database = self.validate()?;
        let sql = self.rendered_sql(&database)?;

        let seconds = self.context.config.estimate_timeout_secs;
        debug!(
            database_id = database.id,
            engine = %database.engine_tag(),
            timeout_secs = seconds,
            "estimating query cost"
        );

        let estimate = database.adapter.estimate_query_cost(
            &database,
            self.request.catalog.as_deref(),
            self.request.schema_or_default(),
            &sql,
            QuerySource::SqlLab,
        );

        let raw = match tokio::time::timeout(Duration::from_secs(seconds), estimate).await {
            Ok(result) => result?,
            Err(elapsed) => {
                return Err(EstimateError::Timeout {
                    seconds,
                    source: elapsed,
                })
            }
        };

        Ok(self
            .context
            .formatters
            .format(&database.engine_tag(), database.adapter.as_ref(), raw))
    }

    /// Expand template placeholders when parameters were supplied.
    ///
    /// Empty parameters must not touch the template processor: the SQL is
    /// used verbatim, unexpanded braces and all.
    fn rendered_sql(&self, database: &Database) -> Result<String, EstimateError> {
        if self.request.template_params.is_empty() {
            return Ok(self.request.sql.clone());
        }
        let processor = self.context.templates.processor_for(database);
        Ok(processor.process_template(&self.request.sql, &self.request.template_params)?)
    }
}

// ---------------------------------------------------------------------------
// Tests — error surface only; command behavior is covered in tests/
// ---------------------------------------------------------------------------
