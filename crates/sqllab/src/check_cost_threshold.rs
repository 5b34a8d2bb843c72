//! Threshold gating over a query cost estimate.
//!
//! [`ThresholdCheckCommand`] runs an estimation, compares each line item of
//! the report against the engine's [`ThresholdPolicy`], and produces a single
//! [`ThresholdVerdict`] the front-end uses to gate execution. The check is
//! advisory: estimation failures collapse to an empty verdict instead of
//! blocking the caller, so an engine hiccup never stops a query from running.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use costgate_core::{CostReport, ThresholdPolicy, BYTES_SCANNED_KEY, COST_KEY};

use crate::bytesize;
use crate::context::SqlLabContext;
use crate::estimate::EstimateCommand;
use crate::request::EstimationRequest;

/// Fixed confirmation prompt appended to every assembled warning.
const CONFIRMATION_SUFFIX: &str = " Are you sure you want to continue?";

// ── Verdict types ────────────────────────────────────────────────

/// Threshold and observed values for each check that actually ran.
///
/// Line items are processed in order and these fields are overwritten as they
/// go, so with a multi-item report the last item wins for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_threshold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl ThresholdInfo {
    /// Returns `true` when no check recorded anything.
    pub fn is_empty(&self) -> bool {
        self.bytes_threshold.is_none()
            && self.estimated_bytes.is_none()
            && self.cost_threshold.is_none()
            && self.estimated_cost.is_none()
    }
}

/// The gating result: either a clearance or a human-readable warning the UI
/// shows in a confirmation dialog.
///
/// `exceeds_threshold` is `true` exactly when `formatted_warning` is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdVerdict {
    pub exceeds_threshold: bool,
    pub estimated_cost: CostReport,
    pub threshold_info: ThresholdInfo,
    pub formatted_warning: Option<String>,
}

impl ThresholdVerdict {
    /// The canonical empty verdict: no cost, no warning, not exceeded.
    ///
    /// Returned when checking is disabled, estimation failed or produced
    /// nothing. Indistinguishable from "feature disabled" by design; callers
    /// treat both as "proceed".
    pub fn empty() -> Self {
        Self::default()
    }

    /// A verdict that carries a report but ran no checks.
    fn cleared(report: CostReport) -> Self {
        Self {
            exceeds_threshold: false,
            estimated_cost: report,
            threshold_info: ThresholdInfo::default(),
            formatted_warning: None,
        }
    }
}

// ── Command ──────────────────────────────────────────────────────

/// Runs an estimation and gates it against the engine's threshold policy.
///
/// `run` is total: every estimation failure is logged and swallowed, and no
/// data-shape problem in the report can make it fail.
pub struct ThresholdCheckCommand {
    context: Arc<SqlLabContext>,
    request: EstimationRequest,
}

impl ThresholdCheckCommand {
    pub fn new(context: Arc<SqlLabContext>, request: EstimationRequest) -> Self {
        Self { context, request }
    }

    pub async fn run(&self) -> ThresholdVerdict {
        if !self.context.config.cost_checking_enabled {
            return ThresholdVerdict::empty();
        }

        let estimate = EstimateCommand::new(self.context.clone(), self.request.clone());
        let report = match estimate.run().await {
            Ok(report) => report,
            Err(err) => {
                warn!(
                    database_id = self.request.database_id,
                    error = %err,
                    "query cost estimation failed; skipping threshold check"
                );
                return ThresholdVerdict::empty();
            }
        };

        if report.is_empty() {
            return ThresholdVerdict::empty();
        }

        // The estimate just ran, so the database resolves; guard anyway.
        let Some(database) = self.context.databases.find_by_id(self.request.database_id) else {
            return ThresholdVerdict::cleared(report);
        };

        let engine_tag = database.engine_tag();
        let policy = self.context.config.policy_for(&engine_tag);
        if policy.is_empty() {
            debug!(engine = %engine_tag, "no threshold policy for engine; query cleared");
            return ThresholdVerdict::cleared(report);
        }

        self.apply_policy(report, &policy)
    }

    /// Walk the report in order, bytes check before cost check per item,
    /// accumulating warning fragments. Comparisons are strict: a value equal
    /// to its threshold does not exceed.
    fn apply_policy(&self, report: CostReport, policy: &ThresholdPolicy) -> ThresholdVerdict {
        let mut info = ThresholdInfo::default();
        let mut exceeded = false;
        let mut fragments: Vec<String> = Vec::new();

        for item in report.iter() {
            if let (Some(threshold), Some(value)) =
                (policy.bytes_scanned, item.get(BYTES_SCANNED_KEY))
            {
                match bytesize::parse_value(value) {
                    Ok(observed) => {
                        info.bytes_threshold = Some(threshold);
                        info.estimated_bytes = Some(observed);
                        if observed > threshold {
                            exceeded = true;
                            fragments.push(format!(
                                "This query will scan approximately {} of data, \
                                 which exceeds the threshold of {}.",
                                bytesize::format(observed),
                                bytesize::format(threshold)
                            ));
                        }
                    }
                    Err(err) => {
                        warn!(
                            value = %value,
                            error = %err,
                            "could not parse estimated bytes scanned; skipping bytes check"
                        );
                    }
                }
            }

            if let (Some(threshold), Some(value)) = (policy.cost_threshold, item.get(COST_KEY)) {
                match coerce_float(value) {
                    Ok(observed) => {
                        info.cost_threshold = Some(threshold);
                        info.estimated_cost = Some(observed);
                        if observed > threshold {
                            exceeded = true;
                            fragments.push(format!(
                                "This query has an estimated cost of {observed}, \
                                 which exceeds the threshold of {threshold}."
                            ));
                        }
                    }
                    Err(err) => {
                        warn!(
                            value = %value,
                            error = %err,
                            "could not parse estimated cost; skipping cost check"
                        );
                    }
                }
            }
        }

        let formatted_warning = if fragments.is_empty() {
            None
        } else {
            Some(format!("{}{}", fragments.join(" "), CONFIRMATION_SUFFIX))
        };

        ThresholdVerdict {
            exceeds_threshold: exceeded,
            estimated_cost: report,
            threshold_info: info,
            formatted_warning,
        }
    }
}

/// Coerce a line-item cost value to a float.
fn coerce_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{n} is outside the float range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{s:?} is not numeric")),
        other => Err(format!("unexpected value type: {other}")),
    }
}

// ── Tests ────────────────────────────────────────────────────────
