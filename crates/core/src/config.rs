use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

/// Default estimation timeout in seconds.
const DEFAULT_ESTIMATE_TIMEOUT_SECS: u64 = 10;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

// ── Env helpers ──────────────────────────────────────────────────

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

// ── ThresholdPolicy ──────────────────────────────────────────────

/// Per-engine cost limits. A missing key means that check is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Ceiling on estimated bytes scanned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_scanned: Option<u64>,
    /// Ceiling on the engine's opaque cost scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_threshold: Option<f64>,
}

impl ThresholdPolicy {
    /// Returns `true` when neither limit is set, i.e. no check will run.
    pub fn is_empty(&self) -> bool {
        self.bytes_scanned.is_none() && self.cost_threshold.is_none()
    }
}

// ── SqlLabConfig ─────────────────────────────────────────────────

/// Configuration for query cost estimation and threshold gating.
///
/// Reads from environment variables with optional profile prefix.
/// When `COSTGATE_PROFILE=PROD`, checks `PROD_SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT`
/// before `SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT`.
///
/// Constructed once at process init and read-only thereafter; commands receive
/// it by value rather than reading process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlLabConfig {
    /// Whether cost checking gates query execution at all.
    pub cost_checking_enabled: bool,
    /// Timeout for a single cost-estimation call, in seconds.
    pub estimate_timeout_secs: u64,
    /// Per-engine threshold policies, keyed by lowercase engine tag.
    pub thresholds: HashMap<String, ThresholdPolicy>,
}

impl Default for SqlLabConfig {
    fn default() -> Self {
        Self {
            cost_checking_enabled: false,
            estimate_timeout_secs: DEFAULT_ESTIMATE_TIMEOUT_SECS,
            thresholds: HashMap::new(),
        }
    }
}

impl SqlLabConfig {
    /// Build config from environment variables.
    ///
    /// Reads `COSTGATE_PROFILE` to determine the profile prefix.
    pub fn from_env() -> Self {
        let profile = env_opt("COSTGATE_PROFILE")
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        Self::from_env_profiled(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn from_env_profiled(profile: &str) -> Self {
        Self {
            cost_checking_enabled: profiled_env_bool(
                profile,
                "SQLLAB_QUERY_COST_CHECKING_ENABLED",
                false,
            ),
            estimate_timeout_secs: profiled_env_u64(
                profile,
                "SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT",
                DEFAULT_ESTIMATE_TIMEOUT_SECS,
            ),
            thresholds: Self::thresholds_from_env(profile),
        }
    }

    /// Parse `SQLLAB_QUERY_COST_THRESHOLDS` as a JSON object keyed by engine tag.
    ///
    /// A malformed value logs a warning and yields an empty table, which
    /// disables all threshold checks rather than failing startup.
    fn thresholds_from_env(profile: &str) -> HashMap<String, ThresholdPolicy> {
        let Some(raw) = profiled_env_opt(profile, "SQLLAB_QUERY_COST_THRESHOLDS") else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "SQLLAB_QUERY_COST_THRESHOLDS is not valid JSON; cost thresholds disabled"
                );
                HashMap::new()
            }
        }
    }

    /// Look up the threshold policy for an engine tag.
    ///
    /// Returns the empty policy when the engine has no entry, in which case
    /// no checks run for it.
    pub fn policy_for(&self, engine_tag: &str) -> ThresholdPolicy {
        self.thresholds.get(engine_tag).cloned().unwrap_or_default()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env-based tests must run serially to avoid interfering with each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Helper: clear all env vars used by the config.
    fn clear_sqllab_env() {
        let keys = [
            "COSTGATE_PROFILE",
            "SQLLAB_QUERY_COST_CHECKING_ENABLED",
            "SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT",
            "SQLLAB_QUERY_COST_THRESHOLDS",
            "TEST_SQLLAB_QUERY_COST_CHECKING_ENABLED",
            "TEST_SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT",
            "TEST_SQLLAB_QUERY_COST_THRESHOLDS",
        ];
        for k in keys {
            env::remove_var(k);
        }
    }

    #[test]
    fn defaults_when_no_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        let cfg = SqlLabConfig::from_env_profiled("");

        assert!(!cfg.cost_checking_enabled);
        assert_eq!(cfg.estimate_timeout_secs, DEFAULT_ESTIMATE_TIMEOUT_SECS);
        assert!(cfg.thresholds.is_empty());
    }

    #[test]
    fn from_env_reads_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        env::set_var("SQLLAB_QUERY_COST_CHECKING_ENABLED", "true");
        env::set_var("SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT", "30");
        env::set_var(
            "SQLLAB_QUERY_COST_THRESHOLDS",
            r#"{"trino": {"bytes_scanned": 1073741824}, "presto": {"cost_threshold": 100.0}}"#,
        );

        let cfg = SqlLabConfig::from_env_profiled("");

        assert!(cfg.cost_checking_enabled);
        assert_eq!(cfg.estimate_timeout_secs, 30);
        assert_eq!(
            cfg.policy_for("trino").bytes_scanned,
            Some(1_073_741_824)
        );
        assert_eq!(cfg.policy_for("presto").cost_threshold, Some(100.0));

        clear_sqllab_env();
    }

    #[test]
    fn enabled_with_1() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        env::set_var("SQLLAB_QUERY_COST_CHECKING_ENABLED", "1");

        let cfg = SqlLabConfig::from_env_profiled("");
        assert!(cfg.cost_checking_enabled);

        clear_sqllab_env();
    }

    #[test]
    fn profiled_env_takes_precedence() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        env::set_var("SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT", "10");
        env::set_var("TEST_SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT", "60");

        let cfg = SqlLabConfig::from_env_profiled("TEST");
        assert_eq!(cfg.estimate_timeout_secs, 60);

        clear_sqllab_env();
    }

    #[test]
    fn malformed_thresholds_json_disables_checks() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        env::set_var("SQLLAB_QUERY_COST_THRESHOLDS", "{not json");

        let cfg = SqlLabConfig::from_env_profiled("");
        assert!(cfg.thresholds.is_empty());

        clear_sqllab_env();
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_sqllab_env();

        env::set_var("SQLLAB_QUERY_COST_ESTIMATE_TIMEOUT", "not_a_number");

        let cfg = SqlLabConfig::from_env_profiled("");
        assert_eq!(cfg.estimate_timeout_secs, DEFAULT_ESTIMATE_TIMEOUT_SECS);

        clear_sqllab_env();
    }

    #[test]
    fn policy_for_unknown_engine_is_empty() {
        let cfg = SqlLabConfig::default();
        let policy = cfg.policy_for("bigquery");
        assert!(policy.is_empty());
        assert_eq!(policy.bytes_scanned, None);
        assert_eq!(policy.cost_threshold, None);
    }

    #[test]
    fn policy_is_empty_logic() {
        assert!(ThresholdPolicy::default().is_empty());
        assert!(!ThresholdPolicy {
            bytes_scanned: Some(1),
            cost_threshold: None,
        }
        .is_empty());
        assert!(!ThresholdPolicy {
            bytes_scanned: None,
            cost_threshold: Some(1.0),
        }
        .is_empty());
    }

    #[test]
    fn policy_serde_omits_missing_keys() {
        let policy = ThresholdPolicy {
            bytes_scanned: Some(1000),
            cost_threshold: None,
        };
        let json = serde_json::to_string(&policy).expect("serialize");
        assert_eq!(json, r#"{"bytes_scanned":1000}"#);

        let parsed: ThresholdPolicy = serde_json::from_str(r#"{}"#).expect("deserialize");
        assert!(parsed.is_empty());
    }
}
