//! Normalized cost-report value types.
//!
//! A cost estimate is an ordered sequence of [`CostLineItem`]s, each a mapping
//! of human-readable labels to display values. The shape of each item is
//! decided by the engine adapter's formatter; the policy engine only looks at
//! the two well-known keys below and passes everything else through unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line-item key holding a byte-size string (e.g. `"5.2 GB"`) or a plain integer.
pub const BYTES_SCANNED_KEY: &str = "Bytes Scanned";

/// Line-item key holding an opaque numeric cost scalar in adapter-defined units.
pub const COST_KEY: &str = "Cost";

// ── CostLineItem ─────────────────────────────────────────────────

/// One entry in a cost report: label → display value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostLineItem(IndexMap<String, Value>);

impl CostLineItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a label/value pair, returning the previous value if present.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate label/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<IndexMap<String, Value>> for CostLineItem {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for CostLineItem {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── CostReport ───────────────────────────────────────────────────

/// Ordered sequence of line items. Empty means "no estimate available".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostReport(Vec<CostLineItem>);

impl CostReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: CostLineItem) {
        self.0.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn items(&self) -> &[CostLineItem] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostLineItem> {
        self.0.iter()
    }
}

impl From<Vec<CostLineItem>> for CostReport {
    fn from(items: Vec<CostLineItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<CostLineItem> for CostReport {
    fn from_iter<I: IntoIterator<Item = CostLineItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Tests ────────────────────────────────────────────────────────
