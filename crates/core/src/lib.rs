pub mod config;
pub mod report;

pub use config::{load_dotenv, SqlLabConfig, ThresholdPolicy};
pub use report::{CostLineItem, CostReport, BYTES_SCANNED_KEY, COST_KEY};
