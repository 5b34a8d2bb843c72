pub mod bytesize;
pub mod check_cost_threshold;
pub mod context;
pub mod estimate;
pub mod request;

pub use bytesize::ByteSizeError;
pub use check_cost_threshold::{ThresholdCheckCommand, ThresholdInfo, ThresholdVerdict};
pub use context::SqlLabContext;
pub use estimate::{EstimateCommand, EstimateError};
pub use request::EstimationRequest;
