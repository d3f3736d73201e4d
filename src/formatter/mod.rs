pub mod json;

pub use json::{JsonFormatter, MetricRecordJson};
