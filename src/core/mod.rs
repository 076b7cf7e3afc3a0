pub mod advisor;
pub mod aggregate;
pub mod engine;
pub mod etl;
pub mod insights;
pub mod pipeline;
pub mod scoring;
pub mod thresholds;

pub use crate::domain::model::{Metrics, Report, TransactionTable};
pub use crate::domain::ports::{InsightProvider, Pipeline, ReportSink, ReportStore, Storage};
pub use crate::utils::error::Result;
