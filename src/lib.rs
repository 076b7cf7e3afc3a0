pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AnthropicInsights, FileSink, InMemoryReportStore, StoreSink};
pub use config::toml_config::AppConfig;
pub use core::{engine::compute_metrics, etl::ReportEngine, pipeline::AnalysisPipeline};
pub use domain::model::{Metrics, Report, TransactionTable};
pub use utils::error::{AnalysisError, Result};
