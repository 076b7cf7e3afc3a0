use crate::domain::model::{InsightOutcome, Metrics, Report, ReportId, TransactionTable};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self, path: &str) -> String;
}

/// Keyed holding area for finished reports between `/analyze` and `/export`.
pub trait ReportStore: Send + Sync {
    fn insert(&self, report: Report) -> ReportId;
    fn get(&self, id: &str) -> Option<Arc<Report>>;
    fn len(&self) -> usize;
    fn purge_expired(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, metrics: &Metrics) -> InsightOutcome;
}

/// Where a finished report goes. Returns a caller-facing location (a report id
/// or a file path).
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, report: &Report) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, source: &[u8]) -> Result<TransactionTable>;
    async fn transform(&self, table: TransactionTable) -> Result<Report>;
    async fn load(&self, report: &Report) -> Result<String>;
}
