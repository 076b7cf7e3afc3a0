use crate::adapters::pdf::render_pdf;
use crate::domain::model::Report;
use crate::domain::ports::{ReportSink, ReportStore, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Keeps finished reports in a `ReportStore`; the location is the report id.
#[derive(Clone)]
pub struct StoreSink {
    store: Arc<dyn ReportStore>,
}

impl StoreSink {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReportSink for StoreSink {
    async fn deliver(&self, report: &Report) -> Result<String> {
        let id = self.store.insert(report.clone());
        tracing::debug!("Stored report {} ({} cached)", id, self.store.len());
        Ok(id)
    }
}

/// Writes `<id>.json` and `<id>.pdf` through a `Storage` backend; the location
/// is the PDF path.
pub struct FileSink<S: Storage> {
    storage: S,
}

impl<S: Storage> FileSink<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> ReportSink for FileSink<S> {
    async fn deliver(&self, report: &Report) -> Result<String> {
        let json_name = format!("{}.json", report.report_id);
        let pdf_name = format!("{}.pdf", report.report_id);

        let json = serde_json::to_vec_pretty(report)?;
        self.storage.write_file(&json_name, &json).await?;

        let pdf = render_pdf(report)?;
        tracing::debug!("Writing PDF ({} bytes) to storage", pdf.len());
        self.storage.write_file(&pdf_name, &pdf).await?;

        Ok(self.storage.location(&pdf_name))
    }
}
