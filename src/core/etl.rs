use crate::core::Pipeline;
use crate::domain::model::Report;
use crate::utils::error::Result;
use crate::utils::monitor::PipelineMonitor;
use std::time::Instant;

/// What a run produced: where the sink put the report, and the report itself.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub location: String,
    pub report: Report,
}

/// Drives one pipeline. The monitor is created with the engine and shared by
/// every run, so the server builds it once per process.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    monitor: PipelineMonitor,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: PipelineMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &PipelineMonitor {
        &self.monitor
    }

    pub async fn run(&self, source: &[u8]) -> Result<RunOutput> {
        let monitor = &self.monitor;
        let started = Instant::now();
        tracing::info!("Starting financial analysis ({} bytes)", source.len());

        // Extract
        let table = self.pipeline.extract(source).await?;
        tracing::info!("Parsed {} transaction rows", table.len());
        monitor.log_phase("Extract", started);

        // Transform
        let report = self.pipeline.transform(table).await?;
        tracing::info!(
            report_id = %report.report_id,
            credit_score = report.metrics.credit_score,
            risk_level = %report.metrics.risk_level,
            insight_source = %report.insight_source,
            "Analysis complete"
        );
        monitor.log_phase("Transform", started);

        // Load
        let location = self.pipeline.load(&report).await?;
        tracing::info!("Report delivered to: {}", location);
        monitor.log_phase("Load", started);

        Ok(RunOutput { location, report })
    }
}
