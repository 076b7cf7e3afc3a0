use crate::adapters::csv_reader::read_transactions;
use crate::core::advisor::detect_risks;
use crate::core::engine::compute_metrics;
use crate::core::insights::resolve_insights;
use crate::core::thresholds::Thresholds;
use crate::core::{InsightProvider, Pipeline, ReportSink};
use crate::domain::model::{ChartPoint, Report, TransactionTable};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// CSV bytes in, finished report out: parse, score, narrate, deliver.
pub struct AnalysisPipeline<I: InsightProvider, K: ReportSink> {
    insights: I,
    sink: K,
    thresholds: Thresholds,
}

impl<I: InsightProvider, K: ReportSink> AnalysisPipeline<I, K> {
    pub fn new(insights: I, sink: K, thresholds: Thresholds) -> Self {
        Self {
            insights,
            sink,
            thresholds,
        }
    }
}

#[async_trait::async_trait]
impl<I: InsightProvider, K: ReportSink> Pipeline for AnalysisPipeline<I, K> {
    async fn extract(&self, source: &[u8]) -> Result<TransactionTable> {
        tracing::debug!("Parsing {} bytes of CSV", source.len());
        let table = read_transactions(source)?;
        tracing::debug!(
            "Detected optional columns: {:?}",
            table.columns().map(|c| c.header()).collect::<Vec<_>>()
        );
        Ok(table)
    }

    async fn transform(&self, table: TransactionTable) -> Result<Report> {
        let metrics = compute_metrics(&table, &self.thresholds);
        let risks = detect_risks(&metrics, &self.thresholds.risks);

        let outcome = self.insights.generate(&metrics).await;
        let (ai_insights, insight_source) =
            resolve_insights(outcome, &metrics, &self.thresholds.narrative);

        let chart_data = table.rows().iter().map(ChartPoint::from).collect();

        Ok(Report {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            metrics,
            chart_data,
            risks,
            ai_insights,
            insight_source,
        })
    }

    async fn load(&self, report: &Report) -> Result<String> {
        self.sink.deliver(report).await
    }
}

#[async_trait::async_trait]
impl<P: Pipeline + ?Sized> Pipeline for Arc<P> {
    async fn extract(&self, source: &[u8]) -> Result<TransactionTable> {
        (**self).extract(source).await
    }

    async fn transform(&self, table: TransactionTable) -> Result<Report> {
        (**self).transform(table).await
    }

    async fn load(&self, report: &Report) -> Result<String> {
        (**self).load(report).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::advisor::RISK_STABLE;
    use crate::core::insights::{DisabledInsights, TIP_HEALTHY};
    use crate::domain::model::{FallbackReason, InsightOutcome, InsightSource, Metrics, RiskLevel};
    use crate::utils::error::AnalysisError;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    const TWO_MONTHS: &[u8] = b"date,revenue,expense\n2024-01,1000,800\n2024-02,1000,800\n";

    struct FixedInsights(InsightOutcome);

    #[async_trait]
    impl InsightProvider for FixedInsights {
        async fn generate(&self, _metrics: &Metrics) -> InsightOutcome {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReportSink for RecordingSink {
        async fn deliver(&self, report: &Report) -> Result<String> {
            self.delivered.lock().await.push(report.report_id.clone());
            Ok(format!("memory://{}", report.report_id))
        }
    }

    fn pipeline<I: InsightProvider>(insights: I) -> AnalysisPipeline<I, RecordingSink> {
        AnalysisPipeline::new(insights, RecordingSink::default(), Thresholds::default())
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_columns() {
        let pipeline = pipeline(DisabledInsights);
        let result = pipeline.extract(b"date,revenue\n2024-01,10\n").await;
        assert!(matches!(result, Err(AnalysisError::MissingColumns { .. })));
    }

    #[tokio::test]
    async fn test_transform_builds_full_report() {
        let pipeline = pipeline(DisabledInsights);
        let table = pipeline.extract(TWO_MONTHS).await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.metrics.margin, 20.0);
        assert_eq!(report.metrics.health_score, 70);
        assert_eq!(report.metrics.credit_score, 60);
        assert_eq!(report.metrics.risk_level, RiskLevel::Medium);
        assert_eq!(report.chart_data.len(), 2);
        assert_eq!(report.chart_data[0].date, "2024-01");
        assert_eq!(report.risks, vec![RISK_STABLE.to_string()]);
        assert_eq!(report.ai_insights, TIP_HEALTHY);
        assert_eq!(report.insight_source, InsightSource::RuleBased);
        assert!(Uuid::parse_str(&report.report_id).is_ok());
    }

    #[tokio::test]
    async fn test_generated_text_is_used_verbatim() {
        let pipeline = pipeline(FixedInsights(InsightOutcome::Generated(
            "Cut rent.".to_string(),
        )));
        let table = pipeline.extract(TWO_MONTHS).await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.ai_insights, "Cut rent.");
        assert_eq!(report.insight_source, InsightSource::Ai);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let pipeline = pipeline(FixedInsights(InsightOutcome::Unavailable(
            FallbackReason::Status(500),
        )));
        let table = pipeline.extract(TWO_MONTHS).await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.insight_source, InsightSource::RuleBased);
        assert!(!report.ai_insights.is_empty());
    }

    #[tokio::test]
    async fn test_reports_get_distinct_ids() {
        let pipeline = pipeline(DisabledInsights);
        let a = pipeline
            .transform(pipeline.extract(TWO_MONTHS).await.unwrap())
            .await
            .unwrap();
        let b = pipeline
            .transform(pipeline.extract(TWO_MONTHS).await.unwrap())
            .await
            .unwrap();
        assert_ne!(a.report_id, b.report_id);
    }

    #[tokio::test]
    async fn test_load_delivers_to_sink() {
        let pipeline = pipeline(DisabledInsights);
        let report = pipeline
            .transform(pipeline.extract(TWO_MONTHS).await.unwrap())
            .await
            .unwrap();

        let location = pipeline.load(&report).await.unwrap();
        assert_eq!(location, format!("memory://{}", report.report_id));
        assert_eq!(
            *pipeline.sink.delivered.lock().await,
            vec![report.report_id.clone()]
        );
    }

    #[tokio::test]
    async fn test_arc_dyn_pipeline_delegates() {
        let shared: Arc<dyn Pipeline> = Arc::new(pipeline(DisabledInsights));
        let table = shared.extract(TWO_MONTHS).await.unwrap();
        assert_eq!(table.len(), 2);
    }
}
