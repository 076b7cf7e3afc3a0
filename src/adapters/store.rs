use crate::config::toml_config::StoreConfig;
use crate::domain::model::{Report, ReportId};
use crate::domain::ports::ReportStore;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct StoredReport {
    report: Arc<Report>,
    inserted_at: Instant,
}

/// Process-local report store keyed by report id.
///
/// Entries expire `ttl` after insertion (checked on read and swept on every
/// insert). When `capacity` is reached the oldest entry is evicted first.
pub struct InMemoryReportStore {
    entries: DashMap<ReportId, StoredReport>,
    ttl: Option<Duration>,
    capacity: usize,
}

impl InMemoryReportStore {
    pub fn new(ttl: Option<Duration>, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// `ttl_seconds = 0` disables expiry.
    pub fn from_config(config: &StoreConfig) -> Self {
        let ttl = (config.ttl_seconds > 0).then(|| Duration::from_secs(config.ttl_seconds));
        Self::new(ttl, config.max_reports)
    }

    fn is_expired(&self, entry: &StoredReport) -> bool {
        self.ttl
            .map(|ttl| entry.inserted_at.elapsed() >= ttl)
            .unwrap_or(false)
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(id) = oldest {
            tracing::debug!("Report store full, evicting {}", id);
            self.entries.remove(&id);
        }
    }
}

impl ReportStore for InMemoryReportStore {
    fn insert(&self, report: Report) -> ReportId {
        self.purge_expired();
        while self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let id = report.report_id.clone();
        self.entries.insert(
            id.clone(),
            StoredReport {
                report: Arc::new(report),
                inserted_at: Instant::now(),
            },
        );
        id
    }

    fn get(&self, id: &str) -> Option<Arc<Report>> {
        let (report, expired) = {
            let entry = self.entries.get(id)?;
            (entry.report.clone(), self.is_expired(&entry))
        };

        if expired {
            self.entries.remove(id);
            return None;
        }
        Some(report)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!("Purged {} expired report(s)", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Benchmark, InsightSource, Metrics, RiskLevel};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn report(id: &str) -> Report {
        Report {
            report_id: id.to_string(),
            generated_at: Utc::now(),
            metrics: Metrics {
                revenue: 0.0,
                expense: 0.0,
                profit: 0.0,
                margin: 0.0,
                health_score: 50,
                credit_score: 30,
                risk_level: RiskLevel::High,
                forecast: 0.0,
                benchmark: Benchmark::Below,
                industry: "General".to_string(),
                expense_categories: BTreeMap::new(),
                suggestions: vec!["Reduce unnecessary expenses".to_string()],
                receivable: 0.0,
                payable: 0.0,
                inventory: 0.0,
                loan_total: 0.0,
                gst_collected: 0.0,
                gst_paid: 0.0,
            },
            chart_data: vec![],
            risks: vec!["Low profitability".to_string()],
            ai_insights: "Profit margin is low. Reduce costs immediately.".to_string(),
            insight_source: InsightSource::RuleBased,
        }
    }

    #[test]
    fn test_insert_and_get_many_reports() {
        let store = InMemoryReportStore::new(None, 10);
        let a = store.insert(report("a"));
        let b = store.insert(report("b"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&a).unwrap().report_id, "a");
        assert_eq!(store.get(&b).unwrap().report_id, "b");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let store = InMemoryReportStore::new(Some(Duration::ZERO), 10);
        let id = store.insert(report("a"));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_ttl_expiry_after_wait() {
        let store = InMemoryReportStore::new(Some(Duration::from_millis(30)), 10);
        let id = store.insert(report("a"));
        assert!(store.get(&id).is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(store.purge_expired(), 1);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = InMemoryReportStore::new(None, 2);
        store.insert(report("first"));
        std::thread::sleep(Duration::from_millis(2));
        store.insert(report("second"));
        std::thread::sleep(Duration::from_millis(2));
        store.insert(report("third"));

        assert_eq!(store.len(), 2);
        assert!(store.get("first").is_none());
        assert!(store.get("second").is_some());
        assert!(store.get("third").is_some());
    }

    #[test]
    fn test_from_config_zero_ttl_never_expires() {
        let store = InMemoryReportStore::from_config(&StoreConfig {
            ttl_seconds: 0,
            max_reports: 4,
        });
        let id = store.insert(report("a"));
        assert_eq!(store.purge_expired(), 0);
        assert!(store.get(&id).is_some());
    }
}
