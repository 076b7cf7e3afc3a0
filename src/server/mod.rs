pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use crate::adapters::{AnthropicInsights, InMemoryReportStore, StoreSink};
use crate::config::toml_config::AppConfig;
use crate::core::etl::ReportEngine;
use crate::core::pipeline::AnalysisPipeline;
use crate::core::{Pipeline, ReportStore};
use crate::utils::error::Result;
use middleware::{create_cors, create_logger};

pub struct AppState {
    pub engine: ReportEngine<Arc<dyn Pipeline>>,
    pub store: Arc<dyn ReportStore>,
    pub max_upload_bytes: usize,
    pub insights_enabled: bool,
}

impl AppState {
    pub fn new(
        pipeline: Arc<dyn Pipeline>,
        store: Arc<dyn ReportStore>,
        max_upload_bytes: usize,
        insights_enabled: bool,
        monitor: bool,
    ) -> Self {
        Self {
            engine: ReportEngine::new_with_monitoring(pipeline, monitor),
            store,
            max_upload_bytes,
            insights_enabled,
        }
    }

    /// Wires the Anthropic provider and an in-memory store sink from configuration.
    pub fn from_config(config: &AppConfig, monitor: bool) -> Result<Self> {
        let store: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::from_config(&config.store));

        let insights = AnthropicInsights::from_config(&config.insights)?;
        let insights_enabled = insights.is_enabled();
        if insights_enabled {
            tracing::info!("AI insights enabled (model: {})", config.insights.model);
        } else {
            tracing::info!("No API key configured, using rule-based insights");
        }

        let pipeline = AnalysisPipeline::new(
            insights,
            StoreSink::new(store.clone()),
            config.thresholds.clone(),
        );

        Ok(Self::new(
            Arc::new(pipeline),
            store,
            config.server.max_upload_bytes,
            insights_enabled,
            monitor,
        ))
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::home))
        .route("/health", web::get().to(handlers::health::handler))
        .route("/analyze", web::post().to(handlers::analyze::handler))
        .route("/export", web::get().to(handlers::export::missing_id))
        .route("/export/{report_id}", web::get().to(handlers::export::handler));
}

pub async fn run(config: AppConfig, monitor: bool) -> anyhow::Result<()> {
    let state = web::Data::new(
        AppState::from_config(&config, monitor).context("failed to build application state")?,
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    tracing::info!("Starting finhealth server on {}:{}", host, port);
    tracing::info!(
        "Report store: ttl {}s, capacity {}",
        config.store.ttl_seconds,
        config.store.max_reports
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(create_logger())
            .wrap(create_cors())
            .configure(configure_routes)
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind((host.as_str(), port))
        .with_context(|| format!("failed to bind {}:{}", host, port))?
        .run()
        .await
        .context("server terminated with an error")?;

    Ok(())
}
