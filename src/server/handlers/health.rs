use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub reports_cached: usize,
    pub ai_insights: bool,
    pub version: String,
}

pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(HomeResponse {
        message: "Backend running successfully",
    })
}

pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    state.store.purge_expired();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        reports_cached: state.store.len(),
        ai_insights: state.insights_enabled,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
