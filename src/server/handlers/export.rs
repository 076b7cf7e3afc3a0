use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::adapters::pdf::{render_pdf, EXPORT_FILENAME};
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::AnalysisError;

pub async fn handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let report_id = path.into_inner();
    let report = state
        .store
        .get(&report_id)
        .ok_or(AnalysisError::ReportNotFound { report_id })?;

    let pdf = web::block(move || render_pdf(&report)).await??;
    tracing::debug!("Rendered PDF of {} bytes", pdf.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(pdf))
}

/// `/export` without an id has nothing to export.
pub async fn missing_id() -> Result<HttpResponse, ApiError> {
    Err(AnalysisError::ReportNotFound {
        report_id: String::new(),
    }
    .into())
}
