use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::AnalysisError;

/// Only the first multipart field is read; it is taken to be the CSV file
/// whatever its field name.
pub async fn handler(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let csv = read_upload(&mut payload, state.max_upload_bytes).await?;
    tracing::debug!("Received upload of {} bytes", csv.len());

    let output = state.engine.run(&csv).await?;
    Ok(HttpResponse::Ok().json(&output.report))
}

async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut field = payload
        .try_next()
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if data.len() + chunk.len() > limit {
            return Err(AnalysisError::UploadTooLarge { limit }.into());
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
