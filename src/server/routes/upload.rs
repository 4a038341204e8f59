//! Bulk upload endpoint
//!
//! Accepts multipart form data (`serviceId`, `aclId`, `file`, optional
//! `comment`), decodes it, and hands off to the upload pipeline. Field
//! preconditions are enforced here; everything downstream reports per-entry.

use crate::core::upload::{UploadRequest, UploadService};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use tracing::info;

/// Bulk upload handler: parse the form, run the pipeline, emit the report
pub async fn bulk_upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    info!("Bulk upload request");

    let mut service_id: Option<String> = None;
    let mut acl_id: Option<String> = None;
    let mut comment: Option<String> = None;
    let mut file: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| GatewayError::Validation(format!("Invalid multipart data: {}", e)))?;

        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field_name.as_str() {
            "file" => file = Some(read_field_bytes(&mut field).await?),
            "serviceId" => service_id = Some(read_field_text(&mut field).await?),
            "aclId" => acl_id = Some(read_field_text(&mut field).await?),
            "comment" => comment = Some(read_field_text(&mut field).await?),
            _ => {
                // Drain unknown fields so the stream keeps advancing
                while field.next().await.is_some() {}
            }
        }
    }

    let service_id = require_field(service_id, "serviceId")?;
    let acl_id = require_field(acl_id, "aclId")?;
    let file = file.ok_or_else(|| {
        GatewayError::Validation("Missing required field: file".to_string())
    })?;

    let service = UploadService::new(state.fastly.clone(), state.config.upload.clone());
    let report = service
        .process(UploadRequest {
            service_id,
            acl_id,
            comment,
            file,
        })
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

async fn read_field_bytes(field: &mut actix_multipart::Field) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk
            .map_err(|e| GatewayError::Validation(format!("Error reading upload: {}", e)))?;
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

async fn read_field_text(field: &mut actix_multipart::Field) -> Result<String> {
    let bytes = read_field_bytes(field).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn require_field(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GatewayError::Validation(format!(
            "Missing required field: {}",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_field_accepts_non_empty() {
        assert_eq!(
            require_field(Some("svc1".to_string()), "serviceId").unwrap(),
            "svc1"
        );
    }

    #[test]
    fn require_field_rejects_absent_and_empty() {
        for value in [None, Some(String::new())] {
            let err = require_field(value, "aclId").unwrap_err();
            assert!(matches!(err, GatewayError::Validation(ref msg)
                if msg == "Missing required field: aclId"));
        }
    }
}
