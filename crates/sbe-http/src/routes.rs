//! Route handlers for upload, update and download.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sbe_core::record::present;
use sbe_core::{RecipeDocument, SubstrateRecord};
use sbe_vault::{has_allowed_extension, FileName, VaultError};

use crate::error::ApiError;
use crate::AppState;

/// Name of the multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub substrate1: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub file_name: String,
    #[serde(default, deserialize_with = "present")]
    pub thickness: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub material: Option<Value>,
}

/// Run filesystem work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// `POST /upload` — store the file, then return its substrate record.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (raw_name, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
            .ok_or(ApiError::NoFilePart)?;
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        break (raw_name, bytes);
    };

    if raw_name.is_empty() {
        return Err(ApiError::NoSelectedFile);
    }
    let name = FileName::parse(&raw_name)?;
    if !has_allowed_extension(&name, &state.config.allowed_extensions) {
        return Err(ApiError::FileTypeNotAllowed(raw_name));
    }

    let vault = state.vault.clone();
    let substrate1 = blocking(move || {
        vault.store(&name, &bytes).map_err(ApiError::Store)?;
        let text = vault.read_to_string(&name)?;
        let document = RecipeDocument::parse(&text).map_err(ApiError::from_document)?;
        let record = document.substrate().map_err(ApiError::from_document)?.clone();
        tracing::info!(file = %name, bytes = bytes.len(), "upload extracted");
        Ok(record)
    })
    .await?;

    Ok(Json(UploadResponse { substrate1 }))
}

/// `POST /update-substrate1` — overwrite the record in a stored file.
pub async fn update_substrate(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let name = FileName::parse(&request.file_name)?;
    let record = SubstrateRecord {
        thickness: request.thickness,
        material: request.material,
    };

    let vault = state.vault.clone();
    blocking(move || {
        let text = vault.read_to_string(&name)?;
        let mut document = RecipeDocument::parse(&text).map_err(ApiError::from_document)?;
        document
            .set_substrate(&record)
            .map_err(ApiError::from_update)?;
        let rendered = document
            .to_pretty_string()
            .map_err(ApiError::from_document)?;
        vault.write(&name, &rendered).map_err(ApiError::Write)?;
        tracing::info!(file = %name, ?record, "substrate1 updated");
        Ok(())
    })
    .await?;

    Ok("Substrate1 updated successfully.")
}

/// `GET /download-updated-json/{file_name}` — current bytes as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(raw_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let name = FileName::parse(&raw_name)?;
    let disposition = content_disposition(&name);
    let content_type = content_type(&name);

    let vault = state.vault.clone();
    let bytes = blocking(move || match vault.read_bytes(&name) {
        Ok(bytes) => Ok(bytes),
        Err(VaultError::NotFound(missing)) => Err(ApiError::FileNotFound(missing)),
        Err(other) => Err(ApiError::Read(other)),
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

fn content_type(name: &FileName) -> HeaderValue {
    let json = has_allowed_extension(name, &["json".to_string()]);
    HeaderValue::from_static(if json {
        "application/json"
    } else {
        "application/octet-stream"
    })
}

/// `attachment; filename="..."`, falling back to the RFC 5987 form for
/// names that are not plain printable ASCII.
fn content_disposition(name: &FileName) -> HeaderValue {
    let raw = name.as_str();
    let plain = raw
        .bytes()
        .all(|b| (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\');
    let value = if plain {
        format!("attachment; filename=\"{raw}\"")
    } else {
        format!("attachment; filename*=UTF-8''{}", urlencoding::encode(raw))
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
