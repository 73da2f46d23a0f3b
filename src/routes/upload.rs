//! Public upload endpoint
//!
//! `POST /api/upload-public-file` takes a multipart body with a `file` part and
//! an optional `note` part, stores the file as a new blob and answers with a
//! read-only link valid for a year.

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::StorageConfig;
use crate::models::{AppState, UploadResponse};
use crate::storage::{
    generate_blob_name, sign_blob_read_url, BlobTarget, NewBlob,
    StorageCredential,
};
use crate::types::{AppError, AppResult};

pub const UPLOAD_PATH: &str = "/api/upload-public-file";

const NO_FILE_MESSAGE: &str = "No file uploaded";
const MISSING_ENV_MESSAGE: &str = "Azure storage env vars not set";

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    Router::new()
        .route(UPLOAD_PATH, post(upload_public_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// File part as received from the client
#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn upload_public_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let multipart = multipart.map_err(|e| {
        warn!("Rejected upload body: {}", e);
        AppError::Validation(NO_FILE_MESSAGE.to_string())
    })?;

    let (file, note) = read_upload_form(multipart).await.inspect_err(|e| {
        warn!("Invalid upload request: {}", e);
    })?;

    let (credential, container) = resolve_storage(&state.config.storage).inspect_err(|e| {
        error!("Storage is not configured: {}", e);
    })?;

    let blob_name = generate_blob_name(Some(&file.file_name));
    let target = BlobTarget::new(container, blob_name);
    let blob = NewBlob::new(file.data, file.content_type.as_deref(), note);
    let size = blob.data.len();

    state
        .blob_store
        .put_blob(&credential, &target, blob)
        .await
        .map_err(|e| {
            error!(blob = %target.blob_name, "Failed to store upload: {}", e);
            AppError::from(e)
        })?;

    info!(
        blob = %target.blob_name,
        container = %target.container,
        bytes = size,
        original = %file.file_name,
        "Stored public upload"
    );

    // A failure past this point leaves the stored blob without a link.
    let signed = sign_blob_read_url(&credential, &target, Utc::now()).map_err(|e| {
        error!(blob = %target.blob_name, "Blob stored but signing failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(UploadResponse::success(signed.url)))
}

/// Pull the `file` and `note` parts out of the multipart body
async fn read_upload_form(mut multipart: Multipart) -> AppResult<(UploadedFile, Option<String>)> {
    let mut file: Option<UploadedFile> = None;
    let mut note: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") if file.is_none() => {
                // a plain text field named `file` is not a file upload
                let Some(file_name) = field.file_name().map(str::to_owned) else {
                    return Err(AppError::Validation(NO_FILE_MESSAGE.to_string()));
                };
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read file: {}", e.body_text()))
                })?;

                // an untouched browser file input
                if file_name.is_empty() && data.is_empty() {
                    return Err(AppError::Validation(NO_FILE_MESSAGE.to_string()));
                }

                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("note") if note.is_none() => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read note: {}", e.body_text()))
                })?;
                note = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation(NO_FILE_MESSAGE.to_string()))?;
    let note = note.filter(|n| !n.trim().is_empty());

    Ok((file, note))
}

/// Connection credential and container from the environment-backed config
fn resolve_storage(config: &StorageConfig) -> AppResult<(StorageCredential, String)> {
    let (Some(connection_string), Some(container)) =
        (config.connection_string.as_deref(), config.container.as_deref())
    else {
        return Err(AppError::Configuration(MISSING_ENV_MESSAGE.to_string()));
    };

    let credential = StorageCredential::from_connection_string(connection_string)?;
    Ok((credential, container.to_string()))
}
