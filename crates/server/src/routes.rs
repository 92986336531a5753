use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use billscan_core::{OutcomeStatus, PipelineOutcome};
use billscan_ocr::{BillPipeline, ExtractionRequest, OcrBackend};

use crate::error::ApiError;
use crate::upload::TempUpload;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BillPipeline<Box<dyn OcrBackend>>>,
    pub upload_dir: PathBuf,
    pub default_currency: String,
}

impl AppState {
    pub fn new(recognizer: Box<dyn OcrBackend>, upload_dir: PathBuf, default_currency: String) -> Self {
        Self {
            pipeline: Arc::new(BillPipeline::new(recognizer)),
            upload_dir,
            default_currency,
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract-amounts", post(extract_amounts))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: OutcomeStatus,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: OutcomeStatus::Ok })
}

struct UploadedFile {
    name: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct ExtractForm {
    text: Option<String>,
    currency: Option<String>,
    file: Option<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<ExtractForm, ApiError> {
    let mut form = ExtractForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => form.text = Some(field.text().await?),
            Some("currency") => form.currency = Some(field.text().await?),
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?.to_vec();
                form.file = Some(UploadedFile { name: file_name, data });
            }
            // Unknown fields are ignored.
            _ => {}
        }
    }
    Ok(form)
}

/// `POST /extract-amounts` with multipart fields `text`, `file` and `currency`.
async fn extract_amounts(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PipelineOutcome>, ApiError> {
    let form = read_form(multipart?).await?;

    let text = form.text.filter(|t| !t.is_empty());
    if text.is_none() && form.file.is_none() {
        return Err(ApiError::BadRequest(
            "Either text or image file is required".to_string(),
        ));
    }

    let upload = match &form.file {
        Some(file) => Some(TempUpload::write(&state.upload_dir, file.name.as_deref(), &file.data).await?),
        None => None,
    };

    let request = ExtractionRequest {
        text,
        image_path: upload.as_ref().map(|u| u.path().to_path_buf()),
        currency: form
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| state.default_currency.clone()),
    };

    // OCR blocks; keep it off the async workers. The upload moves into the
    // task so it is removed when the run ends, even if this request is dropped.
    let pipeline = Arc::clone(&state.pipeline);
    let outcome = tokio::task::spawn_blocking(move || {
        let result = pipeline.extract(&request);
        drop(upload);
        result
    })
    .await??;
    tracing::info!(status = %outcome.status(), "extraction finished");
    Ok(Json(outcome))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
