use anyhow::Context;
use tracing_subscriber::EnvFilter;

use billscan_ocr::OcrBackend;

mod config;
mod error;
mod routes;
mod upload;

use config::ServerConfig;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("billscan_server=info,billscan_ocr=info,tower_http=info")
            }),
        )
        .init();

    let config = ServerConfig::load().context("Failed to load configuration")?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir.display()))?;

    let recognizer = build_recognizer(&config);
    tracing::info!(engine = recognizer.name(), "OCR engine ready");
    let state = AppState::new(
        recognizer,
        config.upload_dir.clone(),
        config.default_currency.clone(),
    );
    let app = routes::router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_recognizer(config: &ServerConfig) -> Box<dyn OcrBackend> {
    use billscan_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    tracing::info!(lang = %config.ocr_lang, "Using Tesseract OCR");
    Box::new(TesseractRecognizer::new(config.tessdata_path.clone(), &config.ocr_lang))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_config: &ServerConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("Built without the `tesseract` feature; image uploads will fail");
    Box::new(billscan_ocr::UnavailableRecognizer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
