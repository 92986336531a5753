use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine could not be set up for the requested language data.
    #[error("OCR engine failed to start for language '{lang}': {message}")]
    Init { lang: String, message: String },
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("no OCR engine available: rebuild with the `tesseract` feature")]
    NotAvailable,
}

/// An OCR engine: binarized PNG bytes in, recognized bill text out.
pub trait OcrBackend: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(png_bytes)
    }
}

/// Answers every image with the same bill text.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn recognize(&self, _png_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

/// Used when no engine was compiled in. Every image is an engine failure.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn recognize(&self, _png_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    /// libtesseract via `leptess`, one engine instance per bill.
    pub struct TesseractRecognizer {
        tessdata: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(tessdata: Option<String>, lang: &str) -> Self {
            Self { tessdata, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn name(&self) -> &'static str {
            "tesseract"
        }

        fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError> {
            let mut engine =
                LepTess::new(self.tessdata.as_deref(), &self.lang).map_err(|e| OcrError::Init {
                    lang: self.lang.clone(),
                    message: e.to_string(),
                })?;
            engine
                .set_image_from_mem(png_bytes)
                .map_err(|e| OcrError::Engine(format!("could not load binarized image: {e}")))?;
            engine.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
