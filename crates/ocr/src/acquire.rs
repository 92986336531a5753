use std::path::Path;

use crate::pipeline::PipelineError;
use crate::preprocess;
use crate::recognizer::OcrBackend;

/// Resolve the working text for one document.
///
/// Non-empty `text` wins even when an image is also supplied. Otherwise the
/// image is binarized and handed to `recognizer`. `Ok(None)` means there is
/// nothing to read, which includes an engine that recognized no text. Load and
/// engine failures are returned as errors.
pub fn acquire_text<R: OcrBackend + ?Sized>(
    text: Option<&str>,
    image: Option<&Path>,
    recognizer: &R,
) -> Result<Option<String>, PipelineError> {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return Ok(Some(text.to_string()));
    }
    let Some(path) = image else {
        return Ok(None);
    };

    let data = std::fs::read(path)?;
    let png = preprocess::prepare_for_ocr_from_bytes(&data)?;
    let recognized = recognizer.recognize(&png)?;
    tracing::debug!(
        engine = recognizer.name(),
        path = %path.display(),
        chars = recognized.len(),
        "OCR finished"
    );

    Ok(Some(recognized).filter(|t| !t.is_empty()))
}
