use std::path::PathBuf;
use thiserror::Error;

use billscan_core::{PipelineOutcome, StagedReport, DEFAULT_CURRENCY};

use crate::acquire::acquire_text;
use crate::classify::classify_amounts;
use crate::normalize::scan_tokens;
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Input for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub text: Option<String>,
    pub image_path: Option<PathBuf>,
    /// Copied into the report as-is.
    pub currency: String,
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self {
            text: None,
            image_path: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ExtractionRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }

    pub fn from_image(path: impl Into<PathBuf>) -> Self {
        Self { image_path: Some(path.into()), ..Self::default() }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Orchestrates: acquire text → scan tokens → classify → assemble report.
///
/// Every stage that comes up empty ends the run with the same not-found
/// outcome. Only load and engine failures are errors.
pub struct BillPipeline<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> BillPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Run the full pipeline. Blocks for the duration of any OCR call.
    pub fn extract(&self, request: &ExtractionRequest) -> Result<PipelineOutcome, PipelineError> {
        let text = acquire_text(
            request.text.as_deref(),
            request.image_path.as_deref(),
            &self.recognizer,
        )?;
        match text {
            Some(text) => Ok(extract_from_text(&text, &request.currency)),
            None => {
                tracing::debug!("no text acquired");
                Ok(PipelineOutcome::not_found())
            }
        }
    }
}

/// Run the token and classification stages over already-acquired text.
pub fn extract_from_text(text: &str, currency: &str) -> PipelineOutcome {
    let scan = scan_tokens(text);
    if scan.is_empty() {
        tracing::debug!("no numeric tokens");
        return PipelineOutcome::not_found();
    }
    tracing::debug!(
        raw = scan.raw_tokens.len(),
        normalized = scan.normalized_amounts.len(),
        "tokens scanned"
    );

    let Some(amounts) = classify_amounts(text) else {
        tracing::debug!("no labelled amounts");
        return PipelineOutcome::not_found();
    };
    tracing::info!(labels = amounts.len(), currency, "amounts extracted");

    PipelineOutcome::Success(StagedReport::new(
        scan.raw_tokens,
        scan.normalized_amounts,
        amounts,
        currency,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{MockRecognizer, UnavailableRecognizer};
    use billscan_core::{AmountLabel, OutcomeStatus, CLASSIFICATION_CONFIDENCE};
    use image::{GrayImage, ImageBuffer, Luma};

    fn text_pipeline() -> BillPipeline<UnavailableRecognizer> {
        BillPipeline::new(UnavailableRecognizer)
    }

    fn tiny_png(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("scan.png");
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn full_bill_produces_staged_report() {
        let outcome = text_pipeline()
            .extract(&ExtractionRequest::from_text("Total: 1,200 Paid: 800 Due: 400"))
            .unwrap();
        let report = outcome.report().expect("success");

        assert_eq!(report.step_1_ocr.raw_tokens, vec!["1,200", "800", "400"]);
        assert_eq!(report.step_1_ocr.currency_hint, "INR");
        assert_eq!(report.step_2_normalization.normalized_amounts, vec![1200, 800, 400]);
        assert_eq!(report.step_3_classification.confidence, CLASSIFICATION_CONFIDENCE);

        let out = &report.final_output;
        assert_eq!(out.status, OutcomeStatus::Ok);
        assert_eq!(out.currency, "INR");
        let values: Vec<_> = out.amounts.iter().map(|a| (a.label, a.value)).collect();
        assert_eq!(
            values,
            vec![
                (AmountLabel::TotalBill, 1200),
                (AmountLabel::Paid, 800),
                (AmountLabel::Due, 400)
            ]
        );
        let mut sources: Vec<_> = out.amounts.iter().map(|a| a.source.as_str()).collect();
        sources.dedup();
        assert_eq!(sources.len(), 3);
        assert_eq!(report.step_3_classification.amounts, out.amounts);
    }

    #[test]
    fn text_without_digits_is_not_found() {
        for text in ["hello world", "Total Paid Due", "   "] {
            let outcome = text_pipeline().extract(&ExtractionRequest::from_text(text)).unwrap();
            assert_eq!(outcome, PipelineOutcome::not_found(), "input {text:?}");
        }
    }

    #[test]
    fn lone_misread_letter_counts_as_a_digit() {
        // No 0-9 anywhere, but a standalone `l` is read as 1.
        let outcome = extract_from_text("Due: l", "INR");
        let report = outcome.report().expect("success");
        assert_eq!(report.step_1_ocr.raw_tokens, vec!["l"]);
        assert_eq!(report.step_2_normalization.normalized_amounts, vec![1]);
        assert_eq!(report.final_output.status, OutcomeStatus::Ok);
        assert_eq!(
            report.final_output.amounts,
            vec![billscan_core::ClassifiedAmount::new(AmountLabel::Due, 1, "Due: l")]
        );
    }

    #[test]
    fn numbers_without_keywords_are_not_found() {
        let outcome = text_pipeline()
            .extract(&ExtractionRequest::from_text("Grand amount: 5000"))
            .unwrap();
        assert_eq!(outcome, PipelineOutcome::not_found());
    }

    #[test]
    fn empty_request_is_not_found() {
        let outcome = text_pipeline().extract(&ExtractionRequest::default()).unwrap();
        assert_eq!(outcome.status(), OutcomeStatus::NoAmountsFound);
    }

    #[test]
    fn currency_is_passed_through_unvalidated() {
        let outcome = text_pipeline()
            .extract(&ExtractionRequest::from_text("Due 75").with_currency("not-a-code"))
            .unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.step_1_ocr.currency_hint, "not-a-code");
        assert_eq!(report.final_output.currency, "not-a-code");
    }

    #[test]
    fn percent_tokens_are_reported_but_not_normalized() {
        let outcome = extract_from_text("Discount 10% Total: 900", "INR");
        let report = outcome.report().unwrap();
        assert_eq!(report.step_1_ocr.raw_tokens, vec!["10%", "900"]);
        assert_eq!(report.step_2_normalization.normalized_amounts, vec![900]);
    }

    #[test]
    fn image_request_runs_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = BillPipeline::new(MockRecognizer::new("CITY CLINIC\nT0tal: 2,5OO\nPaid 500"));
        let outcome = pipeline
            .extract(&ExtractionRequest::from_image(tiny_png(dir.path())))
            .unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.step_1_ocr.raw_tokens, vec!["2,5OO", "500"]);
        assert_eq!(report.step_2_normalization.normalized_amounts, vec![2500, 500]);
        let values: Vec<_> = report.final_output.amounts.iter().map(|a| a.value).collect();
        // Lowercasing turns the misread `O`s into letters, ending the number at "2,5".
        assert_eq!(values, vec![25, 500]);
    }

    #[test]
    fn blank_ocr_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = BillPipeline::new(MockRecognizer::new(""));
        let outcome = pipeline
            .extract(&ExtractionRequest::from_image(tiny_png(dir.path())))
            .unwrap();
        assert_eq!(outcome, PipelineOutcome::not_found());
    }

    #[test]
    fn engine_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = text_pipeline()
            .extract(&ExtractionRequest::from_image(tiny_png(dir.path())))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(OcrError::NotAvailable)));
        assert_eq!(
            err.to_string(),
            "OCR recognition failed: no OCR engine available: rebuild with the `tesseract` feature"
        );
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bill.png");
        std::fs::write(&path, b"not really a png").unwrap();
        let pipeline = BillPipeline::new(MockRecognizer::new("Total 1"));
        let err = pipeline.extract(&ExtractionRequest::from_image(path)).unwrap_err();
        assert!(matches!(err, PipelineError::Preprocess(_)));
    }

    #[test]
    fn boxed_backend_drives_pipeline() {
        let pipeline: BillPipeline<Box<dyn OcrBackend>> =
            BillPipeline::new(Box::new(MockRecognizer::new("Due: 40")));
        let dir = tempfile::tempdir().unwrap();
        let outcome = pipeline
            .extract(&ExtractionRequest::from_image(tiny_png(dir.path())))
            .unwrap();
        assert_eq!(outcome.status(), OutcomeStatus::Ok);
    }
}
