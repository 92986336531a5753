pub mod acquire;
pub mod classify;
pub mod normalize;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
mod regex_cache;

pub use acquire::acquire_text;
pub use classify::{classify_amounts, correct_keywords};
pub use normalize::{extract_numeric_tokens, normalize_number, scan_tokens, TokenScan};
pub use pipeline::{extract_from_text, BillPipeline, ExtractionRequest, PipelineError};
pub use preprocess::{binarize, prepare_for_ocr_from_bytes, PreprocessError, BINARIZE_THRESHOLD};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
