pub mod amount;
pub mod report;

pub use amount::{AmountLabel, ClassifiedAmount, UnknownLabel};
pub use report::{
    ClassificationStage, FinalOutput, NormalizationStage, NotFound, OcrStage, OutcomeStatus,
    PipelineOutcome, StagedReport, CLASSIFICATION_CONFIDENCE, DEFAULT_CURRENCY,
    NORMALIZATION_CONFIDENCE, NOT_FOUND_REASON, OCR_CONFIDENCE,
};
