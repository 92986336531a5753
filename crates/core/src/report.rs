use serde::{Deserialize, Serialize};

use crate::amount::ClassifiedAmount;

// Stage confidences are fixed annotations of the pipeline design, not scores
// computed from the document.
pub const OCR_CONFIDENCE: f64 = 0.70;
pub const NORMALIZATION_CONFIDENCE: f64 = 0.82;
pub const CLASSIFICATION_CONFIDENCE: f64 = 0.80;

pub const DEFAULT_CURRENCY: &str = "INR";

/// The one reason reported for every "nothing usable found" outcome.
pub const NOT_FOUND_REASON: &str = "document too noisy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok,
    NoAmountsFound,
    Error,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Ok => write!(f, "ok"),
            OutcomeStatus::NoAmountsFound => write!(f, "no_amounts_found"),
            OutcomeStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrStage {
    pub raw_tokens: Vec<String>,
    pub currency_hint: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStage {
    pub normalized_amounts: Vec<u64>,
    pub normalization_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStage {
    pub amounts: Vec<ClassifiedAmount>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalOutput {
    pub currency: String,
    pub amounts: Vec<ClassifiedAmount>,
    pub status: OutcomeStatus,
}

/// Stage-by-stage account of how the final amounts were derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedReport {
    pub step_1_ocr: OcrStage,
    pub step_2_normalization: NormalizationStage,
    pub step_3_classification: ClassificationStage,
    pub final_output: FinalOutput,
}

impl StagedReport {
    /// Assemble the report. `currency` is copied through unvalidated.
    pub fn new(
        raw_tokens: Vec<String>,
        normalized_amounts: Vec<u64>,
        amounts: Vec<ClassifiedAmount>,
        currency: &str,
    ) -> Self {
        Self {
            step_1_ocr: OcrStage {
                raw_tokens,
                currency_hint: currency.to_string(),
                confidence: OCR_CONFIDENCE,
            },
            step_2_normalization: NormalizationStage {
                normalized_amounts,
                normalization_confidence: NORMALIZATION_CONFIDENCE,
            },
            step_3_classification: ClassificationStage {
                amounts: amounts.clone(),
                confidence: CLASSIFICATION_CONFIDENCE,
            },
            final_output: FinalOutput {
                currency: currency.to_string(),
                amounts,
                status: OutcomeStatus::Ok,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFound {
    pub status: OutcomeStatus,
    pub reason: String,
}

impl Default for NotFound {
    fn default() -> Self {
        Self {
            status: OutcomeStatus::NoAmountsFound,
            reason: NOT_FOUND_REASON.to_string(),
        }
    }
}

/// Result of one extraction run.
///
/// Serializes untagged: a success is the bare staged report, a miss is
/// `{"status": "no_amounts_found", "reason": "document too noisy"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Success(StagedReport),
    NotFound(NotFound),
}

impl PipelineOutcome {
    pub fn not_found() -> Self {
        PipelineOutcome::NotFound(NotFound::default())
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            PipelineOutcome::Success(report) => report.final_output.status,
            PipelineOutcome::NotFound(nf) => nf.status,
        }
    }

    pub fn report(&self) -> Option<&StagedReport> {
        match self {
            PipelineOutcome::Success(report) => Some(report),
            PipelineOutcome::NotFound(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::AmountLabel;
    use serde_json::json;

    fn sample_report() -> StagedReport {
        StagedReport::new(
            vec!["1,200".into(), "800".into()],
            vec![1200, 800],
            vec![
                ClassifiedAmount::new(AmountLabel::TotalBill, 1200, "Total: 1,200"),
                ClassifiedAmount::new(AmountLabel::Paid, 800, "Paid: 800"),
            ],
            "USD",
        )
    }

    #[test]
    fn not_found_wire_shape() {
        let json = serde_json::to_value(PipelineOutcome::not_found()).unwrap();
        assert_eq!(json, json!({"status": "no_amounts_found", "reason": "document too noisy"}));
    }

    #[test]
    fn success_wire_shape() {
        let json = serde_json::to_value(PipelineOutcome::Success(sample_report())).unwrap();
        assert_eq!(
            json,
            json!({
                "step_1_ocr": {
                    "raw_tokens": ["1,200", "800"],
                    "currency_hint": "USD",
                    "confidence": 0.70
                },
                "step_2_normalization": {
                    "normalized_amounts": [1200, 800],
                    "normalization_confidence": 0.82
                },
                "step_3_classification": {
                    "amounts": [
                        {"type": "total_bill", "value": 1200, "source": "text: 'Total: 1,200'"},
                        {"type": "paid", "value": 800, "source": "text: 'Paid: 800'"}
                    ],
                    "confidence": 0.80
                },
                "final_output": {
                    "currency": "USD",
                    "amounts": [
                        {"type": "total_bill", "value": 1200, "source": "text: 'Total: 1,200'"},
                        {"type": "paid", "value": 800, "source": "text: 'Paid: 800'"}
                    ],
                    "status": "ok"
                }
            })
        );
    }

    #[test]
    fn outcome_deserializes_both_variants() {
        let miss: PipelineOutcome =
            serde_json::from_str(r#"{"status":"no_amounts_found","reason":"document too noisy"}"#)
                .unwrap();
        assert_eq!(miss, PipelineOutcome::not_found());

        let hit = PipelineOutcome::Success(sample_report());
        let text = serde_json::to_string(&hit).unwrap();
        let back: PipelineOutcome = serde_json::from_str(&text).unwrap();
        assert_eq!(back, hit);
    }

    #[test]
    fn status_reflects_variant() {
        assert_eq!(PipelineOutcome::not_found().status(), OutcomeStatus::NoAmountsFound);
        assert_eq!(PipelineOutcome::Success(sample_report()).status(), OutcomeStatus::Ok);
        assert!(PipelineOutcome::not_found().report().is_none());
    }

    #[test]
    fn status_display_matches_serde() {
        for status in [OutcomeStatus::Ok, OutcomeStatus::NoAmountsFound, OutcomeStatus::Error] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.to_string())
            );
        }
    }
}
