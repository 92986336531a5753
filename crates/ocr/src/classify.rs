use std::sync::OnceLock;

use billscan_core::{AmountLabel, ClassifiedAmount};
use regex::Regex;

use crate::normalize::normalize_number;

/// Known OCR misreadings of the keywords, applied in order to the lowercase
/// search copy only.
const KEYWORD_CORRECTIONS: [(&str, &str); 3] =
    [("t0tal", "total"), ("pald", "paid"), ("tota1", "total")];

/// A label paired with its precompiled patterns.
struct LabelRule {
    label: AmountLabel,
    /// Keyword, optional `:`/space/currency/word noise, then a captured number.
    search: Regex,
    /// Same shape without the capture, case-insensitive, for the original text.
    evidence: Regex,
}

fn label_rules() -> &'static [LabelRule] {
    static RULES: OnceLock<Vec<LabelRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        AmountLabel::ALL
            .iter()
            .map(|&label| {
                let kw = regex::escape(label.keyword());
                LabelRule {
                    label,
                    search: Regex::new(&format!(r"{kw}[:\s]*(?:[A-Za-z₹$]*\s*)?([0-9lO,.]+)"))
                        .expect("invalid regex"),
                    evidence: Regex::new(&format!(r"(?i){kw}[:\s]*(?:[A-Za-z₹$]*\s*)?[0-9lO,.]+"))
                        .expect("invalid regex"),
                }
            })
            .collect()
    })
}

/// Lowercase `text` and repair misread keywords.
pub fn correct_keywords(text: &str) -> String {
    let mut lower = text.to_lowercase();
    for (from, to) in KEYWORD_CORRECTIONS {
        lower = lower.replace(from, to);
    }
    lower
}

/// Find the total, paid and due amounts in `text`.
///
/// Each label takes the first number that follows its keyword. Results are
/// ordered total → paid → due regardless of where the keywords sit. Returns
/// `None` when no label matched.
pub fn classify_amounts(text: &str) -> Option<Vec<ClassifiedAmount>> {
    let corrected = correct_keywords(text);

    let amounts: Vec<ClassifiedAmount> = label_rules()
        .iter()
        .filter_map(|rule| classify_one(rule, text, &corrected))
        .collect();

    if amounts.is_empty() {
        None
    } else {
        Some(amounts)
    }
}

fn classify_one(rule: &LabelRule, original: &str, corrected: &str) -> Option<ClassifiedAmount> {
    let caps = rule.search.captures(corrected)?;
    let value = normalize_number(caps.get(1)?.as_str())?;
    // Quote the page as printed when the keyword survives in the original;
    // otherwise fall back to the corrected lowercase excerpt.
    let snippet = rule
        .evidence
        .find(original)
        .map(|m| m.as_str())
        .unwrap_or_else(|| caps.get(0).map_or("", |m| m.as_str()));
    tracing::trace!(label = %rule.label, value, snippet, "classified amount");
    Some(ClassifiedAmount::new(rule.label, value, snippet))
}
