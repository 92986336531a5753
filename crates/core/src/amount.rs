use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Semantic role of an amount found on a bill.
///
/// Variant order is the classification precedence: a report always lists
/// `total_bill` before `paid` before `due`, whatever order the keywords
/// appear in on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountLabel {
    TotalBill,
    Paid,
    Due,
}

impl AmountLabel {
    pub const ALL: [AmountLabel; 3] = [AmountLabel::TotalBill, AmountLabel::Paid, AmountLabel::Due];

    /// Lowercase keyword that introduces this amount in bill text.
    pub fn keyword(self) -> &'static str {
        match self {
            AmountLabel::TotalBill => "total",
            AmountLabel::Paid => "paid",
            AmountLabel::Due => "due",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AmountLabel::TotalBill => "total_bill",
            AmountLabel::Paid => "paid",
            AmountLabel::Due => "due",
        }
    }
}

impl fmt::Display for AmountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown amount label: '{0}'")]
pub struct UnknownLabel(pub String);

impl std::str::FromStr for AmountLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total_bill" => Ok(AmountLabel::TotalBill),
            "paid" => Ok(AmountLabel::Paid),
            "due" => Ok(AmountLabel::Due),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// An amount tied to its label and the source excerpt it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAmount {
    #[serde(rename = "type")]
    pub label: AmountLabel,
    pub value: u64,
    /// Quoted excerpt of the original text, e.g. `text: 'Total: 1,200'`.
    pub source: String,
}

impl ClassifiedAmount {
    pub fn new(label: AmountLabel, value: u64, snippet: &str) -> Self {
        Self {
            label,
            value,
            source: format!("text: '{}'", snippet.trim()),
        }
    }
}
