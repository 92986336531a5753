use crate::regex_cache::re;

// Percent runs are tried first so "50%" is captured whole and can be skipped.
re!(re_numeric_token, r"\b[0-9,]+%|\b[0-9,.lO]+\b");
re!(re_non_digit, r"[^0-9]");

/// OCR commonly reads these letters where a digit was printed. Case-sensitive.
const DIGIT_MISREADS: [(&str, &str); 2] = [("l", "1"), ("O", "0")];

/// Tokens pulled from a document, before and after cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenScan {
    /// Every numeric-looking substring, in order of appearance, duplicates kept.
    pub raw_tokens: Vec<String>,
    /// Integers for the non-percent tokens that normalized cleanly.
    pub normalized_amounts: Vec<u64>,
}

impl TokenScan {
    pub fn is_empty(&self) -> bool {
        self.raw_tokens.is_empty()
    }
}

/// All numeric-looking substrings of `text`, in order.
pub fn extract_numeric_tokens(text: &str) -> Vec<String> {
    re_numeric_token()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Reduce one OCR token to an integer.
///
/// Misread letters become digits, thousands separators and a doubled decimal
/// point are collapsed, then every remaining non-digit is dropped. The decimal
/// point goes with them, so "123.45" normalizes to 12345.
pub fn normalize_number(token: &str) -> Option<u64> {
    let mut s = token.to_string();
    for (from, to) in DIGIT_MISREADS {
        s = s.replace(from, to);
    }
    let s = s.replace(',', "").replace("..", ".");
    let digits = re_non_digit().replace_all(&s, "");
    if digits.is_empty() {
        return None;
    }
    // Runs too long for u64 yield nothing rather than a wrapped value.
    digits.parse().ok()
}

/// Extract tokens from `text` and normalize every non-percent one.
pub fn scan_tokens(text: &str) -> TokenScan {
    let raw_tokens = extract_numeric_tokens(text);
    let normalized_amounts = raw_tokens
        .iter()
        .filter(|t| !t.contains('%'))
        .filter_map(|t| normalize_number(t))
        .collect();
    TokenScan { raw_tokens, normalized_amounts }
}
