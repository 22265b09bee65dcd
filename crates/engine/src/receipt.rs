//! Best-effort extraction of an expense from raw OCR text.
//!
//! [`extract`] never fails: text that yields nothing usable becomes an
//! expense of `0.0` described as [`DEFAULT_DESCRIPTION`].
//!
//! Amount lines are scanned top to bottom and every line is tried against
//! the full pattern list (labelled totals first, bare numbers last) before
//! moving on. The first strictly positive match wins, so a
//! `Subtotal: $5.00` line above `Total: $12.34` yields `5.00`.

use std::sync::LazyLock;

use regex::Regex;

use crate::ExpenseDraft;

pub const DEFAULT_DESCRIPTION: &str = "Receipt expense";

const MAX_DESCRIPTION_CHARS: usize = 50;
const MIN_DESCRIPTION_CHARS: usize = 4;
const SKIP_WORDS: [&str; 5] = ["receipt", "total", "amount", "tax", "subtotal"];

/// Amount patterns, most specific first. Group 1 is the number.
static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"total[:\s]*\$?(\d+[.,]\d{2})",
        r"amount[:\s]*\$?(\d+[.,]\d{2})",
        r"\$(\d+[.,]\d{2})",
        r"(\d+[.,]\d{2})",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Lines made only of digits and separators never describe an expense.
static NUMERIC_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\d\s$.,:\-]+$").ok());

/// What a receipt says was spent.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptDraft {
    pub description: String,
    pub amount: f64,
}

impl Default for ReceiptDraft {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            amount: 0.0,
        }
    }
}

impl From<ReceiptDraft> for ExpenseDraft {
    fn from(receipt: ReceiptDraft) -> Self {
        Self {
            description: receipt.description,
            amount: receipt.amount,
            date: None,
        }
    }
}

/// Derive a description and an amount from OCR output.
pub fn extract(raw_text: &str) -> ReceiptDraft {
    let lines: Vec<&str> = raw_text.lines().collect();
    let mut draft = ReceiptDraft::default();

    if let Some(amount) = lines.iter().find_map(|line| line_amount(line)) {
        draft.amount = amount;
    }
    if let Some(line) = lines.iter().find(|line| is_description(line)) {
        draft.description = line.trim().chars().take(MAX_DESCRIPTION_CHARS).collect();
    }

    draft
}

/// First strictly positive amount on a line, trying patterns in priority order.
fn line_amount(line: &str) -> Option<f64> {
    let line = line.trim().to_lowercase();
    AMOUNT_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(&line)?.get(1)?;
        let amount: f64 = captured.as_str().replace(',', ".").parse().ok()?;
        (amount > 0.0).then_some(amount)
    })
}

fn is_description(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
        return false;
    }
    if NUMERIC_LINE
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(trimmed))
    {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !SKIP_WORDS.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(AMOUNT_PATTERNS.len(), 4);
        assert!(NUMERIC_LINE.is_some());
    }

    #[test]
    fn empty_text_gives_defaults() {
        assert_eq!(extract(""), ReceiptDraft::default());
        assert_eq!(extract("").description, "Receipt expense");
        assert_eq!(extract("").amount, 0.0);
    }

    #[test]
    fn garbage_text_gives_defaults() {
        let draft = extract("$$$\n--\n:::\n12\n\u{0}\u{7f}");
        assert_eq!(draft, ReceiptDraft::default());
    }

    #[test]
    fn subtotal_before_total_keeps_first_match() {
        let draft = extract("Subtotal: $5.00\nTotal: $12.34");
        assert_eq!(draft.amount, 5.0);
    }

    #[test]
    fn labelled_total_wins_within_a_line() {
        assert_eq!(line_amount("1.50 x2  TOTAL: $3.00"), Some(3.0));
    }

    #[test]
    fn amount_label_is_matched() {
        assert_eq!(line_amount("Amount: 42.10"), Some(42.1));
    }

    #[test]
    fn comma_decimal_separator_is_normalized() {
        let draft = extract("Bakery Rossi\nTotale 7,80");
        assert_eq!(draft.amount, 7.8);
    }

    #[test]
    fn zero_amounts_are_skipped() {
        let draft = extract("Change: $0.00\nCard $18.25");
        assert_eq!(draft.amount, 18.25);
    }

    #[test]
    fn total_line_is_never_the_description() {
        let draft = extract("Total: $12.34");
        assert_eq!(draft.description, DEFAULT_DESCRIPTION);
        assert_eq!(draft.amount, 12.34);
    }

    #[test]
    fn description_skips_short_numeric_and_keyword_lines() {
        let text = "abc\n04 - 10:31\nRECEIPT #991\nSales tax included\nCorner Coffee Shop\nLatte 4.50";
        let draft = extract(text);
        assert_eq!(draft.description, "Corner Coffee Shop");
        assert_eq!(draft.amount, 4.5);
    }

    #[test]
    fn non_ascii_digit_lines_are_not_descriptions() {
        let draft = extract("١٢٣٤\n٠٥ - ١٠:٣١\nFarmers Market");
        assert_eq!(draft.description, "Farmers Market");
    }

    #[test]
    fn description_scan_is_independent_of_amount_line() {
        let draft = extract("  $9.99\n  Green Grocer  ");
        assert_eq!(draft.description, "Green Grocer");
        assert_eq!(draft.amount, 9.99);
    }

    #[test]
    fn description_is_truncated_to_fifty_chars() {
        let long = "é".repeat(80);
        let draft = extract(&long);
        assert_eq!(draft.description.chars().count(), 50);
    }

    #[test]
    fn receipt_draft_has_no_date() {
        let draft: ExpenseDraft = extract("Pizza Place\n$20.00").into();
        assert_eq!(draft.description, "Pizza Place");
        assert_eq!(draft.amount, 20.0);
        assert!(draft.date.is_none());
    }
}
