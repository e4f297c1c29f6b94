//! # Amount Formatting
//!
//! Indian Rupee display helpers used by reports and the CLI.
//!
//! - [`format_inr`] - `₹` prefix, Indian digit grouping (`12,34,567`), no
//!   fractional digits
//! - [`amount_in_words`] - Indian numbering system (crore, lakh, thousand) on
//!   the integer part
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::format::{amount_in_words, format_inr};
//!
//! assert_eq!(format_inr(2_389_000.0), "₹23,89,000");
//! assert_eq!(
//!     amount_in_words(2_389_000.0),
//!     "Twenty Three Lakh Eighty Nine Thousand Rupees Only"
//! );
//! ```

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven", "Twelve",
    "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Format an amount as Indian Rupees with zero fractional digits.
///
/// Rounds half away from zero. Negative amounts get a leading `-`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("₹{}", amount);
    }

    let rounded = amount.abs().round();
    let digits = format!("{:.0}", rounded);
    let grouped = group_indian(&digits);

    if amount < 0.0 && rounded > 0.0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Group a plain digit string the Indian way: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Spell an amount in words using the Indian numbering system.
///
/// The fractional part is truncated, not rounded. Non-finite amounts are
/// spelled as zero.
pub fn amount_in_words(amount: f64) -> String {
    let whole = if amount.is_finite() { amount.trunc() } else { 0.0 };
    // Saturating cast; amounts beyond u64 are not meaningful estimates
    let n = whole.abs() as u64;

    if n == 0 {
        return "Zero Rupees Only".to_string();
    }

    let words = indian_words(n);
    if whole < 0.0 {
        format!("Minus {} Rupees Only", words)
    } else {
        format!("{} Rupees Only", words)
    }
}

/// Words for a positive integer in the Indian system.
///
/// Crore counts of a thousand or more are spelled recursively
/// ("One Thousand Crore").
fn indian_words(n: u64) -> String {
    let mut parts: Vec<String> = Vec::new();

    let crore = n / CRORE;
    let lakh = (n % CRORE) / LAKH;
    let thousand = (n % LAKH) / THOUSAND;
    let remainder = n % THOUSAND;

    if crore > 0 {
        parts.push(format!("{} Crore", indian_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_thousand(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_thousand(thousand)));
    }
    if remainder > 0 {
        parts.push(below_thousand(remainder));
    }

    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let n = n as usize;

    let mut words: Vec<&str> = Vec::new();
    let hundreds = n / 100;
    let rest = n % 100;

    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("Hundred");
    }
    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1000.0), "₹1,000");
        assert_eq!(format_inr(65_000.0), "₹65,000");
        assert_eq!(format_inr(100_000.0), "₹1,00,000");
        assert_eq!(format_inr(1_850_000.0), "₹18,50,000");
        assert_eq!(format_inr(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn test_format_inr_rounding() {
        assert_eq!(format_inr(1499.5), "₹1,500");
        assert_eq!(format_inr(1499.49), "₹1,499");
        assert_eq!(format_inr(-0.4), "₹0");
    }

    #[test]
    fn test_format_inr_negative() {
        assert_eq!(format_inr(-2800.0), "-₹2,800");
        assert_eq!(format_inr(-1_234_567.0), "-₹12,34,567");
    }

    #[test]
    fn test_words_zero() {
        assert_eq!(amount_in_words(0.0), "Zero Rupees Only");
        assert_eq!(amount_in_words(0.99), "Zero Rupees Only");
    }

    #[test]
    fn test_words_small_numbers() {
        assert_eq!(amount_in_words(7.0), "Seven Rupees Only");
        assert_eq!(amount_in_words(19.0), "Nineteen Rupees Only");
        assert_eq!(amount_in_words(40.0), "Forty Rupees Only");
        assert_eq!(amount_in_words(105.0), "One Hundred Five Rupees Only");
        assert_eq!(amount_in_words(999.0), "Nine Hundred Ninety Nine Rupees Only");
    }

    #[test]
    fn test_words_indian_groups() {
        assert_eq!(
            amount_in_words(2_389_000.0),
            "Twenty Three Lakh Eighty Nine Thousand Rupees Only"
        );
        assert_eq!(amount_in_words(100_000.0), "One Lakh Rupees Only");
        assert_eq!(
            amount_in_words(12_345_678.0),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Rupees Only"
        );
    }

    #[test]
    fn test_words_truncate_fraction() {
        assert_eq!(amount_in_words(1000.99), "One Thousand Rupees Only");
    }

    #[test]
    fn test_words_large_crore_count() {
        assert_eq!(amount_in_words(10_000_000_000.0), "One Thousand Crore Rupees Only");
        assert_eq!(
            amount_in_words(1_250_000_000.0),
            "One Hundred Twenty Five Crore Rupees Only"
        );
    }

    #[test]
    fn test_words_negative() {
        assert_eq!(amount_in_words(-2800.0), "Minus Two Thousand Eight Hundred Rupees Only");
    }
}
