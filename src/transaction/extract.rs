//! Pulls the amount and merchant out of the text of a transaction alert.

use std::sync::OnceLock;

use regex::Regex;

use crate::transaction::Transaction;

/// The merchant used when the text does not name one.
pub const UNKNOWN_MERCHANT: &str = "Unknown";

// Alerts look like "You spent Rs. 450 at Zomato" or "INR 1200 debited ... to Uber".
const AMOUNT_PATTERN: &str = r"(Rs\.?|INR)\s?(\d+)";
const MERCHANT_PATTERN: &str = r"at\s([A-Za-z]+)|to\s([A-Za-z]+)";

fn amount_regex() -> &'static Regex {
    static AMOUNT_REGEX: OnceLock<Regex> = OnceLock::new();
    AMOUNT_REGEX.get_or_init(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern is valid"))
}

fn merchant_regex() -> &'static Regex {
    static MERCHANT_REGEX: OnceLock<Regex> = OnceLock::new();
    MERCHANT_REGEX.get_or_init(|| Regex::new(MERCHANT_PATTERN).expect("merchant pattern is valid"))
}

/// Extract a transaction from the decoded text of an email.
///
/// The amount is the first number following "Rs", "Rs." or "INR". The merchant
/// is the first word following "at " or "to ", or [UNKNOWN_MERCHANT] if there
/// is none.
///
/// Returns `None` if the text contains no amount, in which case the email is
/// not a transaction alert.
pub fn extract_transaction(text: &str) -> Option<Transaction> {
    let captures = amount_regex().captures(text)?;
    let digits = captures.get(2)?.as_str();

    let amount = match parse_amount(digits) {
        Ok(amount) => amount,
        Err(AmountError::UnknownDigit(digit)) => {
            tracing::warn!("Skipping amount '{digits}' with unsupported digit {digit:?}");
            return None;
        }
        Err(AmountError::Overflow) => {
            tracing::warn!("Skipping amount '{digits}' that is too large to represent");
            return None;
        }
    };

    let merchant = extract_merchant(text).unwrap_or(UNKNOWN_MERCHANT);

    Some(Transaction::new(amount, merchant))
}

fn extract_merchant(text: &str) -> Option<&str> {
    let captures = merchant_regex().captures(text)?;

    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|merchant| merchant.as_str())
}

/// The first code point of each run of ten decimal digits (Unicode general
/// category Nd) in Unicode 15, in ascending order.
const DECIMAL_DIGIT_ZEROS: [u32; 68] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

#[derive(Debug, PartialEq, Eq)]
enum AmountError {
    UnknownDigit(char),
    Overflow,
}

/// Get the value of a decimal digit from any script, e.g. '4', '४' or '４'.
fn decimal_digit_value(digit: char) -> Option<u32> {
    let code_point = u32::from(digit);
    let run = DECIMAL_DIGIT_ZEROS.partition_point(|&zero| zero <= code_point);
    let zero = DECIMAL_DIGIT_ZEROS[run.checked_sub(1)?];
    let value = code_point - zero;

    (value < 10).then_some(value)
}

/// Parse a run of decimal digits, which need not be ASCII.
fn parse_amount(digits: &str) -> Result<u64, AmountError> {
    digits.chars().try_fold(0u64, |amount, digit| {
        let value = decimal_digit_value(digit).ok_or(AmountError::UnknownDigit(digit))?;

        amount
            .checked_mul(10)
            .and_then(|amount| amount.checked_add(u64::from(value)))
            .ok_or(AmountError::Overflow)
    })
}
