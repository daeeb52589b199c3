//! Safaricom MSISDN normalisation.

use std::sync::LazyLock;

use regex::Regex;

pub const KENYA_COUNTRY_CODE: &str = "254";

/// Shortest normalised number accepted for an STK push.
pub const MIN_MSISDN_LEN: usize = 10;

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("non-digit pattern is valid"));

/// Normalises common Kenyan M-Pesa number formats to `2547XXXXXXXX`.
///
/// Everything but ASCII `0-9` is stripped first. A leading `0` is replaced
/// with the country code, a leading `7` or `1` gets the country code
/// prefixed, and anything else (including numbers already starting `254`)
/// passes through.
///
/// ```
/// use margin_core::payments::normalize_phone_number;
///
/// assert_eq!(normalize_phone_number("0712 345 678"), "254712345678");
/// assert_eq!(normalize_phone_number("+254712345678"), "254712345678");
/// ```
pub fn normalize_phone_number(raw: &str) -> String {
    let digits = NON_DIGITS.replace_all(raw, "");

    if let Some(rest) = digits.strip_prefix('0') {
        return format!("{KENYA_COUNTRY_CODE}{rest}");
    }
    if digits.starts_with('7') || digits.starts_with('1') {
        return format!("{KENYA_COUNTRY_CODE}{digits}");
    }
    digits.into_owned()
}

pub fn is_valid_msisdn(normalized: &str) -> bool {
    !normalized.is_empty() && normalized.len() >= MIN_MSISDN_LEN
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn leading_zero_is_replaced_with_country_code() {
        assert_eq!(normalize_phone_number("0712345678"), "254712345678");
    }

    #[test]
    fn leading_seven_gets_country_code() {
        assert_eq!(normalize_phone_number("712345678"), "254712345678");
    }

    #[test]
    fn leading_one_gets_country_code() {
        assert_eq!(normalize_phone_number("110345678"), "254110345678");
    }

    #[test]
    fn already_prefixed_number_is_unchanged() {
        assert_eq!(normalize_phone_number("254712345678"), "254712345678");
    }

    #[test]
    fn normalisation_is_idempotent() {
        for raw in ["0712345678", "712345678", "+254 712 345 678", "0110345678"] {
            let once = normalize_phone_number(raw);
            assert_eq!(normalize_phone_number(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(normalize_phone_number("(0712) 345-678"), "254712345678");
    }

    #[test]
    fn other_prefixes_pass_through() {
        assert_eq!(normalize_phone_number("44 20 7946 0958"), "442079460958");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_phone_number(""), "");
        assert_eq!(normalize_phone_number("abc"), "");
    }

    #[test]
    fn non_ascii_digits_are_stripped() {
        // Arabic-Indic 0712345678
        let raw = "\u{0660}\u{0667}\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}\u{0667}\u{0668}";

        let normalized = normalize_phone_number(raw);

        assert_eq!(normalized, "");
        assert!(!is_valid_msisdn(&normalized));
    }

    #[test]
    fn validity_requires_ten_digits() {
        assert!(!is_valid_msisdn(""));
        assert!(!is_valid_msisdn("25471234"));
        assert!(is_valid_msisdn("2547123456"));
        assert!(is_valid_msisdn("254712345678"));
    }

    #[test]
    fn bare_seven_prefix_normalises_to_valid_length() {
        // "07" is the form's starting value
        let normalized = normalize_phone_number("07");
        assert_eq!(normalized, "2547");
        assert!(!is_valid_msisdn(&normalized));
    }
}
