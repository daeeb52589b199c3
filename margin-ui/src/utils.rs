use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops thousands separators and a leading `KES`.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix("KES")
        .or_else(|| trimmed.strip_prefix("kes"))
        .unwrap_or(trimmed);
    trimmed.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Parses form input the way the dashboard fields do: anything that is not
/// a number becomes 0, leaving validation to whoever consumes the value.
pub fn parse_amount_or_zero(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(input = %s, "{e}; using 0");
        Decimal::ZERO
    })
}
