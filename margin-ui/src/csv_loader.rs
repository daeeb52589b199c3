//! CSV loader for a session's expense list.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column   | Required | Type    | Notes                                          |
//! |----------|----------|---------|------------------------------------------------|
//! | `label`  | yes      | string  | What was bought                                |
//! | `amount` | yes      | decimal | KES, e.g. `15000` or `3500.50`                 |
//! | `kind`   | no       | string  | `receipted` (alias `etims`) or `informal`; empty means `receipted` |
//!
//! ### Example
//!
//! ```csv
//! label,amount,kind
//! Stock from wholesaler,15000,receipted
//! Cash fuel (no receipt),3500,informal
//! ```
//!
//! Rows are only parsed here. Label and amount rules are applied when the
//! rows are handed to the dashboard.
//!
//! A single expense typed on the command line uses the same column order,
//! see [`parse_entry`].

use std::path::{Path, PathBuf};

use margin_core::{ExpenseKind, NewExpense};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::parse_amount_or_zero;

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    amount: Decimal,
    #[serde(default)]
    kind: Option<String>,
}

/// Errors that can occur while loading expense CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural problems: missing column, bad number, wrong field count.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised expense kind '{kind}' on row {row}")]
    InvalidKind { kind: String, row: usize },

    #[error("expected 'label,amount[,kind]', got '{0}'")]
    MalformedEntry(String),
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<NewExpense, CsvLoadError> {
    let kind = match row.kind.as_deref().map(str::trim) {
        None | Some("") => ExpenseKind::default(),
        Some(raw) => ExpenseKind::parse(raw).ok_or_else(|| CsvLoadError::InvalidKind {
            kind: raw.to_string(),
            row: row_number,
        })?,
    };

    Ok(NewExpense::new(row.label, row.amount, kind))
}

/// Parses CSV text into expenses, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [`CsvLoadError::InvalidKind`] if a `kind` cell is not recognised.
pub fn load_from_str(input: &str) -> Result<Vec<NewExpense>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Parses one `label,amount[,kind]` entry.
///
/// The label ends at the first comma, so it cannot contain one. The amount
/// may carry thousands separators (`3,500`); an unreadable amount becomes 0
/// and is rejected when the entry reaches the dashboard.
///
/// # Errors
///
/// [`CsvLoadError::MalformedEntry`] when there is no amount or the trailing
/// field is a word that is not an expense kind.
pub fn parse_entry(raw: &str) -> Result<NewExpense, CsvLoadError> {
    let malformed = || CsvLoadError::MalformedEntry(raw.to_string());
    let (label, rest) = raw.split_once(',').ok_or_else(malformed)?;

    let (amount, kind) = match rest.rsplit_once(',') {
        Some((amount, tail)) if tail.trim().chars().any(char::is_alphabetic) => {
            (amount, ExpenseKind::parse(tail).ok_or_else(malformed)?)
        }
        _ => (rest, ExpenseKind::default()),
    };

    Ok(NewExpense::new(label.trim(), parse_amount_or_zero(amount), kind))
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<NewExpense>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}
