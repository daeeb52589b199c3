//! Tax and margin calculations.
//!
//! Everything here is pure: no I/O, no rounding beyond what each function
//! documents.

pub mod common;
pub mod margin;
pub mod progressive;

pub use margin::{
    calculate_margin, calculate_margin_with_rates, calculate_non_compliant_expense_penalty,
    calculate_non_compliant_expense_penalty_at_default_rate,
};
pub use progressive::{
    ScheduleError, calculate_paye_monthly, calculate_progressive_tax, validate_schedule,
};
