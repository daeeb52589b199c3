//! Progressive (marginal-rate) tax over a bracket schedule.
//!
//! Each bracket taxes only the slice of income that falls inside its band.
//! For the 2026 monthly PAYE schedule:
//!
//! | Band (KES)          | Rate  |
//! |---------------------|-------|
//! | 0 – 24,000          | 10%   |
//! | 24,000 – 40,667     | 25%   |
//! | 40,667 – 57,334     | 30%   |
//! | 57,334 – 76,999     | 32.5% |
//! | above 76,999        | 35%   |
//!
//! The PAYE helpers are standalone; the margin calculation uses flat rates
//! only.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use margin_core::calculations::{calculate_paye_monthly, calculate_progressive_tax};
//! use margin_core::PAYE_BRACKETS_2026;
//!
//! assert_eq!(calculate_progressive_tax(dec!(24000), &PAYE_BRACKETS_2026), dec!(2400));
//! assert_eq!(calculate_paye_monthly(dec!(30000)), dec!(3900));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{PAYE_BRACKETS_2026, TaxBracket};

/// Ways a bracket schedule can be malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    /// Bracket ceilings must strictly increase.
    #[error("bracket {index} ceiling {upper_limit} does not exceed the previous ceiling")]
    NotAscending { index: usize, upper_limit: Decimal },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    #[error("schedule has no unbounded top bracket")]
    MissingUnboundedBracket,

    #[error("bracket {index} rate {rate} is outside 0..=1")]
    InvalidRate { index: usize, rate: Decimal },
}

/// Computes tax on `income` by walking `brackets` in ascending order.
///
/// Non-positive income yields zero. No rounding is applied. A schedule
/// without an unbounded top bracket leaves income above the last ceiling
/// untaxed; use [`validate_schedule`] to reject such schedules up front.
pub fn calculate_progressive_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut remaining = income;
    let mut tax = Decimal::ZERO;
    let mut lower_limit = Decimal::ZERO;

    for bracket in brackets {
        let Some(upper_limit) = bracket.upper_limit else {
            tax += remaining * bracket.rate;
            break;
        };

        let taxable_in_band = remaining.min(upper_limit - lower_limit);
        if taxable_in_band <= Decimal::ZERO {
            break;
        }

        tax += taxable_in_band * bracket.rate;
        remaining -= taxable_in_band;
        lower_limit = upper_limit;
    }

    tax
}

/// Monthly PAYE on a gross salary under the 2026 schedule.
pub fn calculate_paye_monthly(gross_salary: Decimal) -> Decimal {
    calculate_progressive_tax(gross_salary, &PAYE_BRACKETS_2026)
}

/// Checks that `brackets` ascend, end in exactly one unbounded bracket and
/// carry rates between 0 and 1.
pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    if brackets.is_empty() {
        return Err(ScheduleError::Empty);
    }

    let last = brackets.len() - 1;
    let mut previous: Option<Decimal> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ScheduleError::InvalidRate {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.upper_limit {
            None if index != last => return Err(ScheduleError::UnboundedNotLast(index)),
            None => {}
            Some(upper_limit) => {
                let floor = previous.unwrap_or(Decimal::ZERO);
                if upper_limit <= floor {
                    return Err(ScheduleError::NotAscending { index, upper_limit });
                }
                previous = Some(upper_limit);
            }
        }
    }

    if !brackets[last].is_unbounded() {
        return Err(ScheduleError::MissingUnboundedBracket);
    }

    Ok(())
}
