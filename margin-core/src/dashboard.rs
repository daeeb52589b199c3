//! In-memory dashboard session.
//!
//! Holds the gross-sales figure and the append-only expense list, and derives
//! every aggregate on read so derived figures can never go stale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{percent_of, round_to_unit};
use crate::calculations::{
    calculate_margin, calculate_non_compliant_expense_penalty_at_default_rate,
};
use crate::models::{Expense, ExpenseId, ExpenseKind, MarginBreakdown, MarginInputs, NewExpense};

/// Number of entries shown in the home view's recent-activity list.
pub const RECENT_EXPENSE_LIMIT: usize = 3;

/// Largest expense total a session accepts, in shillings. Keeps every derived
/// margin figure inside `Decimal` range.
pub const EXPENSE_TOTAL_LIMIT: Decimal = dec!(1000000000000000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("expense label is required")]
    MissingLabel,

    #[error("expense amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("expense total would exceed {limit}")]
    TotalTooLarge { limit: Decimal },
}

/// How close the shop is to having every expense eTIMS-backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessLevel {
    Strong,
    Moderate,
    Weak,
}

impl ReadinessLevel {
    /// Bands a whole-number percentage: 80 and above is strong, 50 and above
    /// moderate.
    pub fn from_percent(percent: Decimal) -> Self {
        if percent >= dec!(80) {
            Self::Strong
        } else if percent >= dec!(50) {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    gross_sales: Decimal,
    expenses: Vec<Expense>,
    next_id: u64,
}

impl DashboardState {
    pub fn new(gross_sales: Decimal) -> Self {
        let mut state = Self::default();
        state.set_gross_sales(gross_sales);
        state
    }

    /// A day at a typical Nairobi duka: KES 65,000 in sales, one receipted
    /// stock purchase and one informal fuel purchase.
    pub fn with_sample_data() -> Self {
        let mut state = Self::new(dec!(65000));
        state.expenses = vec![
            Expense {
                id: ExpenseId::new(1),
                label: "Stock from wholesaler".to_string(),
                amount: dec!(15000),
                kind: ExpenseKind::Receipted,
            },
            Expense {
                id: ExpenseId::new(2),
                label: "Cash fuel (no receipt)".to_string(),
                amount: dec!(3500),
                kind: ExpenseKind::Informal,
            },
        ];
        state.next_id = 2;
        state
    }

    pub fn gross_sales(&self) -> Decimal {
        self.gross_sales
    }

    /// Negative figures are coerced to zero.
    pub fn set_gross_sales(
        &mut self,
        gross_sales: Decimal,
    ) {
        if gross_sales < Decimal::ZERO {
            warn!(%gross_sales, "negative gross sales coerced to zero");
            self.gross_sales = Decimal::ZERO;
        } else {
            self.gross_sales = gross_sales;
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Appends an expense after trimming its label.
    ///
    /// # Errors
    ///
    /// * [`ExpenseError::MissingLabel`] when the trimmed label is empty.
    /// * [`ExpenseError::NonPositiveAmount`] when the amount is zero or less.
    /// * [`ExpenseError::TotalTooLarge`] when the session total would pass
    ///   [`EXPENSE_TOTAL_LIMIT`].
    pub fn add_expense(
        &mut self,
        new: NewExpense,
    ) -> Result<&Expense, ExpenseError> {
        let (expense, _) = self.build_expense(new, self.input_costs())?;
        debug!(id = %expense.id, kind = %expense.kind, amount = %expense.amount, "expense logged");
        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Swaps the whole list for `entries`, e.g. after an import.
    ///
    /// Either every entry is accepted or the current list is left untouched.
    pub fn replace_expenses(
        &mut self,
        entries: Vec<NewExpense>,
    ) -> Result<usize, ExpenseError> {
        let saved_next_id = self.next_id;
        let mut replacement = Vec::with_capacity(entries.len());
        let mut total = Decimal::ZERO;

        for entry in entries {
            match self.build_expense(entry, total) {
                Ok((expense, new_total)) => {
                    total = new_total;
                    replacement.push(expense);
                }
                Err(e) => {
                    self.next_id = saved_next_id;
                    return Err(e);
                }
            }
        }

        debug!(count = replacement.len(), "expense list replaced");
        self.expenses = replacement;
        Ok(self.expenses.len())
    }

    /// Validates `new` against the list total so far and returns the
    /// expense together with the new total.
    fn build_expense(
        &mut self,
        new: NewExpense,
        total: Decimal,
    ) -> Result<(Expense, Decimal), ExpenseError> {
        let label = new.label.trim();
        if label.is_empty() {
            return Err(ExpenseError::MissingLabel);
        }
        if new.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(new.amount));
        }
        let total = total
            .checked_add(new.amount)
            .filter(|t| *t <= EXPENSE_TOTAL_LIMIT)
            .ok_or(ExpenseError::TotalTooLarge {
                limit: EXPENSE_TOTAL_LIMIT,
            })?;

        self.next_id += 1;
        let expense = Expense {
            id: ExpenseId::new(self.next_id),
            label: label.to_string(),
            amount: new.amount,
            kind: new.kind,
        };
        Ok((expense, total))
    }

    pub fn input_costs(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn non_compliant_expense_total(&self) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.kind == ExpenseKind::Informal)
            .map(|e| e.amount)
            .sum()
    }

    pub fn count_by_kind(
        &self,
        kind: ExpenseKind,
    ) -> usize {
        self.expenses.iter().filter(|e| e.kind == kind).count()
    }

    pub fn margin_inputs(&self) -> MarginInputs {
        MarginInputs {
            gross_sales: self.gross_sales,
            input_costs: self.input_costs(),
            non_compliant_expense_total: self.non_compliant_expense_total(),
        }
    }

    pub fn margin(&self) -> MarginBreakdown {
        calculate_margin(&self.margin_inputs())
    }

    /// Share of expenses (by count) that carry an eTIMS receipt, 0–100.
    /// An empty list counts as fully ready.
    pub fn etims_readiness(&self) -> Decimal {
        let total = Decimal::from(self.expenses.len());
        let compliant = Decimal::from(self.count_by_kind(ExpenseKind::Receipted));
        percent_of(compliant, total).unwrap_or(Decimal::ONE_HUNDRED)
    }

    /// Readiness rounded to a whole percentage and clamped to 0–100.
    pub fn etims_readiness_display(&self) -> Decimal {
        round_to_unit(self.etims_readiness()).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    pub fn readiness_level(&self) -> ReadinessLevel {
        ReadinessLevel::from_percent(self.etims_readiness_display())
    }

    /// Most recent expenses, newest first.
    pub fn recent_expenses(
        &self,
        limit: usize,
    ) -> impl Iterator<Item = &Expense> {
        self.expenses.iter().rev().take(limit)
    }

    /// Extra tax a prospective expense would add. Only informal, positive
    /// amounts carry a penalty.
    pub fn penalty_preview(
        amount: Decimal,
        kind: ExpenseKind,
    ) -> Decimal {
        match kind {
            ExpenseKind::Informal => calculate_non_compliant_expense_penalty_at_default_rate(amount),
            ExpenseKind::Receipted => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn informal(
        label: &str,
        amount: Decimal,
    ) -> NewExpense {
        NewExpense::new(label, amount, ExpenseKind::Informal)
    }

    fn receipted(
        label: &str,
        amount: Decimal,
    ) -> NewExpense {
        NewExpense::new(label, amount, ExpenseKind::Receipted)
    }

    #[test]
    fn sample_data_matches_sample_margin() {
        let state = DashboardState::with_sample_data();

        assert_eq!(state.gross_sales(), dec!(65000));
        assert_eq!(state.input_costs(), dec!(18500));
        assert_eq!(state.non_compliant_expense_total(), dec!(3500));
        assert_eq!(state.margin().net_profit, dec!(34075));
    }

    #[test]
    fn add_expense_trims_label_and_assigns_fresh_id() {
        let mut state = DashboardState::with_sample_data();

        let added = state.add_expense(receipted("  Rent  ", dec!(8000))).unwrap().clone();

        assert_eq!(added.label, "Rent");
        assert!(state.expenses()[..2].iter().all(|e| e.id != added.id));
        assert_eq!(state.expenses().len(), 3);
    }

    #[test]
    fn add_expense_ids_are_unique() {
        let mut state = DashboardState::new(Decimal::ZERO);
        let a = state.add_expense(receipted("a", dec!(1))).unwrap().id;
        let b = state.add_expense(receipted("b", dec!(1))).unwrap().id;

        assert_ne!(a, b);
    }

    #[test]
    fn add_expense_rejects_blank_label() {
        let mut state = DashboardState::new(Decimal::ZERO);

        assert_eq!(
            state.add_expense(receipted("   ", dec!(10))),
            Err(ExpenseError::MissingLabel)
        );
        assert!(state.expenses().is_empty());
    }

    #[test]
    fn add_expense_rejects_non_positive_amount() {
        let mut state = DashboardState::new(Decimal::ZERO);

        assert_eq!(
            state.add_expense(informal("Fuel", Decimal::ZERO)),
            Err(ExpenseError::NonPositiveAmount(Decimal::ZERO))
        );
        assert_eq!(
            state.add_expense(informal("Fuel", dec!(-1))),
            Err(ExpenseError::NonPositiveAmount(dec!(-1)))
        );
    }

    #[test]
    fn add_expense_rejects_total_past_limit() {
        let mut state = DashboardState::new(dec!(65000));
        state.add_expense(informal("Lorry", Decimal::MAX)).unwrap_err();
        state.add_expense(informal("Lorry", EXPENSE_TOTAL_LIMIT)).unwrap();

        assert_eq!(
            state.add_expense(receipted("Rent", dec!(1))),
            Err(ExpenseError::TotalTooLarge {
                limit: EXPENSE_TOTAL_LIMIT
            })
        );
        assert_eq!(state.expenses().len(), 1);
        assert_eq!(state.margin().input_costs, EXPENSE_TOTAL_LIMIT);
    }

    #[test]
    fn replace_expenses_rejects_overflowing_total() {
        let mut state = DashboardState::with_sample_data();

        let result = state.replace_expenses(vec![
            informal("Lorry", Decimal::MAX),
            informal("Trailer", Decimal::MAX),
        ]);

        assert_eq!(
            result,
            Err(ExpenseError::TotalTooLarge {
                limit: EXPENSE_TOTAL_LIMIT
            })
        );
        assert_eq!(state.input_costs(), dec!(18500));
    }

    #[test]
    fn aggregates_follow_the_list() {
        let mut state = DashboardState::new(dec!(50000));
        state.add_expense(receipted("Stock", dec!(10000))).unwrap();
        state.add_expense(informal("Fuel", dec!(2000))).unwrap();
        state.add_expense(informal("Boda", dec!(500))).unwrap();

        let inputs = state.margin_inputs();
        assert_eq!(inputs.input_costs, dec!(12500));
        assert_eq!(inputs.non_compliant_expense_total, dec!(2500));
        assert!(inputs.input_costs >= inputs.non_compliant_expense_total);
        assert_eq!(state.margin().tax_penalty, dec!(750));
    }

    #[test]
    fn gross_sales_change_is_reflected_in_margin() {
        let mut state = DashboardState::with_sample_data();
        state.set_gross_sales(dec!(100000));

        assert_eq!(state.margin().vat, dec!(16000));
    }

    #[test]
    fn negative_gross_sales_is_coerced_to_zero() {
        let mut state = DashboardState::with_sample_data();
        state.set_gross_sales(dec!(-10));

        assert_eq!(state.gross_sales(), Decimal::ZERO);
    }

    #[test]
    fn replace_expenses_swaps_whole_list() {
        let mut state = DashboardState::with_sample_data();

        let count = state
            .replace_expenses(vec![receipted("Rent", dec!(8000))])
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(state.expenses()[0].label, "Rent");
        assert_eq!(state.non_compliant_expense_total(), Decimal::ZERO);
    }

    #[test]
    fn replace_expenses_is_all_or_nothing() {
        let mut state = DashboardState::with_sample_data();

        let result = state.replace_expenses(vec![
            receipted("Rent", dec!(8000)),
            informal("", dec!(100)),
        ]);

        assert_eq!(result, Err(ExpenseError::MissingLabel));
        assert_eq!(state.expenses().len(), 2);
        assert_eq!(state.expenses()[0].label, "Stock from wholesaler");
    }

    #[test]
    fn readiness_is_full_for_empty_list() {
        let state = DashboardState::new(Decimal::ZERO);

        assert_eq!(state.etims_readiness(), Decimal::ONE_HUNDRED);
        assert_eq!(state.readiness_level(), ReadinessLevel::Strong);
    }

    #[test]
    fn readiness_counts_expenses_not_amounts() {
        let state = DashboardState::with_sample_data();

        assert_eq!(state.etims_readiness(), dec!(50));
        assert_eq!(state.readiness_level(), ReadinessLevel::Moderate);
    }

    #[test]
    fn readiness_display_rounds_to_whole_percent() {
        let mut state = DashboardState::new(Decimal::ZERO);
        state.add_expense(receipted("a", dec!(1))).unwrap();
        state.add_expense(informal("b", dec!(1))).unwrap();
        state.add_expense(informal("c", dec!(1))).unwrap();

        assert_eq!(state.etims_readiness_display(), dec!(33));
        assert_eq!(state.readiness_level(), ReadinessLevel::Weak);
    }

    #[test]
    fn readiness_bands() {
        assert_eq!(ReadinessLevel::from_percent(dec!(80)), ReadinessLevel::Strong);
        assert_eq!(ReadinessLevel::from_percent(dec!(79)), ReadinessLevel::Moderate);
        assert_eq!(ReadinessLevel::from_percent(dec!(50)), ReadinessLevel::Moderate);
        assert_eq!(ReadinessLevel::from_percent(dec!(49)), ReadinessLevel::Weak);
    }

    #[test]
    fn recent_expenses_are_newest_first_and_limited() {
        let mut state = DashboardState::with_sample_data();
        state.add_expense(receipted("Rent", dec!(8000))).unwrap();
        state.add_expense(receipted("Airtime", dec!(200))).unwrap();

        let labels: Vec<_> = state
            .recent_expenses(RECENT_EXPENSE_LIMIT)
            .map(|e| e.label.as_str())
            .collect();

        assert_eq!(labels, vec!["Airtime", "Rent", "Cash fuel (no receipt)"]);
    }

    #[test]
    fn penalty_preview_only_for_informal() {
        assert_eq!(
            DashboardState::penalty_preview(dec!(10000), ExpenseKind::Informal),
            dec!(3000)
        );
        assert_eq!(
            DashboardState::penalty_preview(dec!(10000), ExpenseKind::Receipted),
            Decimal::ZERO
        );
        assert_eq!(
            DashboardState::penalty_preview(Decimal::ZERO, ExpenseKind::Informal),
            Decimal::ZERO
        );
    }

    #[test]
    fn counts_by_kind() {
        let state = DashboardState::with_sample_data();

        assert_eq!(state.count_by_kind(ExpenseKind::Receipted), 1);
        assert_eq!(state.count_by_kind(ExpenseKind::Informal), 1);
    }
}
