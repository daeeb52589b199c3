mod expense;
mod margin;
mod payment;
mod profile;
mod tax_bracket;
mod tax_rates;
mod theme;

pub use expense::{Expense, ExpenseId, ExpenseKind, NewExpense};
pub use margin::{MarginBreakdown, MarginInputs};
pub use payment::{StkMeta, StkPushRequest, StkStatus};
pub use profile::{
    AccountError, BusinessProfile, MIN_ACCOUNT_PHONE_LEN, ProfileDraft, Sector, UserAccount,
    VatStatus,
};
pub use tax_bracket::{PAYE_BRACKETS_2026, TaxBracket};
pub use tax_rates::{
    KENYA_CORPORATE_TAX_RATE_2026, KENYA_DIGITAL_SERVICE_TAX_RATE_2026, KENYA_VAT_RATE_2026,
    MarginRates,
};
pub use theme::{Appearance, ThemeMode};
