use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier for an expense within one dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an expense is backed by an eTIMS tax receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    #[default]
    #[serde(alias = "etims")]
    Receipted,
    Informal,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipted => "receipted",
            Self::Informal => "informal",
        }
    }

    /// Accepts `receipted`, `etims` or `informal`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receipted" | "etims" => Some(Self::Receipted),
            "informal" => Some(Self::Informal),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Receipted => "eTIMS Compliant",
            Self::Informal => "Informal",
        }
    }

    pub fn deductibility(&self) -> &'static str {
        match self {
            Self::Receipted => "eTIMS Compliant - deductible",
            Self::Informal => "Informal - non-deductible",
        }
    }

    pub fn is_deductible(&self) -> bool {
        matches!(self, Self::Receipted)
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub label: String,
    pub amount: Decimal,
    pub kind: ExpenseKind,
}

/// For logging new expenses (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub label: String,
    pub amount: Decimal,
    pub kind: ExpenseKind,
}

impl NewExpense {
    pub fn new(
        label: impl Into<String>,
        amount: Decimal,
        kind: ExpenseKind,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            kind,
        }
    }
}
