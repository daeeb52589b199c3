use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a simulated STK push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StkStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

impl StkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for StkStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details recorded once a push request passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkMeta {
    /// Normalised to the `254XXXXXXXXX` form.
    pub phone_number: String,
    pub amount: Decimal,
    pub reference: String,
    pub initiated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushRequest {
    pub phone_number: String,
    pub amount: Decimal,
}

impl StkPushRequest {
    pub fn new(
        phone_number: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            amount,
        }
    }
}
