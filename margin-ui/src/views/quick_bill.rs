use std::fmt;

use margin_core::payments::StkPushState;
use margin_core::{StkStatus, format_kes};

pub fn render(
    out: &mut impl fmt::Write,
    state: &StkPushState,
) -> fmt::Result {
    writeln!(out, "Quick Bill via M-Pesa   [STK Mock]")?;
    writeln!(out, "Simulated Daraja STK push for dukas.")?;

    match state.status {
        StkStatus::Idle => Ok(()),
        StkStatus::Pending => writeln!(out, "STK push sent to your phone. Enter PIN to complete."),
        StkStatus::Success => match &state.meta {
            Some(meta) => writeln!(
                out,
                "Payment of {} to till reference {} completed.",
                format_kes(meta.amount),
                meta.reference
            ),
            None => Ok(()),
        },
        StkStatus::Failed => writeln!(
            out,
            "{}",
            state
                .error_message()
                .unwrap_or_else(|| "STK push failed. Try again.".to_string())
        ),
    }
}
