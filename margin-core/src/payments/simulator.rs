//! Simulated M-Pesa STK push lifecycle.
//!
//! ```text
//! idle ──initiate──▶ pending ──delay──▶ success | failed
//!   ▲                                        │
//!   └──────────────────reset─────────────────┘
//! ```
//!
//! Validation failures move straight to `failed` without entering `pending`.
//! Every initiation and every reset starts a new attempt; a completion that
//! belongs to a superseded attempt is discarded, so at most one deferred
//! completion can ever touch the state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::outcome::{OutcomeSource, ThreadRngSource};
use super::phone::{is_valid_msisdn, normalize_phone_number};
use crate::ids::{epoch_millis, to_base36};
use crate::models::{StkMeta, StkPushRequest, StkStatus};

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(3200);
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;
pub const REFERENCE_PREFIX: &str = "DUKA-";

/// Why an STK push ended in `failed`. The display text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StkPushError {
    #[error("Enter a valid Safaricom number, e.g. 07xx or 2547xx.")]
    InvalidPhoneNumber,

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Transaction failed or was cancelled on phone.")]
    Declined,
}

#[derive(Debug, Error, PartialEq)]
pub enum SimulatorOptionsError {
    #[error("failure rate must be between 0 and 1, got {0}")]
    InvalidFailureRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorOptions {
    pub simulated_delay: Duration,
    /// Probability in `[0, 1]` that a pending push ends in `failed`.
    pub failure_rate: f64,
}

impl SimulatorOptions {
    pub fn validate(&self) -> Result<(), SimulatorOptionsError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(SimulatorOptionsError::InvalidFailureRate(self.failure_rate));
        }
        Ok(())
    }
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            simulated_delay: DEFAULT_SIMULATED_DELAY,
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }
}

/// Wall-clock port used for payment references and timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Observable state of the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StkPushState {
    pub status: StkStatus,
    pub meta: Option<StkMeta>,
    pub error: Option<StkPushError>,
    attempt: u64,
}

impl StkPushState {
    pub fn is_idle(&self) -> bool {
        self.status == StkStatus::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.status == StkStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == StkStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == StkStatus::Failed
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Identifier of the attempt this state belongs to.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

struct Shared {
    state: watch::Sender<StkPushState>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    last_reference_millis: Mutex<u64>,
}

impl Shared {
    /// Starts a new attempt and installs its completion task, aborting the
    /// previous one. The in-flight slot stays locked from the attempt bump
    /// until the task is stored, so the stored task always belongs to the
    /// newest attempt.
    fn begin_attempt(
        &self,
        update: impl FnOnce(&mut StkPushState),
        spawn: impl FnOnce(u64) -> Option<JoinHandle<()>>,
    ) -> u64 {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        let mut attempt = 0;
        self.state.send_modify(|state| {
            state.attempt += 1;
            attempt = state.attempt;
            update(state);
        });

        if let Some(previous) = std::mem::replace(&mut *in_flight, spawn(attempt)) {
            previous.abort();
        }
        attempt
    }

    fn abort_in_flight(&self) {
        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

/// One simulated STK push at a time.
///
/// Initiation spawns the deferred completion onto the current Tokio
/// runtime, so [`StkPushSimulator::initiate_stk_push`] must be called from
/// within one.
pub struct StkPushSimulator {
    options: SimulatorOptions,
    outcome: Arc<dyn OutcomeSource>,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
}

impl StkPushSimulator {
    /// Simulator with an unseeded RNG and the system clock.
    pub fn new(options: SimulatorOptions) -> Result<Self, SimulatorOptionsError> {
        Self::with_sources(options, Arc::new(ThreadRngSource), Arc::new(SystemClock))
    }

    pub fn with_sources(
        options: SimulatorOptions,
        outcome: Arc<dyn OutcomeSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SimulatorOptionsError> {
        options.validate()?;
        let (state, _) = watch::channel(StkPushState::default());

        Ok(Self {
            options,
            outcome,
            clock,
            shared: Arc::new(Shared {
                state,
                in_flight: Mutex::new(None),
                last_reference_millis: Mutex::new(0),
            }),
        })
    }

    pub fn options(&self) -> &SimulatorOptions {
        &self.options
    }

    pub fn snapshot(&self) -> StkPushState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<StkPushState> {
        self.shared.state.subscribe()
    }

    /// Starts a simulated push.
    ///
    /// On success the state is `pending` when this returns and the recorded
    /// metadata is handed back. Validation failures leave the state in
    /// `failed` and are also returned as the error.
    pub fn initiate_stk_push(
        &self,
        request: StkPushRequest,
    ) -> Result<StkMeta, StkPushError> {
        let phone_number = normalize_phone_number(&request.phone_number);

        if !is_valid_msisdn(&phone_number) {
            return Err(self.fail_immediately(StkPushError::InvalidPhoneNumber));
        }
        if request.amount <= Decimal::ZERO {
            return Err(self.fail_immediately(StkPushError::NonPositiveAmount));
        }

        let initiated_at = self.clock.now();
        let meta = StkMeta {
            phone_number,
            amount: request.amount,
            reference: self.next_reference(initiated_at),
            initiated_at,
        };

        let attempt = self.shared.begin_attempt(
            |state| {
                state.status = StkStatus::Pending;
                state.meta = Some(meta.clone());
                state.error = None;
            },
            |attempt| {
                Some(tokio::spawn(complete_after_delay(
                    Arc::clone(&self.shared),
                    Arc::clone(&self.outcome),
                    attempt,
                    self.options,
                )))
            },
        );

        info!(
            attempt,
            reference = %meta.reference,
            phone = %meta.phone_number,
            amount = %meta.amount,
            "STK push pending"
        );

        Ok(meta)
    }

    /// Returns to `idle`, dropping metadata, error and any in-flight attempt.
    pub fn reset(&self) {
        self.shared.begin_attempt(
            |state| {
                state.status = StkStatus::Idle;
                state.meta = None;
                state.error = None;
            },
            |_| None,
        );
        debug!("STK push state reset");
    }

    fn fail_immediately(
        &self,
        error: StkPushError,
    ) -> StkPushError {
        warn!(%error, "STK push rejected");
        self.shared.begin_attempt(
            |state| {
                state.status = StkStatus::Failed;
                state.error = Some(error.clone());
            },
            |_| None,
        );
        error
    }

    /// `DUKA-` followed by the upper-case base-36 millisecond timestamp.
    /// Timestamps are bumped when needed so references never repeat.
    fn next_reference(
        &self,
        at: DateTime<Utc>,
    ) -> String {
        let mut last = self
            .shared
            .last_reference_millis
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let millis = epoch_millis(at).max(*last + 1);
        *last = millis;
        format!("{REFERENCE_PREFIX}{}", to_base36(millis).to_uppercase())
    }
}

impl Drop for StkPushSimulator {
    fn drop(&mut self) {
        self.shared.abort_in_flight();
    }
}

async fn complete_after_delay(
    shared: Arc<Shared>,
    outcome: Arc<dyn OutcomeSource>,
    attempt: u64,
    options: SimulatorOptions,
) {
    tokio::time::sleep(options.simulated_delay).await;

    let declined = outcome.draw() < options.failure_rate;
    let applied = shared.state.send_if_modified(|state| {
        if state.attempt != attempt || state.status != StkStatus::Pending {
            return false;
        }
        if declined {
            state.status = StkStatus::Failed;
            state.error = Some(StkPushError::Declined);
        } else {
            state.status = StkStatus::Success;
        }
        true
    });

    if !applied {
        debug!(attempt, "stale STK completion ignored");
    } else if declined {
        warn!(attempt, "STK push declined");
    } else {
        info!(attempt, "STK push completed");
    }
}
