//! Simulated M-Pesa payment requests.

pub mod outcome;
pub mod phone;
pub mod simulator;

pub use outcome::{FixedSource, OutcomeSource, SeededSource, ThreadRngSource};
pub use phone::{KENYA_COUNTRY_CODE, MIN_MSISDN_LEN, is_valid_msisdn, normalize_phone_number};
pub use simulator::{
    Clock, DEFAULT_FAILURE_RATE, DEFAULT_SIMULATED_DELAY, REFERENCE_PREFIX, SimulatorOptions,
    SimulatorOptionsError, StkPushError, StkPushSimulator, StkPushState, SystemClock,
};
