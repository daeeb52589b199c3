//! Sources for the simulated transaction outcome draw.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniform draws in `[0, 1)`.
pub trait OutcomeSource: Send + Sync + fmt::Debug {
    fn draw(&self) -> f64;
}

/// Unseeded thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl OutcomeSource for ThreadRngSource {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Reproducible draws from a seeded generator.
#[derive(Debug)]
pub struct SeededSource(Mutex<StdRng>);

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl OutcomeSource for SeededSource {
    fn draw(&self) -> f64 {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0.0..1.0)
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub f64);

impl OutcomeSource for FixedSource {
    fn draw(&self) -> f64 {
        self.0
    }
}
