//! Random draws for arrivals, service times and referrals.
//!
//! The simulation core only sees the [`RandomSource`] trait, so tests and
//! experiments can inject their own source. Durations drawn from a normal
//! distribution are clamped at zero rather than re-sampled; this puts a small
//! point mass at 0 and biases the left tail when `std_dev` is large relative to
//! `mean`.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Source of random draws used by the simulation processes.
pub trait RandomSource: Send + Sync {
    /// One draw from Normal(mean, std_dev). May be negative.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;
    /// One draw from Uniform[0, 1).
    fn uniform(&mut self) -> f64;
}

/// Mean and standard deviation of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalParams {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// Draws a duration from `params`, flooring negative draws at 0.
pub fn sample_duration(source: &mut dyn RandomSource, params: NormalParams) -> f64 {
    source.normal(params.mean, params.std_dev).max(0.0)
}

/// Default source: a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            // Parameters are validated before the run; a degenerate spread collapses to the mean.
            Err(_) => mean,
        }
    }

    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// The random source owned by a simulation world.
#[derive(Resource)]
pub struct SimRng(pub Box<dyn RandomSource>);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Box::new(SeededRandom::new(seed)))
    }

    pub fn source(&mut self) -> &mut dyn RandomSource {
        self.0.as_mut()
    }
}
