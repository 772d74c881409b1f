//! Parameter variation framework for exploring clinic staffing and demand.
//!
//! This module provides tools for defining parameter spaces and generating
//! parameter sets for parallel experimentation. Supports grid search with
//! replications and random sampling.

use clinic_core::clock::SimTime;
use clinic_core::scenario::ClinicParams;

mod combinations;
mod sampling;

/// Golden-ratio multiplier used to spread run seeds.
const SEED_MULTIPLIER: u64 = 0x9e3779b9;

/// A single parameter configuration for a simulation run.
///
/// Wraps `ClinicParams` with additional experiment metadata for tracking
/// and reproducibility.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Base clinic parameters.
    pub params: ClinicParams,
    /// Unique experiment ID for this parameter configuration.
    pub experiment_id: String,
    /// Replication index within the experiment.
    pub run_id: usize,
    /// Seed used for this run (ensures reproducibility).
    pub seed: u64,
}

impl ParameterSet {
    /// Create a new parameter set with the given parameters and metadata.
    pub fn new(params: ClinicParams, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Get the clinic params with seed applied.
    pub fn clinic_params(&self) -> ClinicParams {
        self.params.clone().with_seed(self.seed)
    }
}

/// Defines a parameter space for exploration.
///
/// Empty dimensions fall back to the base parameters.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: ClinicParams,
    nurse_capacities: Vec<usize>,
    doctor_capacities: Vec<usize>,
    referral_probabilities: Vec<f64>,
    arrival_means: Vec<f64>,
    horizons: Vec<SimTime>,
    replications: usize,
}

impl ParameterSpace {
    /// Create a new parameter space around the reference clinic.
    pub fn new() -> Self {
        Self {
            base: ClinicParams::default(),
            nurse_capacities: vec![],
            doctor_capacities: vec![],
            referral_probabilities: vec![],
            arrival_means: vec![],
            horizons: vec![],
            replications: 1,
        }
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    /// Replace the base parameters used for unspecified dimensions.
    pub fn with_base(mut self, base: ClinicParams) -> Self {
        self.base = base;
        self
    }

    /// Set nurse pool capacities to explore.
    pub fn nurse_capacity(mut self, capacities: Vec<usize>) -> Self {
        self.nurse_capacities = capacities;
        self
    }

    /// Set doctor pool capacities to explore.
    pub fn doctor_capacity(mut self, capacities: Vec<usize>) -> Self {
        self.doctor_capacities = capacities;
        self
    }

    /// Set referral probabilities to explore.
    pub fn referral_probability(mut self, probabilities: Vec<f64>) -> Self {
        self.referral_probabilities = probabilities;
        self
    }

    /// Set mean inter-arrival times to explore. The base spread is kept.
    pub fn arrival_mean(mut self, means: Vec<f64>) -> Self {
        self.arrival_means = means;
        self
    }

    /// Set simulation horizons to explore.
    pub fn until(mut self, horizons: Vec<SimTime>) -> Self {
        self.horizons = horizons;
        self
    }

    /// Number of independently seeded runs per combination (at least 1).
    pub fn replications(mut self, replications: usize) -> Self {
        self.replications = replications.max(1);
        self
    }

    /// Generate all parameter sets for grid search (Cartesian product times replications).
    pub fn generate(&self) -> Vec<ParameterSet> {
        let variations = combinations::ParameterVariations::from_space(self);
        let replications = self.replications;

        variations
            .generate_combinations()
            .enumerate()
            .flat_map(|(experiment_id, combo)| {
                let params = combo.apply(&self.base);
                (0..replications).map(move |run_id| {
                    let index = (experiment_id * replications + run_id) as u64;
                    ParameterSet::new(
                        params.clone(),
                        format!("exp_{}", experiment_id),
                        run_id,
                        run_seed(index),
                    )
                })
            })
            .collect()
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn run_seed(index: u64) -> u64 {
    index.wrapping_mul(SEED_MULTIPLIER)
}
