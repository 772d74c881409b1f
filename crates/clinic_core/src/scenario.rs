//! Scenario setup: validated clinic parameters and world construction.
//!
//! [`ClinicParams`] is the external configuration. [`build_scenario`] validates
//! it and inserts every resource a run needs into a `World`; nothing is inserted
//! when validation fails.

use std::path::Path;

use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};

use crate::arrivals::ArrivalGenerator;
use crate::clock::{SimTime, SimulationClock};
use crate::distributions::{NormalParams, RandomSource, SeededRandom, SimRng};
use crate::error::ConfigError;
use crate::pool::{Stage, StaffPools};
use crate::profiling::EventMetrics;
use crate::telemetry::{QueueStatistics, SimTelemetry};

pub const DEFAULT_NURSE_CAPACITY: usize = 2;
pub const DEFAULT_DOCTOR_CAPACITY: usize = 1;
pub const DEFAULT_REFERRAL_PROBABILITY: f64 = 0.90;
pub const DEFAULT_UNTIL: SimTime = 200.0;

fn default_nurse_capacity() -> usize {
    DEFAULT_NURSE_CAPACITY
}

fn default_doctor_capacity() -> usize {
    DEFAULT_DOCTOR_CAPACITY
}

fn default_arrival_interval() -> NormalParams {
    NormalParams::new(5.0, 2.0)
}

fn default_nurse_service() -> NormalParams {
    NormalParams::new(20.0, 1.0)
}

fn default_doctor_service() -> NormalParams {
    NormalParams::new(30.0, 2.0)
}

fn default_referral_probability() -> f64 {
    DEFAULT_REFERRAL_PROBABILITY
}

fn default_until() -> SimTime {
    DEFAULT_UNTIL
}

/// Parameters for building a clinic scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicParams {
    #[serde(default = "default_nurse_capacity")]
    pub nurse_capacity: usize,
    #[serde(default = "default_doctor_capacity")]
    pub doctor_capacity: usize,
    #[serde(default = "default_arrival_interval")]
    pub arrival_interval: NormalParams,
    #[serde(default = "default_nurse_service")]
    pub nurse_service: NormalParams,
    #[serde(default = "default_doctor_service")]
    pub doctor_service: NormalParams,
    /// Probability that a patient is sent on to a doctor after the nurse.
    #[serde(default = "default_referral_probability")]
    pub referral_probability: f64,
    /// Simulation horizon; events at or after this time never fire.
    #[serde(default = "default_until")]
    pub until: SimTime,
    /// Random seed for reproducibility (optional; if None, uses entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ClinicParams {
    fn default() -> Self {
        Self {
            nurse_capacity: DEFAULT_NURSE_CAPACITY,
            doctor_capacity: DEFAULT_DOCTOR_CAPACITY,
            arrival_interval: default_arrival_interval(),
            nurse_service: default_nurse_service(),
            doctor_service: default_doctor_service(),
            referral_probability: DEFAULT_REFERRAL_PROBABILITY,
            until: DEFAULT_UNTIL,
            seed: None,
        }
    }
}

impl ClinicParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_capacities(mut self, nurses: usize, doctors: usize) -> Self {
        self.nurse_capacity = nurses;
        self.doctor_capacity = doctors;
        self
    }

    pub fn with_arrival_interval(mut self, mean: f64, std_dev: f64) -> Self {
        self.arrival_interval = NormalParams::new(mean, std_dev);
        self
    }

    pub fn with_nurse_service(mut self, mean: f64, std_dev: f64) -> Self {
        self.nurse_service = NormalParams::new(mean, std_dev);
        self
    }

    pub fn with_doctor_service(mut self, mean: f64, std_dev: f64) -> Self {
        self.doctor_service = NormalParams::new(mean, std_dev);
        self
    }

    pub fn with_referral_probability(mut self, probability: f64) -> Self {
        self.referral_probability = probability;
        self
    }

    pub fn with_until(mut self, until: SimTime) -> Self {
        self.until = until;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks every parameter. Called by [`build_scenario`] before anything is inserted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nurse_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity { pool: "nurse" });
        }
        if self.doctor_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity { pool: "doctor" });
        }
        validate_duration("arrival interval", self.arrival_interval)?;
        // N(0, 0) would schedule arrivals forever at one instant.
        if self.arrival_interval.mean == 0.0 && self.arrival_interval.std_dev == 0.0 {
            return Err(ConfigError::DegenerateArrivalInterval);
        }
        validate_duration("nurse service", self.nurse_service)?;
        validate_duration("doctor service", self.doctor_service)?;
        if !(0.0..=1.0).contains(&self.referral_probability) {
            return Err(ConfigError::ReferralProbabilityOutOfRange(
                self.referral_probability,
            ));
        }
        if !self.until.is_finite() || self.until < 0.0 {
            return Err(ConfigError::InvalidHorizon(self.until));
        }
        Ok(())
    }
}

fn validate_duration(what: &'static str, params: NormalParams) -> Result<(), ConfigError> {
    if !params.mean.is_finite() || params.mean < 0.0 {
        return Err(ConfigError::NegativeMean {
            what,
            value: params.mean,
        });
    }
    validate_std_dev(what, params.std_dev)
}

fn validate_std_dev(what: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidStdDev { what, value });
    }
    Ok(())
}

/// Validated parameters the patient processes read during the run.
#[derive(Debug, Clone, Resource)]
pub struct ClinicConfig {
    pub nurse_service: NormalParams,
    pub doctor_service: NormalParams,
    pub referral_probability: f64,
}

impl ClinicConfig {
    pub fn service_for(&self, stage: Stage) -> NormalParams {
        match stage {
            Stage::Nurse => self.nurse_service,
            Stage::Doctor => self.doctor_service,
        }
    }
}

/// Simulation end time. The runner stops before the first event at or after it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationHorizon(pub SimTime);

/// Builds the clinic scenario with the default seeded random source.
pub fn build_scenario(world: &mut World, params: ClinicParams) -> Result<(), ConfigError> {
    let source: Box<dyn RandomSource> = match params.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(SeededRandom::from_entropy()),
    };
    build_scenario_with_source(world, params, source)
}

/// Builds the clinic scenario with an injected random source.
pub fn build_scenario_with_source(
    world: &mut World,
    params: ClinicParams,
    source: Box<dyn RandomSource>,
) -> Result<(), ConfigError> {
    params.validate()?;
    let pools = StaffPools::new(params.nurse_capacity, params.doctor_capacity)?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(pools);
    world.insert_resource(ClinicConfig {
        nurse_service: params.nurse_service,
        doctor_service: params.doctor_service,
        referral_probability: params.referral_probability,
    });
    world.insert_resource(ArrivalGenerator::new(params.arrival_interval));
    world.insert_resource(SimulationHorizon(params.until));
    world.insert_resource(SimRng(source));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(QueueStatistics::default());
    world.insert_resource(EventMetrics::default());

    tracing::debug!(
        nurses = params.nurse_capacity,
        doctors = params.doctor_capacity,
        until = params.until,
        seed = ?params.seed,
        "clinic scenario built"
    );
    Ok(())
}
