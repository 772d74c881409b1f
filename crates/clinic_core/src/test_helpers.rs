//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use std::collections::VecDeque;

use bevy_ecs::prelude::World;

use crate::arrivals::ArrivalGenerator;
use crate::clock::SimulationClock;
use crate::distributions::{NormalParams, RandomSource, SimRng};
use crate::pool::StaffPools;
use crate::profiling::EventMetrics;
use crate::scenario::{ClinicConfig, DEFAULT_DOCTOR_CAPACITY, DEFAULT_NURSE_CAPACITY, DEFAULT_REFERRAL_PROBABILITY};
use crate::telemetry::{QueueStatistics, SimTelemetry};

/// Random source that replays scripted draws.
///
/// Once a script runs out, normal draws return the requested mean and
/// uniform draws return 0.0.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    normals: VecDeque<f64>,
    uniforms: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normals(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.normals.extend(draws);
        self
    }

    pub fn with_uniforms(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(draws);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        self.normals.pop_front().unwrap_or(mean)
    }

    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().unwrap_or(0.0)
    }
}

/// Create a basic test world with essential resources.
///
/// Pools use the default capacities, service times are the reference clinic's
/// and the random source is an empty [`ScriptedRandom`]. For full runs use
/// [`crate::scenario::build_scenario`].
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(
        StaffPools::new(DEFAULT_NURSE_CAPACITY, DEFAULT_DOCTOR_CAPACITY)
            .expect("default capacities are positive"),
    );
    world.insert_resource(ClinicConfig {
        nurse_service: NormalParams::new(20.0, 1.0),
        doctor_service: NormalParams::new(30.0, 2.0),
        referral_probability: DEFAULT_REFERRAL_PROBABILITY,
    });
    world.insert_resource(ArrivalGenerator::new(NormalParams::new(5.0, 2.0)));
    world.insert_resource(SimRng(Box::new(ScriptedRandom::new())));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(QueueStatistics::default());
    world.insert_resource(EventMetrics::default());
    world
}
