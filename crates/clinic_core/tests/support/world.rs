#![allow(dead_code)]

use bevy_ecs::prelude::World;
use clinic_core::ecs::{Patient, PatientState};
use clinic_core::runner::initialize_simulation;
use clinic_core::scenario::{build_scenario, build_scenario_with_source, ClinicParams};
use clinic_core::test_helpers::ScriptedRandom;

/// Helper that builds an initialized clinic world for integration tests.
#[derive(Debug, Clone)]
pub struct TestWorldBuilder {
    params: ClinicParams,
    scripted: Option<ScriptedRandom>,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self {
            params: ClinicParams::default().with_seed(42),
            scripted: None,
        }
    }
}

impl TestWorldBuilder {
    /// Create a new builder with the reference clinic and seed 42.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params = self.params.with_seed(seed);
        self
    }

    pub fn with_params(mut self, params: ClinicParams) -> Self {
        self.params = params;
        self
    }

    /// Edit the parameters in place.
    pub fn configure(mut self, f: impl FnOnce(ClinicParams) -> ClinicParams) -> Self {
        self.params = f(self.params);
        self
    }

    /// Replace the seeded source with scripted draws.
    pub fn with_scripted_source(mut self, source: ScriptedRandom) -> Self {
        self.scripted = Some(source);
        self
    }

    /// Build the ECS world and schedule the start event.
    pub fn build(self) -> World {
        let mut world = World::new();
        match self.scripted {
            Some(source) => build_scenario_with_source(&mut world, self.params, Box::new(source)),
            None => build_scenario(&mut world, self.params),
        }
        .expect("test params should be valid");
        initialize_simulation(&mut world);
        world
    }
}

/// Patients still in the world in the given state.
pub fn count_patients_in(world: &World, state: PatientState) -> usize {
    world
        .iter_entities()
        .filter_map(|entity| entity.get::<Patient>())
        .filter(|patient| patient.state == state)
        .count()
}
