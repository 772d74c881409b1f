//! Arrival generator state: inter-arrival distribution and the patient counter.
//!
//! The generator is driven by `PatientArrival` events (see
//! [`crate::systems::arrivals`]); this resource only holds what it needs
//! between wake-ups.

use bevy_ecs::prelude::Resource;

use crate::distributions::{sample_duration, NormalParams, RandomSource};

#[derive(Debug, Clone, Resource)]
pub struct ArrivalGenerator {
    interval: NormalParams,
    spawned_count: u64,
}

impl ArrivalGenerator {
    pub fn new(interval: NormalParams) -> Self {
        Self {
            interval,
            spawned_count: 0,
        }
    }

    /// Draws the time until the next arrival, floored at 0.
    pub fn sample_interval(&self, source: &mut dyn RandomSource) -> f64 {
        sample_duration(source, self.interval)
    }

    /// Increments the counter and returns the new patient's id (ids start at 1).
    pub fn next_patient_id(&mut self) -> u64 {
        self.spawned_count += 1;
        self.spawned_count
    }

    /// Number of patients generated so far.
    pub fn spawned_count(&self) -> u64 {
        self.spawned_count
    }
}
