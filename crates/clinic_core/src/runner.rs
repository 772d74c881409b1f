//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimTime, SimulationClock};
use crate::profiling::EventMetrics;
use crate::scenario::SimulationHorizon;
use crate::systems::{
    arrivals::{patient_arrival_system, simulation_started_system},
    patient::{patient_started_system, service_completed_system, staff_granted_system},
};
use crate::telemetry::SimTelemetry;

// Condition functions for each event kind
fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_patient_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PatientArrival)
        .unwrap_or(false)
}

fn is_patient_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PatientStarted)
        .unwrap_or(false)
}

fn is_staff_granted(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::StaffGranted)
        .unwrap_or(false)
}

fn is_service_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ServiceCompleted)
        .unwrap_or(false)
}

/// Outcome of [run_to_horizon].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Events executed.
    pub steps: usize,
    /// Clock value after the run.
    pub final_time: SimTime,
    pub patients_arrived: u64,
    /// Events still pending at the horizon, dropped unexecuted.
    pub discarded: usize,
}

/// Pops the next event unless the clock is empty or the event lies at or past
/// the [SimulationHorizon] (when that resource is present).
fn pop_within_horizon(world: &mut World) -> Option<Event> {
    let stop_at = world.get_resource::<SimulationHorizon>().map(|h| h.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            return None;
        }
    }

    let event = world.get_resource_mut::<SimulationClock>()?.pop_next()?;
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }
    Some(event)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `true` if an event was processed, `false` if the clock was empty or if the next event
/// is at or past [SimulationHorizon] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    match pop_within_horizon(world) {
        Some(_) => {
            schedule.run(world);
            true
        }
        None => false,
    }
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    match pop_within_horizon(world) {
        Some(event) => {
            schedule.run(world);
            hook(world, &event);
            true
        }
        None => false,
    }
}

/// Runs simulation steps until the event queue is empty, the horizon is reached
/// or `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs to the horizon: executes every event strictly before it, drops the
/// rest and leaves the clock at the horizon.
pub fn run_to_horizon(world: &mut World, schedule: &mut Schedule) -> RunSummary {
    let mut steps = 0;
    while run_next_event(world, schedule) {
        steps += 1;
    }
    finish_run(world, steps)
}

/// Same as [run_to_horizon], invoking `hook` after every step.
pub fn run_to_horizon_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> RunSummary
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    finish_run(world, steps)
}

fn finish_run(world: &mut World, steps: usize) -> RunSummary {
    let horizon = world.get_resource::<SimulationHorizon>().map(|h| h.0);
    let (final_time, discarded) = match world.get_resource_mut::<SimulationClock>() {
        Some(mut clock) => {
            let discarded = clock.discard_pending();
            if let Some(end) = horizon {
                clock.advance_to(end);
            }
            (clock.now(), discarded)
        }
        None => (0.0, 0),
    };
    let patients_arrived = world
        .get_resource::<SimTelemetry>()
        .map(|t| t.arrivals)
        .unwrap_or(0);

    tracing::info!(steps, final_time, patients_arrived, discarded, "run reached horizon");
    RunSummary {
        steps,
        final_time,
        patients_arrived,
        discarded,
    }
}

/// Builds the default simulation schedule: all event-reacting systems plus [apply_deferred]
/// so that spawned patients are available and finished ones are gone before the next step.
///
/// Systems are conditionally executed based on event type to reduce overhead.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        simulation_started_system.run_if(is_simulation_started),
        patient_arrival_system.run_if(is_patient_arrival),
        patient_started_system.run_if(is_patient_started),
        staff_granted_system.run_if(is_staff_granted),
        service_completed_system.run_if(is_service_completed),
        apply_deferred,
    ));

    schedule
}

/// Initializes the simulation by scheduling the SimulationStarted event at time 0.
/// Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0.0, EventKind::SimulationStarted, None);
}
