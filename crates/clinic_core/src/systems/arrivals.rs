//! Arrival generator systems: start the generator and spawn patients.

use bevy_ecs::prelude::{Commands, Res, ResMut};

use crate::arrivals::ArrivalGenerator;
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::SimRng;
use crate::ecs::Patient;
use crate::pool::StaffPools;
use crate::telemetry::{QueueStatistics, SimNotice, SimTelemetry};

/// First step of the generator: wait one inter-arrival interval.
pub fn simulation_started_system(
    mut clock: ResMut<SimulationClock>,
    generator: Res<ArrivalGenerator>,
    mut rng: ResMut<SimRng>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    let interval = generator.sample_interval(rng.source());
    clock.schedule_in(interval, EventKind::PatientArrival, None);
}

/// One generator wake-up: count the patient, sample both queues, start the
/// patient's process and wait for the next arrival.
#[allow(clippy::too_many_arguments)]
pub fn patient_arrival_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut generator: ResMut<ArrivalGenerator>,
    pools: Res<StaffPools>,
    mut stats: ResMut<QueueStatistics>,
    mut telemetry: ResMut<SimTelemetry>,
    mut rng: ResMut<SimRng>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::PatientArrival {
        return;
    }

    let now = clock.now();
    let patient_id = generator.next_patient_id();
    telemetry.arrivals += 1;
    telemetry.notify(SimNotice::Arrived {
        patient_id,
        time: now,
    });

    // Sampled before the new patient requests a nurse.
    stats.record(now, pools.nurses.queue_len(), pools.doctors.queue_len());

    let patient = commands.spawn(Patient::new(patient_id, now)).id();
    clock.schedule_in(
        0.0,
        EventKind::PatientStarted,
        Some(EventSubject::Patient(patient)),
    );

    let interval = generator.sample_interval(rng.source());
    clock.schedule_in(interval, EventKind::PatientArrival, None);
}
