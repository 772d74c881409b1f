//! Patient process: nurse visit, referral draw, optional doctor visit.
//!
//! A patient waiting on a saturated pool is parked in that pool's FIFO queue
//! and resumed by a zero-delay `StaffGranted` event when a unit is handed over.
//! An immediate grant starts service in the same step.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{sample_duration, RandomSource, SimRng};
use crate::ecs::{Patient, PatientState};
use crate::pool::{Acquire, Stage, StaffPools};
use crate::scenario::ClinicConfig;
use crate::telemetry::{PatientRecord, SimNotice, SimTelemetry};

/// Borrowed world state shared by the patient transitions.
struct PatientContext<'a> {
    clock: &'a mut SimulationClock,
    pools: &'a mut StaffPools,
    rng: &'a mut dyn RandomSource,
    config: &'a ClinicConfig,
    telemetry: &'a mut SimTelemetry,
}

impl PatientContext<'_> {
    fn request_staff(&mut self, entity: Entity, patient: &mut Patient, stage: Stage) {
        patient.state = PatientState::waiting_for(stage);
        patient.stage_times_mut(stage).requested_at = Some(self.clock.now());

        match self.pools.get_mut(stage).acquire(entity) {
            Acquire::Granted => self.begin_service(entity, patient, stage),
            Acquire::Queued { position } => {
                tracing::debug!(
                    patient_id = patient.id,
                    pool = stage.name(),
                    position,
                    "staff saturated, patient queued"
                );
            }
        }
    }

    fn begin_service(&mut self, entity: Entity, patient: &mut Patient, stage: Stage) {
        let now = self.clock.now();
        patient.state = PatientState::served_by(stage);
        patient.stage_times_mut(stage).started_at = Some(now);
        self.telemetry.stage_counts_mut(stage).started += 1;

        let service = sample_duration(self.rng, self.config.service_for(stage));
        self.clock.schedule_in(
            service,
            EventKind::ServiceCompleted,
            Some(EventSubject::Patient(entity)),
        );
    }

    /// Records the stage end, emits the notice and hands the unit on.
    fn complete_service(&mut self, patient: &mut Patient, stage: Stage) {
        let now = self.clock.now();
        patient.stage_times_mut(stage).completed_at = Some(now);
        self.telemetry.stage_counts_mut(stage).completed += 1;
        self.telemetry.notify(SimNotice::StageCompleted {
            patient_id: patient.id,
            stage,
            time: now,
        });

        match self.pools.get_mut(stage).release() {
            Ok(Some(next)) => self.clock.schedule_in(
                0.0,
                EventKind::StaffGranted,
                Some(EventSubject::Patient(next)),
            ),
            Ok(None) => {}
            Err(err) => tracing::error!(patient_id = patient.id, %err, "staff release failed"),
        }
    }

    fn finish(&mut self, patient: &mut Patient) {
        patient.state = PatientState::Done;
        if let Some(record) = PatientRecord::from_patient(patient) {
            self.telemetry.completed_patients.push(record);
        }
    }
}

fn event_patient(event: &CurrentEvent) -> Option<Entity> {
    match event.0.subject {
        Some(EventSubject::Patient(entity)) => Some(entity),
        None => None,
    }
}

/// New patient requests a nurse.
pub fn patient_started_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut pools: ResMut<StaffPools>,
    mut rng: ResMut<SimRng>,
    config: Res<ClinicConfig>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::PatientStarted {
        return;
    }
    let Some(entity) = event_patient(&event) else {
        tracing::warn!(kind = ?event.0.kind, "event without patient subject");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        tracing::warn!(?entity, "patient entity missing");
        return;
    };

    let mut ctx = PatientContext {
        clock: &mut clock,
        pools: &mut pools,
        rng: rng.source(),
        config: &config,
        telemetry: &mut telemetry,
    };
    ctx.request_staff(entity, &mut patient, Stage::Nurse);
}

/// Queued patient received a unit handed over on release.
pub fn staff_granted_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut pools: ResMut<StaffPools>,
    mut rng: ResMut<SimRng>,
    config: Res<ClinicConfig>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::StaffGranted {
        return;
    }
    let Some(entity) = event_patient(&event) else {
        tracing::warn!(kind = ?event.0.kind, "event without patient subject");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        tracing::warn!(?entity, "patient entity missing");
        return;
    };
    let stage = match patient.state {
        PatientState::WaitingForNurse => Stage::Nurse,
        PatientState::WaitingForDoctor => Stage::Doctor,
        other => {
            tracing::warn!(patient_id = patient.id, state = ?other, "grant for patient not waiting");
            return;
        }
    };

    let mut ctx = PatientContext {
        clock: &mut clock,
        pools: &mut pools,
        rng: rng.source(),
        config: &config,
        telemetry: &mut telemetry,
    };
    ctx.begin_service(entity, &mut patient, stage);
}

/// Service finished: release the unit, then either refer on or leave.
#[allow(clippy::too_many_arguments)]
pub fn service_completed_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut pools: ResMut<StaffPools>,
    mut rng: ResMut<SimRng>,
    config: Res<ClinicConfig>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::ServiceCompleted {
        return;
    }
    let Some(entity) = event_patient(&event) else {
        tracing::warn!(kind = ?event.0.kind, "event without patient subject");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        tracing::warn!(?entity, "patient entity missing");
        return;
    };
    let stage = match patient.state {
        PatientState::WithNurse => Stage::Nurse,
        PatientState::WithDoctor => Stage::Doctor,
        other => {
            tracing::warn!(patient_id = patient.id, state = ?other, "completion for patient not in service");
            return;
        }
    };

    let mut ctx = PatientContext {
        clock: &mut clock,
        pools: &mut pools,
        rng: rng.source(),
        config: &config,
        telemetry: &mut telemetry,
    };
    ctx.complete_service(&mut patient, stage);

    let referred = stage == Stage::Nurse && ctx.rng.uniform() < ctx.config.referral_probability;
    if referred {
        patient.referred = true;
        ctx.telemetry.referrals += 1;
        ctx.request_staff(entity, &mut patient, Stage::Doctor);
    } else {
        ctx.finish(&mut patient);
        commands.entity(entity).despawn();
    }
}
