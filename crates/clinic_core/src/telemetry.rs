//! Telemetry / KPIs: queue-length samples, per-patient records and run notices.

use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::SimTime;
use crate::ecs::Patient;
use crate::pool::Stage;

/// Queue lengths observed when a patient arrives, before that patient requests anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueSample {
    pub time: SimTime,
    pub nurse_queue_len: usize,
    pub doctor_queue_len: usize,
}

/// Queue samples written by the arrival generator. Read back after the run.
#[derive(Debug, Default, Resource)]
pub struct QueueStatistics {
    samples: Vec<QueueSample>,
}

impl QueueStatistics {
    pub fn record(&mut self, time: SimTime, nurse_queue_len: usize, doctor_queue_len: usize) {
        self.samples.push(QueueSample {
            time,
            nurse_queue_len,
            doctor_queue_len,
        });
    }

    pub fn samples(&self) -> &[QueueSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<QueueSample> {
        self.samples
    }

    pub fn max_nurse_queue(&self) -> usize {
        self.samples.iter().map(|s| s.nurse_queue_len).max().unwrap_or(0)
    }

    pub fn max_doctor_queue(&self) -> usize {
        self.samples.iter().map(|s| s.doctor_queue_len).max().unwrap_or(0)
    }
}

/// Observational notification emitted while the run progresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimNotice {
    Arrived { patient_id: u64, time: SimTime },
    StageCompleted { patient_id: u64, stage: Stage, time: SimTime },
}

impl SimNotice {
    pub fn time(&self) -> SimTime {
        match *self {
            SimNotice::Arrived { time, .. } | SimNotice::StageCompleted { time, .. } => time,
        }
    }
}

impl fmt::Display for SimNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimNotice::Arrived { patient_id, time } => {
                write!(f, "Patient {patient_id} arrived at {time:.2}")
            }
            SimNotice::StageCompleted {
                patient_id,
                stage,
                time,
            } => write!(f, "Patient {patient_id} finished with {stage} at {time:.2}"),
        }
    }
}

/// One patient that reached `Done`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub patient_id: u64,
    pub arrival_time: SimTime,
    pub nurse_start: SimTime,
    pub nurse_done: SimTime,
    pub referred: bool,
    pub doctor_queued_at: Option<SimTime>,
    pub doctor_start: Option<SimTime>,
    pub doctor_done: Option<SimTime>,
}

impl PatientRecord {
    /// Builds a record from a finished patient. Returns `None` if the nurse stage never ran.
    pub fn from_patient(patient: &Patient) -> Option<Self> {
        Some(Self {
            patient_id: patient.id,
            arrival_time: patient.arrival_time,
            nurse_start: patient.nurse.started_at?,
            nurse_done: patient.nurse.completed_at?,
            referred: patient.referred,
            doctor_queued_at: patient.doctor.requested_at,
            doctor_start: patient.doctor.started_at,
            doctor_done: patient.doctor.completed_at,
        })
    }

    /// Time from arrival to the start of nurse service.
    pub fn nurse_wait(&self) -> SimTime {
        self.nurse_start - self.arrival_time
    }

    /// Time spent queueing for a doctor, for referred patients.
    pub fn doctor_wait(&self) -> Option<SimTime> {
        Some(self.doctor_start? - self.doctor_queued_at?)
    }

    /// Time from arrival to leaving the clinic.
    pub fn time_in_system(&self) -> SimTime {
        self.doctor_done.unwrap_or(self.nurse_done) - self.arrival_time
    }
}

/// Per-stage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub started: u64,
    pub completed: u64,
}

/// Collects simulation telemetry for a run.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub arrivals: u64,
    pub nurse: StageCounts,
    pub doctor: StageCounts,
    pub referrals: u64,
    pub completed_patients: Vec<PatientRecord>,
    pub notices: Vec<SimNotice>,
}

impl SimTelemetry {
    pub fn stage_counts(&self, stage: Stage) -> &StageCounts {
        match stage {
            Stage::Nurse => &self.nurse,
            Stage::Doctor => &self.doctor,
        }
    }

    pub fn stage_counts_mut(&mut self, stage: Stage) -> &mut StageCounts {
        match stage {
            Stage::Nurse => &mut self.nurse,
            Stage::Doctor => &mut self.doctor,
        }
    }

    pub fn notify(&mut self, notice: SimNotice) {
        tracing::debug!(time = notice.time(), "{notice}");
        self.notices.push(notice);
    }

    /// Fraction of patients finishing the nurse stage who were referred on.
    pub fn referral_rate(&self) -> f64 {
        if self.nurse.completed == 0 {
            0.0
        } else {
            self.referrals as f64 / self.nurse.completed as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn notify_under(level: tracing::Level) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut telemetry = SimTelemetry::default();
            telemetry.notify(SimNotice::Arrived {
                patient_id: 1,
                time: 2.0,
            });
            assert_eq!(telemetry.notices.len(), 1);
        });
        log.contents()
    }

    #[test]
    fn notices_stay_below_info() {
        assert!(notify_under(tracing::Level::INFO).is_empty());
        assert!(notify_under(tracing::Level::DEBUG).contains("Patient 1 arrived at 2.00"));
    }

    #[test]
    fn notices_render_like_a_clinic_log() {
        let arrived = SimNotice::Arrived {
            patient_id: 3,
            time: 12.346,
        };
        let done = SimNotice::StageCompleted {
            patient_id: 3,
            stage: Stage::Doctor,
            time: 61.0,
        };
        assert_eq!(arrived.to_string(), "Patient 3 arrived at 12.35");
        assert_eq!(done.to_string(), "Patient 3 finished with doctor at 61.00");
    }

    #[test]
    fn record_kpis() {
        let mut patient = Patient::new(1, 10.0);
        patient.nurse.requested_at = Some(10.0);
        patient.nurse.started_at = Some(14.0);
        patient.nurse.completed_at = Some(34.0);
        patient.referred = true;
        patient.doctor.requested_at = Some(34.0);
        patient.doctor.started_at = Some(40.0);
        patient.doctor.completed_at = Some(70.0);

        let record = PatientRecord::from_patient(&patient).expect("record");
        assert_eq!(record.nurse_wait(), 4.0);
        assert_eq!(record.doctor_wait(), Some(6.0));
        assert_eq!(record.time_in_system(), 60.0);
    }

    #[test]
    fn unreferred_record_has_no_doctor_wait() {
        let mut patient = Patient::new(2, 0.0);
        patient.nurse.started_at = Some(0.0);
        patient.nurse.completed_at = Some(20.0);
        let record = PatientRecord::from_patient(&patient).expect("record");
        assert_eq!(record.doctor_wait(), None);
        assert_eq!(record.time_in_system(), 20.0);
    }

    #[test]
    fn queue_statistics_track_maxima() {
        let mut stats = QueueStatistics::default();
        assert!(stats.is_empty());
        stats.record(1.0, 0, 0);
        stats.record(2.0, 3, 1);
        stats.record(3.0, 2, 4);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.max_nurse_queue(), 3);
        assert_eq!(stats.max_doctor_queue(), 4);
    }

    #[test]
    fn referral_rate_handles_empty_runs() {
        let telemetry = SimTelemetry::default();
        assert_eq!(telemetry.referral_rate(), 0.0);
    }
}
