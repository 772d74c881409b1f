use bevy_ecs::prelude::Component;

use crate::clock::SimTime;
use crate::pool::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientState {
    WaitingForNurse,
    WithNurse,
    WaitingForDoctor,
    WithDoctor,
    Done,
}

impl PatientState {
    /// The stage a patient is queued for or being served in, if any.
    pub fn stage(self) -> Option<Stage> {
        match self {
            PatientState::WaitingForNurse | PatientState::WithNurse => Some(Stage::Nurse),
            PatientState::WaitingForDoctor | PatientState::WithDoctor => Some(Stage::Doctor),
            PatientState::Done => None,
        }
    }

    pub fn waiting_for(stage: Stage) -> Self {
        match stage {
            Stage::Nurse => PatientState::WaitingForNurse,
            Stage::Doctor => PatientState::WaitingForDoctor,
        }
    }

    pub fn served_by(stage: Stage) -> Self {
        match stage {
            Stage::Nurse => PatientState::WithNurse,
            Stage::Doctor => PatientState::WithDoctor,
        }
    }
}

/// Timestamps of one service stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimes {
    /// When the patient asked for a staff unit.
    pub requested_at: Option<SimTime>,
    /// When a unit was granted and service began.
    pub started_at: Option<SimTime>,
    /// When service ended and the unit was released.
    pub completed_at: Option<SimTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Patient {
    /// Sequential id starting at 1.
    pub id: u64,
    pub state: PatientState,
    pub arrival_time: SimTime,
    pub nurse: StageTimes,
    /// Set when the referral draw sends the patient on to a doctor.
    pub referred: bool,
    pub doctor: StageTimes,
}

impl Patient {
    pub fn new(id: u64, arrival_time: SimTime) -> Self {
        Self {
            id,
            state: PatientState::WaitingForNurse,
            arrival_time,
            nurse: StageTimes::default(),
            referred: false,
            doctor: StageTimes::default(),
        }
    }

    pub fn stage_times_mut(&mut self, stage: Stage) -> &mut StageTimes {
        match stage {
            Stage::Nurse => &mut self.nurse,
            Stage::Doctor => &mut self.doctor,
        }
    }
}
