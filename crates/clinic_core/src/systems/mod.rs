pub mod arrivals;
pub mod patient;

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::clock::SimulationClock;
    use crate::ecs::Patient;
    use crate::pool::{Stage, StaffPools};
    use crate::runner::{initialize_simulation, run_to_horizon, simulation_schedule};
    use crate::scenario::{build_scenario_with_source, ClinicParams};
    use crate::telemetry::{SimNotice, SimTelemetry};
    use crate::test_helpers::ScriptedRandom;

    #[test]
    fn simulates_one_referred_patient_end_to_end() {
        // Arrival at 4, nurse for 20, referred, doctor for 30; second arrival lies past the horizon.
        let source = ScriptedRandom::new()
            .with_normals([4.0, 100.0, 20.0, 30.0])
            .with_uniforms([0.5]);
        let mut world = World::new();
        build_scenario_with_source(
            &mut world,
            ClinicParams::default().with_until(80.0),
            Box::new(source),
        )
        .expect("valid params");
        initialize_simulation(&mut world);
        let mut schedule = simulation_schedule();

        let summary = run_to_horizon(&mut world, &mut schedule);

        assert_eq!(summary.patients_arrived, 1);
        assert_eq!(summary.final_time, 80.0);
        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(
            telemetry.notices,
            vec![
                SimNotice::Arrived {
                    patient_id: 1,
                    time: 4.0
                },
                SimNotice::StageCompleted {
                    patient_id: 1,
                    stage: Stage::Nurse,
                    time: 24.0
                },
                SimNotice::StageCompleted {
                    patient_id: 1,
                    stage: Stage::Doctor,
                    time: 54.0
                },
            ]
        );
        assert_eq!(telemetry.completed_patients.len(), 1);
        assert!(telemetry.completed_patients[0].referred);

        let pools = world.resource::<StaffPools>();
        assert_eq!(pools.nurses.in_use(), 0);
        assert_eq!(pools.doctors.in_use(), 0);
        assert!(world.resource::<SimulationClock>().is_empty());
        assert_eq!(world.query::<&Patient>().iter(&world).count(), 0);
    }
}
