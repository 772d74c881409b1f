//! Load tests for clinic_core: validate performance under long horizons and busy clinics.

use bevy_ecs::prelude::World;
use clinic_core::runner::{initialize_simulation, run_to_horizon, simulation_schedule};
use clinic_core::scenario::{build_scenario, ClinicParams};
use std::time::Instant;

fn run_and_report(label: &str, params: ClinicParams) -> f64 {
    let mut world = World::new();
    build_scenario(&mut world, params).expect("valid params");

    let start = Instant::now();
    initialize_simulation(&mut world);
    let mut schedule = simulation_schedule();
    let summary = run_to_horizon(&mut world, &mut schedule);
    let duration = start.elapsed();

    let events_per_sec = summary.steps as f64 / duration.as_secs_f64();
    println!(
        "{label}: {} events, {} patients in {:.2}s ({:.0} events/sec)",
        summary.steps,
        summary.patients_arrived,
        duration.as_secs_f64(),
        events_per_sec
    );
    events_per_sec
}

#[test]
#[ignore] // Only run explicitly: cargo test --package clinic_core --test load_tests -- --ignored
fn test_sustained_load() {
    // Staffed to keep up: queues stay short over a long horizon.
    let params = ClinicParams::default()
        .with_seed(42)
        .with_capacities(5, 7)
        .with_until(500_000.0);

    let events_per_sec = run_and_report("Sustained load test", params);
    assert!(
        events_per_sec > 1000.0,
        "Should process >1000 events/sec, got {:.0}",
        events_per_sec
    );
}

#[test]
#[ignore]
fn test_overloaded_clinic() {
    // Reference staffing: both queues grow without bound.
    let params = ClinicParams::default().with_seed(42).with_until(200_000.0);

    let events_per_sec = run_and_report("Overloaded clinic test", params);
    assert!(
        events_per_sec > 1000.0,
        "Should process >1000 events/sec, got {:.0}",
        events_per_sec
    );
}
