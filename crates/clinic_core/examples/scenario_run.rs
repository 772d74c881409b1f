//! Run the reference clinic and print the queue-length table.
//!
//! Run with: cargo run -p clinic_core --example scenario_run [-- config.json [out_dir]]
//!
//! Without a config path the reference clinic is used with seed 123. With an
//! output directory, queue samples and patient records are also written as Parquet.
//! Per-patient notices are logged at debug level.

use std::path::PathBuf;

use bevy_ecs::prelude::World;
use clinic_core::runner::{initialize_simulation, run_to_horizon, simulation_schedule};
use clinic_core::scenario::{build_scenario, ClinicParams};
use clinic_core::telemetry::{QueueStatistics, SimTelemetry};
use clinic_core::telemetry_export::{
    format_queue_table, write_patient_records_parquet, write_queue_samples_parquet,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) => ClinicParams::from_json_file(path)?,
        None => ClinicParams::default().with_seed(123),
    };
    let out_dir = args.next().map(PathBuf::from);

    let mut world = World::new();
    build_scenario(&mut world, params.clone())?;
    initialize_simulation(&mut world);
    let mut schedule = simulation_schedule();
    let summary = run_to_horizon(&mut world, &mut schedule);

    let telemetry = world.resource::<SimTelemetry>();
    let stats = world.resource::<QueueStatistics>();

    println!(
        "--- Clinic run ({} nurses, {} doctors, until {}, seed {:?}) ---",
        params.nurse_capacity, params.doctor_capacity, params.until, params.seed
    );
    println!("Steps executed: {}", summary.steps);
    println!("Patients arrived: {}", summary.patients_arrived);
    println!(
        "Nurse visits: {} completed, doctor visits: {} completed, referral rate {:.2}",
        telemetry.nurse.completed,
        telemetry.doctor.completed,
        telemetry.referral_rate()
    );
    println!("\n{}", format_queue_table(stats.samples()));

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(&dir)?;
        write_queue_samples_parquet(dir.join("queue_samples.parquet"), stats.samples())?;
        write_patient_records_parquet(dir.join("patient_records.parquet"), telemetry)?;
        println!("Wrote Parquet exports to {}", dir.display());
    }
    Ok(())
}
