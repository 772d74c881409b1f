//! Example: staffing sweep with seeded replications.
//!
//! This example demonstrates how to:
//! 1. Define a grid over nurse and doctor staffing
//! 2. Run several seeded replications of each combination in parallel
//! 3. Summarize replications per combination
//! 4. Export per-run results to CSV and summaries to JSON
//!
//! Run with: cargo run -p clinic_experiments --example replication_sweep [-- out_dir]

use std::path::PathBuf;

use clinic_experiments::{
    export_summaries_to_json, export_to_csv, find_shortest_stay_index, run_parallel_experiments,
    summarize_experiments, ParameterSpace,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sweep_results"));

    let space = ParameterSpace::grid()
        .nurse_capacity(vec![2, 3, 4])
        .doctor_capacity(vec![1, 2, 3, 4, 5])
        .until(vec![480.0])
        .replications(10);

    let parameter_sets = space.generate();
    println!("Generated {} runs", parameter_sets.len());

    let results = run_parallel_experiments(&parameter_sets, None)?;
    let summaries = summarize_experiments(&results, &parameter_sets);

    println!("\n=== Mean over replications ===");
    println!(
        "{:<8} {:>6} {:>7} {:>11} {:>12} {:>10}",
        "exp", "nurses", "doctors", "nurse_wait", "doctor_wait", "in_system"
    );
    for summary in &summaries {
        let params = parameter_sets
            .iter()
            .find(|set| set.experiment_id == summary.experiment_id)
            .map(|set| &set.params);
        if let Some(params) = params {
            println!(
                "{:<8} {:>6} {:>7} {:>11.1} {:>12.1} {:>10.1}",
                summary.experiment_id,
                params.nurse_capacity,
                params.doctor_capacity,
                summary.mean_nurse_wait,
                summary.mean_doctor_wait,
                summary.mean_time_in_system,
            );
        }
    }

    if let Some(best) = find_shortest_stay_index(&results) {
        let set = &parameter_sets[best];
        println!(
            "\nShortest single run: {} (run {}, seed {}), {:.1} min in system",
            set.experiment_id, set.run_id, set.seed, results[best].avg_time_in_system
        );
    }

    export_to_csv(&results, &parameter_sets, out_dir.join("runs.csv"))?;
    export_summaries_to_json(&summaries, out_dir.join("summaries.json"))?;
    println!("\nResults written to {}", out_dir.display());
    Ok(())
}
