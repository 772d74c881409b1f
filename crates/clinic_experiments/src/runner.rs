//! Parallel simulation execution using rayon.
//!
//! This module provides functions to run single simulations and execute
//! multiple simulations in parallel for parameter sweeps and replications.

use bevy_ecs::prelude::World;
use clinic_core::runner::{initialize_simulation, run_to_horizon, simulation_schedule};
use clinic_core::scenario::build_scenario;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::metrics::{extract_metrics, SimulationResult};
use crate::parameters::ParameterSet;

/// Run a single simulation with the given parameter set.
///
/// Creates a new world, builds the scenario, runs the simulation to its
/// horizon, and extracts metrics from the results.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, String> {
    let mut world = World::new();
    build_scenario(&mut world, param_set.clinic_params()).map_err(|error| {
        format!(
            "{} run {}: invalid parameters: {error}",
            param_set.experiment_id, param_set.run_id
        )
    })?;
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let summary = run_to_horizon(&mut world, &mut schedule);
    tracing::debug!(
        experiment = %param_set.experiment_id,
        run = param_set.run_id,
        steps = summary.steps,
        "simulation finished"
    );

    extract_metrics(&world)
}

/// Run multiple simulations in parallel.
///
/// Uses rayon to execute simulations concurrently across available CPU cores.
/// Each simulation owns its own `World`; nothing is shared between runs.
///
/// # Arguments
///
/// * `parameter_sets` - Parameter sets to run
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
///
/// # Returns
///
/// Results in the same order as the input parameter sets, or the first error.
pub fn run_parallel_experiments(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, String> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, String> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|error| format!("Failed to create thread pool: {error}"))?;

    tracing::info!(runs = total, threads = pool.current_num_threads(), "starting experiments");

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Err(error) = &result {
                    tracing::warn!(%error, "simulation failed");
                }
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, String>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;

    #[test]
    fn test_single_simulation() {
        let sets = ParameterSpace::grid().generate();
        let result = run_single_simulation(&sets[0]).expect("run");

        assert!(result.total_arrivals > 0);
        assert!(result.nurse_completed > 0);
        assert!(result.events_processed > 0);
    }

    #[test]
    fn test_parallel_experiments_preserve_order() {
        let space = ParameterSpace::grid()
            .nurse_capacity(vec![1, 3])
            .doctor_capacity(vec![1, 2]);
        let sets = space.generate();
        let results = run_parallel_experiments_with_progress(&sets, Some(2), false).expect("runs");

        assert_eq!(results.len(), 4);
        for (set, result) in sets.iter().zip(&results) {
            assert_eq!(*result, run_single_simulation(set).expect("rerun"));
        }
    }

    #[test]
    fn test_invalid_parameters_fail_the_sweep() {
        let sets = ParameterSpace::grid().referral_probability(vec![0.5, 2.0]).generate();
        let err = run_parallel_experiments_with_progress(&sets, Some(1), false).unwrap_err();
        assert!(err.contains("invalid parameters"));
    }
}
