//! Metrics extraction from simulation results.
//!
//! This module extracts per-run metrics from completed clinic simulations:
//! stage throughput, referral rate, waiting-time statistics and queue lengths.

use bevy_ecs::prelude::World;
use clinic_core::profiling::EventMetrics;
use clinic_core::telemetry::{QueueStatistics, SimTelemetry};

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SimulationResult {
    /// Patients generated before the horizon.
    pub total_arrivals: u64,
    pub nurse_started: u64,
    pub nurse_completed: u64,
    pub doctor_started: u64,
    pub doctor_completed: u64,
    pub referrals: u64,
    /// Referrals per completed nurse visit.
    pub referral_rate: f64,
    /// Patients who left the clinic before the horizon.
    pub completed_patients: usize,
    pub avg_nurse_wait: f64,
    pub median_nurse_wait: f64,
    pub p90_nurse_wait: f64,
    pub avg_doctor_wait: f64,
    pub median_doctor_wait: f64,
    pub p90_doctor_wait: f64,
    pub avg_time_in_system: f64,
    /// Largest queue observed by an arriving patient.
    pub max_nurse_queue: usize,
    pub max_doctor_queue: usize,
    /// Mean queue length over arrival samples.
    pub mean_nurse_queue: f64,
    pub mean_doctor_queue: f64,
    pub events_processed: u64,
}

impl SimulationResult {
    /// Average, median and 90th percentile of `values`; zeros when empty.
    pub(crate) fn calculate_stats(values: &[f64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };
        // P90: floor(0.9 * (n-1)) index
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)];

        (avg, median, p90)
    }
}

fn mean(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<usize>() as f64 / n as f64
}

/// Extract metrics from a completed simulation world.
///
/// Reads [`SimTelemetry`], [`QueueStatistics`] and, when present, [`EventMetrics`].
pub fn extract_metrics(world: &World) -> Result<SimulationResult, String> {
    let telemetry = world
        .get_resource::<SimTelemetry>()
        .ok_or_else(|| "SimTelemetry resource not found".to_string())?;
    let stats = world
        .get_resource::<QueueStatistics>()
        .ok_or_else(|| "QueueStatistics resource not found".to_string())?;
    let events_processed = world
        .get_resource::<EventMetrics>()
        .map(|m| m.events_processed)
        .unwrap_or(0);

    let records = &telemetry.completed_patients;
    let nurse_waits: Vec<f64> = records.iter().map(|r| r.nurse_wait()).collect();
    let doctor_waits: Vec<f64> = records.iter().filter_map(|r| r.doctor_wait()).collect();
    let times_in_system: Vec<f64> = records.iter().map(|r| r.time_in_system()).collect();

    let (avg_nurse_wait, median_nurse_wait, p90_nurse_wait) =
        SimulationResult::calculate_stats(&nurse_waits);
    let (avg_doctor_wait, median_doctor_wait, p90_doctor_wait) =
        SimulationResult::calculate_stats(&doctor_waits);
    let (avg_time_in_system, _, _) = SimulationResult::calculate_stats(&times_in_system);

    Ok(SimulationResult {
        total_arrivals: telemetry.arrivals,
        nurse_started: telemetry.nurse.started,
        nurse_completed: telemetry.nurse.completed,
        doctor_started: telemetry.doctor.started,
        doctor_completed: telemetry.doctor.completed,
        referrals: telemetry.referrals,
        referral_rate: telemetry.referral_rate(),
        completed_patients: records.len(),
        avg_nurse_wait,
        median_nurse_wait,
        p90_nurse_wait,
        avg_doctor_wait,
        median_doctor_wait,
        p90_doctor_wait,
        avg_time_in_system,
        max_nurse_queue: stats.max_nurse_queue(),
        max_doctor_queue: stats.max_doctor_queue(),
        mean_nurse_queue: mean(stats.samples().iter().map(|s| s.nurse_queue_len)),
        mean_doctor_queue: mean(stats.samples().iter().map(|s| s.doctor_queue_len)),
        events_processed,
    })
}

fn mean_of(members: &[&SimulationResult], f: fn(&SimulationResult) -> f64) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members.iter().map(|r| f(r)).sum::<f64>() / members.len() as f64
}

/// Mean of the headline metrics over all replications of one experiment.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExperimentSummary {
    pub experiment_id: String,
    pub replications: usize,
    pub mean_arrivals: f64,
    pub mean_referral_rate: f64,
    pub mean_nurse_wait: f64,
    pub mean_doctor_wait: f64,
    pub mean_time_in_system: f64,
    pub mean_max_nurse_queue: f64,
    pub mean_max_doctor_queue: f64,
}

/// Groups results by experiment id (in first-seen order) and averages each group.
pub fn summarize_experiments(
    results: &[SimulationResult],
    parameter_sets: &[crate::parameters::ParameterSet],
) -> Vec<ExperimentSummary> {
    let mut groups: Vec<(&str, Vec<&SimulationResult>)> = Vec::new();
    for (result, set) in results.iter().zip(parameter_sets) {
        match groups.iter_mut().find(|(id, _)| *id == set.experiment_id) {
            Some((_, members)) => members.push(result),
            None => groups.push((set.experiment_id.as_str(), vec![result])),
        }
    }

    groups
        .into_iter()
        .map(|(experiment_id, members)| {
            let avg = |f: fn(&SimulationResult) -> f64| mean_of(&members, f);
            ExperimentSummary {
                experiment_id: experiment_id.to_string(),
                replications: members.len(),
                mean_arrivals: avg(|r| r.total_arrivals as f64),
                mean_referral_rate: avg(|r| r.referral_rate),
                mean_nurse_wait: avg(|r| r.avg_nurse_wait),
                mean_doctor_wait: avg(|r| r.avg_doctor_wait),
                mean_time_in_system: avg(|r| r.avg_time_in_system),
                mean_max_nurse_queue: avg(|r| r.max_nurse_queue as f64),
                mean_max_doctor_queue: avg(|r| r.max_doctor_queue as f64),
            }
        })
        .collect()
}
