use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "nurse_capacity",
        "doctor_capacity",
        "referral_probability",
        "arrival_mean",
        "arrival_std_dev",
        "until",
        "total_arrivals",
        "nurse_started",
        "nurse_completed",
        "doctor_started",
        "doctor_completed",
        "referrals",
        "referral_rate",
        "completed_patients",
        "avg_nurse_wait",
        "median_nurse_wait",
        "p90_nurse_wait",
        "avg_doctor_wait",
        "median_doctor_wait",
        "p90_doctor_wait",
        "avg_time_in_system",
        "max_nurse_queue",
        "max_doctor_queue",
        "mean_nurse_queue",
        "mean_doctor_queue",
        "events_processed",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            params.nurse_capacity.to_string(),
            params.doctor_capacity.to_string(),
            params.referral_probability.to_string(),
            params.arrival_interval.mean.to_string(),
            params.arrival_interval.std_dev.to_string(),
            params.until.to_string(),
            result.total_arrivals.to_string(),
            result.nurse_started.to_string(),
            result.nurse_completed.to_string(),
            result.doctor_started.to_string(),
            result.doctor_completed.to_string(),
            result.referrals.to_string(),
            result.referral_rate.to_string(),
            result.completed_patients.to_string(),
            result.avg_nurse_wait.to_string(),
            result.median_nurse_wait.to_string(),
            result.p90_nurse_wait.to_string(),
            result.avg_doctor_wait.to_string(),
            result.median_doctor_wait.to_string(),
            result.p90_doctor_wait.to_string(),
            result.avg_time_in_system.to_string(),
            result.max_nurse_queue.to_string(),
            result.max_doctor_queue.to_string(),
            result.mean_nurse_queue.to_string(),
            result.mean_doctor_queue.to_string(),
            result.events_processed.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
