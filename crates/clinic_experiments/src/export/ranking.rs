use crate::metrics::SimulationResult;

/// Index of the run whose patients spent the least time in the clinic.
/// Runs where nobody left are ranked last.
pub(crate) fn find_shortest_stay_index_impl(results: &[SimulationResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| stay_key(a).total_cmp(&stay_key(b)))
        .map(|(index, _)| index)
}

fn stay_key(result: &SimulationResult) -> f64 {
    if result.completed_patients == 0 {
        f64::INFINITY
    } else {
        result.avg_time_in_system
    }
}
