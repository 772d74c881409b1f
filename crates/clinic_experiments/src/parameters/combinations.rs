use clinic_core::clock::SimTime;
use clinic_core::distributions::NormalParams;
use clinic_core::scenario::ClinicParams;

use super::ParameterSpace;

/// Represents a single parameter combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ParameterCombination {
    pub(super) nurse_capacity: usize,
    pub(super) doctor_capacity: usize,
    pub(super) referral_probability: f64,
    pub(super) arrival_mean: f64,
    pub(super) until: SimTime,
}

impl ParameterCombination {
    /// Overlays this combination on `base`.
    pub(super) fn apply(&self, base: &ClinicParams) -> ClinicParams {
        ClinicParams {
            nurse_capacity: self.nurse_capacity,
            doctor_capacity: self.doctor_capacity,
            referral_probability: self.referral_probability,
            arrival_interval: NormalParams::new(self.arrival_mean, base.arrival_interval.std_dev),
            until: self.until,
            ..base.clone()
        }
    }
}

/// Holds all parameter variations to explore, with base values filled in for empty dimensions.
pub(super) struct ParameterVariations {
    pub(super) nurse_capacities: Vec<usize>,
    pub(super) doctor_capacities: Vec<usize>,
    pub(super) referral_probabilities: Vec<f64>,
    pub(super) arrival_means: Vec<f64>,
    pub(super) horizons: Vec<SimTime>,
}

fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

impl ParameterVariations {
    pub(super) fn from_space(space: &ParameterSpace) -> Self {
        let base = &space.base;
        Self {
            nurse_capacities: or_base(&space.nurse_capacities, base.nurse_capacity),
            doctor_capacities: or_base(&space.doctor_capacities, base.doctor_capacity),
            referral_probabilities: or_base(
                &space.referral_probabilities,
                base.referral_probability,
            ),
            arrival_means: or_base(&space.arrival_means, base.arrival_interval.mean),
            horizons: or_base(&space.horizons, base.until),
        }
    }

    /// Generate all combinations using Cartesian product.
    pub(super) fn generate_combinations(&self) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.nurse_capacities.iter().flat_map(move |&nurse_capacity| {
            self.doctor_capacities.iter().flat_map(move |&doctor_capacity| {
                self.referral_probabilities
                    .iter()
                    .flat_map(move |&referral_probability| {
                        self.arrival_means.iter().flat_map(move |&arrival_mean| {
                            self.horizons.iter().map(move |&until| ParameterCombination {
                                nurse_capacity,
                                doctor_capacity,
                                referral_probability,
                                arrival_mean,
                                until,
                            })
                        })
                    })
            })
        })
    }
}
