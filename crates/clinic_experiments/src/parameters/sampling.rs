use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::combinations::{ParameterCombination, ParameterVariations};
use super::{run_seed, ParameterSet, ParameterSpace};

fn pick<T: Copy>(rng: &mut StdRng, values: &[T]) -> T {
    values[rng.gen_range(0..values.len())]
}

impl ParameterSpace {
    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Samples up to `count` distinct combinations from the defined space; each
    /// sampled combination gets the configured number of replications.
    /// Sampling stops early once every combination has been drawn.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seen: Vec<ParameterCombination> = Vec::new();
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 10000;

        while seen.len() < count && attempts < MAX_ATTEMPTS {
            attempts += 1;
            let combo = ParameterCombination {
                nurse_capacity: pick(&mut rng, &variations.nurse_capacities),
                doctor_capacity: pick(&mut rng, &variations.doctor_capacities),
                referral_probability: pick(&mut rng, &variations.referral_probabilities),
                arrival_mean: pick(&mut rng, &variations.arrival_means),
                until: pick(&mut rng, &variations.horizons),
            };
            if !seen.contains(&combo) {
                seen.push(combo);
            }
        }

        let replications = self.replications;
        seen.iter()
            .enumerate()
            .flat_map(|(sample, combo)| {
                let params = combo.apply(&self.base);
                (0..replications).map(move |run_id| {
                    let index = (sample * replications + run_id) as u64;
                    ParameterSet::new(
                        params.clone(),
                        format!("random_{}", sample),
                        run_id,
                        run_seed(seed.wrapping_add(index)),
                    )
                })
            })
            .collect()
    }
}
