use std::cmp::Ordering;

use fastrand::Rng;
use itertools::Itertools;

use crate::{
    core::{battery::Battery, outputs_mode::OutputsMode, plan::total_cost, time_segment::TimeSegment},
    quantity::currency::Gbp,
};

/// Hand-picked gene patterns for the smart mutation: charge up and release, or just harvest.
const SMART_PATTERNS: [&[OutputsMode]; 2] = [
    &[
        OutputsMode::ChargeFromGridAndSolar,
        OutputsMode::ChargeFromGridAndSolar,
        OutputsMode::Discharge,
    ],
    &[
        OutputsMode::ChargeSolarOnly,
        OutputsMode::ChargeSolarOnly,
        OutputsMode::ChargeSolarOnly,
        OutputsMode::ChargeSolarOnly,
    ],
];

/// Candidate mode sequence, one gene per segment.
#[derive(Clone, Debug)]
pub struct Chromosome {
    pub genes: Vec<OutputsMode>,

    /// Plan cost plus the cycling penalty, lower is better.
    pub fitness: Gbp,
}

impl PartialEq<Self> for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Chromosome {}

impl PartialOrd<Self> for Chromosome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Chromosome {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fitness.cmp(&other.fitness)
    }
}

/// Computes the fitness of the mode sequences against the day's forecast.
pub struct Evaluator<'a> {
    pub segments: &'a [TimeSegment],
    pub battery: &'a Battery,
    pub transition_penalty: Gbp,
}

impl Evaluator<'_> {
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(&self, genes: Vec<OutputsMode>) -> Chromosome {
        let fitness = self.plan_cost(&genes) + self.transition_penalty * n_reversals(&genes) as f64;
        Chromosome { genes, fitness }
    }

    /// Simulate the day with the genes applied and return the total cost.
    pub fn plan_cost(&self, genes: &[OutputsMode]) -> Gbp {
        let mut segments = self.segments.to_vec();
        for (segment, gene) in segments.iter_mut().zip(genes) {
            segment.mode = *gene;
        }
        self.battery.simulate_all(&mut segments);
        total_cost(&segments)
    }
}

/// Count the charge↔discharge switches.
pub fn n_reversals(genes: &[OutputsMode]) -> usize {
    genes.iter().tuple_windows().filter(|(this, next)| this.is_reversal(**next)).count()
}

pub fn random_gene(rng: &mut Rng) -> OutputsMode {
    OutputsMode::ALL[rng.usize(..OutputsMode::ALL.len())]
}

/// Two-point crossover: swap the genes between two random cut points.
pub fn crossover(
    rng: &mut Rng,
    parent_1: &[OutputsMode],
    parent_2: &[OutputsMode],
) -> (Vec<OutputsMode>, Vec<OutputsMode>) {
    debug_assert_eq!(parent_1.len(), parent_2.len());
    let len = parent_1.len();
    let (cut_1, cut_2) = {
        let cut_1 = rng.usize(..=len);
        let cut_2 = rng.usize(..=len);
        (cut_1.min(cut_2), cut_1.max(cut_2))
    };
    let mut child_1 = parent_1.to_vec();
    let mut child_2 = parent_2.to_vec();
    child_1[cut_1..cut_2].copy_from_slice(&parent_2[cut_1..cut_2]);
    child_2[cut_1..cut_2].copy_from_slice(&parent_1[cut_1..cut_2]);
    (child_1, child_2)
}

/// Randomly reassign each gene with the given probability.
pub fn mutate(rng: &mut Rng, genes: &mut [OutputsMode], rate: f64) {
    for gene in genes {
        if rng.f64() < rate {
            *gene = random_gene(rng);
        }
    }
}

/// Overwrite a random neighbourhood with one of the [`SMART_PATTERNS`].
pub fn smart_mutate(rng: &mut Rng, genes: &mut [OutputsMode]) {
    if genes.is_empty() {
        return;
    }
    let pattern = SMART_PATTERNS[rng.usize(..SMART_PATTERNS.len())];
    let start = rng.usize(..genes.len());
    for (gene, mode) in genes[start..].iter_mut().zip(pattern) {
        *gene = *mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_reversals_ok() {
        let genes = [
            OutputsMode::ChargeFromGridAndSolar,
            OutputsMode::ChargeSolarOnly,
            OutputsMode::Discharge,
            OutputsMode::Discharge,
            OutputsMode::ChargeSolarOnly,
        ];
        assert_eq!(n_reversals(&genes), 2);
        assert_eq!(n_reversals(&[]), 0);
    }

    #[test]
    fn crossover_preserves_genes() {
        let mut rng = Rng::with_seed(42);
        let parent_1 = vec![OutputsMode::Discharge; 48];
        let parent_2 = vec![OutputsMode::ChargeSolarOnly; 48];
        for _ in 0..100 {
            let (child_1, child_2) = crossover(&mut rng, &parent_1, &parent_2);
            assert_eq!(child_1.len(), 48);
            for index in 0..48 {
                // Every position is taken from exactly one parent in each child:
                assert_ne!(child_1[index], child_2[index]);
            }
        }
    }

    #[test]
    fn zero_rate_does_not_mutate() {
        let mut rng = Rng::with_seed(42);
        let mut genes = vec![OutputsMode::Discharge; 48];
        mutate(&mut rng, &mut genes, 0.0);
        assert!(genes.iter().all(|gene| *gene == OutputsMode::Discharge));
    }

    #[test]
    fn full_rate_mutates_everything_eventually() {
        let mut rng = Rng::with_seed(42);
        let mut genes = vec![OutputsMode::Discharge; 48];
        mutate(&mut rng, &mut genes, 1.0);
        assert!(genes.iter().any(|gene| *gene != OutputsMode::Discharge));
    }

    #[test]
    fn smart_mutation_writes_a_pattern() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..20 {
            let mut genes = vec![OutputsMode::Discharge; 48];
            smart_mutate(&mut rng, &mut genes);
            let n_changed = genes.iter().filter(|gene| gene.is_charging()).count();
            assert!((1..=4).contains(&n_changed), "{genes:?}");
        }
    }

    #[test]
    fn ordered_by_fitness() {
        let better = Chromosome { genes: vec![], fitness: Gbp(1.0) };
        let worse = Chromosome { genes: vec![], fitness: Gbp(2.0) };
        assert!(better < worse);
    }
}
