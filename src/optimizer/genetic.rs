mod chromosome;

use std::time::Instant;

use bon::Builder;
use chrono::NaiveDate;
use fastrand::Rng;

use self::chromosome::{Chromosome, Evaluator, crossover, mutate, random_gene, smart_mutate};
use crate::{
    core::{battery::Battery, outputs_mode::OutputsMode, time_segment::TimeSegment},
    optimizer::PlanOptimizer,
    prelude::*,
    quantity::currency::Gbp,
};

/// Segments of the cheap night window, 00:00–05:00.
const NIGHT: std::ops::Range<usize> = 0..10;

/// Segments of the evening peak window, 16:00–19:00.
const PEAK: std::ops::Range<usize> = 32..38;

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct GeneticSettings {
    pub population_size: usize,
    pub n_generations: usize,
    pub tournament_size: usize,
    pub crossover_rate: f64,

    /// Per-gene probability of a random reassignment.
    pub mutation_rate: f64,

    /// Per-child probability of overwriting a neighbourhood with a hand-picked pattern.
    pub smart_mutation_rate: f64,

    /// Number of the best chromosomes carried over unchanged.
    pub n_elites: usize,

    /// Stop after this many generations without improvement.
    pub n_stall_generations: usize,

    /// Fitness penalty per charge↔discharge switch.
    pub transition_penalty: Gbp,

    pub seed: u64,
}

impl Default for GeneticSettings {
    fn default() -> Self {
        Self {
            population_size: 100,
            n_generations: 200,
            tournament_size: 5,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            smart_mutation_rate: 0.1,
            n_elites: 2,
            n_stall_generations: 30,
            transition_penalty: Gbp(0.001),
            seed: 42,
        }
    }
}

impl GeneticSettings {
    pub fn validate(self) -> Result<Self> {
        ensure!(self.population_size >= 2, "population must have at least 2 chromosomes");
        ensure!(self.tournament_size >= 1, "tournament must have at least 1 participant");
        ensure!(
            self.n_elites < self.population_size,
            "elite count must be less than the population size",
        );
        for (name, rate) in [
            ("crossover", self.crossover_rate),
            ("mutation", self.mutation_rate),
            ("smart mutation", self.smart_mutation_rate),
        ] {
            ensure!((0.0..=1.0).contains(&rate), "{name} rate must be within [0, 1], got {rate}");
        }
        ensure!(!self.transition_penalty.is_negative(), "transition penalty must not be negative");
        Ok(self)
    }
}

/// Genetic algorithm over whole-day mode sequences.
///
/// Always yields a valid plan, possibly not the optimal one.
#[must_use]
#[derive(Builder)]
pub struct GeneticOptimizer {
    battery: Battery,

    #[builder(default)]
    settings: GeneticSettings,
}

impl PlanOptimizer for GeneticOptimizer {
    fn name(&self) -> &'static str {
        "genetic"
    }

    #[instrument(skip_all, name = "genetic", fields(%date, seed = self.settings.seed))]
    fn create_charge_plan(
        &self,
        mut segments: Vec<TimeSegment>,
        date: NaiveDate,
    ) -> Result<Vec<TimeSegment>> {
        let settings = self.settings.validate()?;
        if segments.is_empty() {
            return Ok(segments);
        }
        let start_instant = Instant::now();
        let mut rng = Rng::with_seed(settings.seed);
        let evaluator = Evaluator {
            segments: &segments,
            battery: &self.battery,
            transition_penalty: settings.transition_penalty,
        };

        let mut population = self.initial_population(&mut rng, &evaluator, segments.len());
        let mut best: Option<Chromosome> = None;
        let mut n_stalled = 0;
        let mut n_generations = 0;

        for generation in 0..settings.n_generations {
            population.sort();
            let fittest = &population[0];
            if best.as_ref().is_none_or(|best| fittest.fitness < best.fitness) {
                trace!(generation, fitness = %fittest.fitness, "improved");
                best = Some(fittest.clone());
                n_stalled = 0;
            } else {
                n_stalled += 1;
                if n_stalled >= settings.n_stall_generations {
                    debug!(generation, "no improvement, stopping early");
                    break;
                }
            }
            population = self.next_generation(&mut rng, &evaluator, &population);
            n_generations += 1;
        }

        let best = population
            .into_iter()
            .chain(best)
            .min()
            .context("the population is empty")?;
        for (segment, gene) in segments.iter_mut().zip(best.genes) {
            segment.mode = gene;
        }
        self.battery.simulate_all(&mut segments);

        info!(
            elapsed = ?start_instant.elapsed(),
            n_generations,
            fitness = %best.fitness,
            "optimized",
        );
        Ok(segments)
    }
}

impl GeneticOptimizer {
    /// Seed the population: a third random, a third greedy, the rest solar-only.
    ///
    /// The first random slot is the all-discharge baseline so that the result is never worse.
    fn initial_population(
        &self,
        rng: &mut Rng,
        evaluator: &Evaluator,
        n_genes: usize,
    ) -> Vec<Chromosome> {
        let size = self.settings.population_size;
        let third = size / 3;
        let mut population = Vec::with_capacity(size);

        population.push(evaluator.evaluate(vec![OutputsMode::Discharge; n_genes]));
        while population.len() < third.max(1) {
            let genes = (0..n_genes).map(|_| random_gene(rng)).collect();
            population.push(evaluator.evaluate(genes));
        }
        while population.len() < third.max(1) + third {
            population.push(evaluator.evaluate(greedy_genes(rng, n_genes)));
        }
        while population.len() < size {
            population.push(evaluator.evaluate(vec![OutputsMode::ChargeSolarOnly; n_genes]));
        }
        population
    }

    /// Breed the next generation from the sorted population.
    fn next_generation(
        &self,
        rng: &mut Rng,
        evaluator: &Evaluator,
        population: &[Chromosome],
    ) -> Vec<Chromosome> {
        let settings = &self.settings;
        let mut next = Vec::with_capacity(settings.population_size);
        next.extend_from_slice(&population[..settings.n_elites]);

        while next.len() < settings.population_size {
            let parent_1 = tournament(rng, population, settings.tournament_size);
            let parent_2 = tournament(rng, population, settings.tournament_size);
            let (mut child_1, mut child_2) = if rng.f64() < settings.crossover_rate {
                crossover(rng, &parent_1.genes, &parent_2.genes)
            } else {
                (parent_1.genes.clone(), parent_2.genes.clone())
            };
            for child in [&mut child_1, &mut child_2] {
                mutate(rng, child, settings.mutation_rate);
                if rng.f64() < settings.smart_mutation_rate {
                    smart_mutate(rng, child);
                }
            }
            next.push(evaluator.evaluate(child_1));
            if next.len() < settings.population_size {
                next.push(evaluator.evaluate(child_2));
            }
        }

        next
    }
}

/// Pick the fittest of a few random chromosomes.
fn tournament<'a>(rng: &mut Rng, population: &'a [Chromosome], size: usize) -> &'a Chromosome {
    let mut winner = &population[rng.usize(..population.len())];
    for _ in 1..size {
        let candidate = &population[rng.usize(..population.len())];
        if candidate.fitness < winner.fitness {
            winner = candidate;
        }
    }
    winner
}

/// Charge at night, discharge at the evening peak, and mix solar-only and discharge elsewhere.
fn greedy_genes(rng: &mut Rng, n_genes: usize) -> Vec<OutputsMode> {
    (0..n_genes)
        .map(|index| {
            if NIGHT.contains(&index) {
                OutputsMode::ChargeFromGridAndSolar
            } else if PEAK.contains(&index) || rng.bool() {
                OutputsMode::Discharge
            } else {
                OutputsMode::ChargeSolarOnly
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::plan::{baseline_cost, total_cost},
        quantity::energy::Kwh,
        testing::{battery, flat_day, sunny_day},
    };

    fn optimizer(settings: GeneticSettings) -> Result<GeneticOptimizer> {
        Ok(GeneticOptimizer::builder().battery(battery(10.0, 2.0)?).settings(settings).build())
    }

    #[test]
    fn never_worse_than_baseline() -> Result {
        let battery = battery(10.0, 2.0)?;
        for day in [flat_day(), sunny_day()] {
            let segments =
                optimizer(GeneticSettings::default())?.create_charge_plan(day, NaiveDate::MIN)?;
            assert_eq!(segments.len(), 48);
            assert!(total_cost(&segments) <= baseline_cost(&segments, &battery) + Gbp(1e-9));
        }
        Ok(())
    }

    #[test]
    fn improves_on_sunny_day() -> Result {
        let battery = battery(10.0, 2.0)?;
        let segments =
            optimizer(GeneticSettings::default())?.create_charge_plan(sunny_day(), NaiveDate::MIN)?;
        assert!(total_cost(&segments) < baseline_cost(&segments, &battery));
        Ok(())
    }

    #[test]
    fn deterministic_with_seed() -> Result {
        let settings = GeneticSettings { n_generations: 20, ..GeneticSettings::default() };
        let first = optimizer(settings)?.create_charge_plan(sunny_day(), NaiveDate::MIN)?;
        let second = optimizer(settings)?.create_charge_plan(sunny_day(), NaiveDate::MIN)?;
        assert!(first.iter().zip(&second).all(|(lhs, rhs)| lhs.mode == rhs.mode));
        Ok(())
    }

    #[test]
    fn plan_is_chained() -> Result {
        let mut day = sunny_day();
        day[0].start_battery_charge = Kwh(4.0);
        let settings = GeneticSettings { n_generations: 10, ..GeneticSettings::default() };
        let segments = optimizer(settings)?.create_charge_plan(day, NaiveDate::MIN)?;
        assert_eq!(segments[0].start_battery_charge, Kwh(4.0));
        for (previous, next) in segments.iter().zip(&segments[1..]) {
            assert_eq!(previous.end_battery_charge(), next.start_battery_charge);
        }
        Ok(())
    }

    #[test]
    fn rejects_invalid_settings() -> Result {
        let settings = GeneticSettings { n_elites: 100, ..GeneticSettings::default() };
        assert!(optimizer(settings)?.create_charge_plan(flat_day(), NaiveDate::MIN).is_err());
        let settings = GeneticSettings { mutation_rate: 1.5, ..GeneticSettings::default() };
        assert!(optimizer(settings)?.create_charge_plan(flat_day(), NaiveDate::MIN).is_err());
        Ok(())
    }

    #[test]
    fn initial_population_layout() -> Result {
        let optimizer = optimizer(GeneticSettings::default())?;
        let segments = sunny_day();
        let battery = battery(10.0, 2.0)?;
        let evaluator =
            Evaluator { segments: &segments, battery: &battery, transition_penalty: Gbp::ZERO };
        let population = optimizer.initial_population(&mut Rng::with_seed(1), &evaluator, 48);
        assert_eq!(population.len(), 100);
        assert!(population[0].genes.iter().all(|gene| *gene == OutputsMode::Discharge));
        assert!(
            population[33].genes[..10]
                .iter()
                .all(|gene| *gene == OutputsMode::ChargeFromGridAndSolar)
        );
        assert!(population[66..].iter().all(|chromosome| {
            chromosome.genes.iter().all(|gene| *gene == OutputsMode::ChargeSolarOnly)
        }));
        Ok(())
    }
}
