//! Optimizer selection and tuning.

use clap::{Parser, ValueEnum};

use crate::{
    core::{battery::Battery, energy_level::Quantum},
    optimizer::{DynamicOptimizer, GeneticOptimizer, GeneticSettings, GraphOptimizer, PlanOptimizer},
    quantity::currency::Gbp,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OptimizerKind {
    /// Shortest path over the discretized battery levels.
    Graph,

    /// Backward induction with a memo table.
    Dynamic,

    /// Genetic algorithm over whole-day mode sequences.
    Genetic,
}

impl OptimizerKind {
    pub const ALL: [Self; 3] = [Self::Graph, Self::Dynamic, Self::Genetic];
}

#[derive(Parser)]
pub struct TuningArgs {
    /// Battery level step of the graph optimizer, in kilowatt-hours.
    #[clap(long, default_value = "0.1", env = "GRAPH_STEP")]
    pub graph_step: Quantum,

    /// Battery level step of the dynamic programming optimizer, in kilowatt-hours.
    #[clap(long, default_value = "0.5", env = "DP_STEP")]
    pub dp_step: Quantum,

    #[clap(flatten)]
    pub genetic: GeneticArgs,
}

impl TuningArgs {
    pub fn build(&self, kind: OptimizerKind, battery: Battery) -> Box<dyn PlanOptimizer> {
        match kind {
            OptimizerKind::Graph => {
                Box::new(GraphOptimizer::builder().battery(battery).quantum(self.graph_step).build())
            }
            OptimizerKind::Dynamic => Box::new(
                DynamicOptimizer::builder().battery(battery).quantum(self.dp_step).build(),
            ),
            OptimizerKind::Genetic => Box::new(
                GeneticOptimizer::builder()
                    .battery(battery)
                    .settings(GeneticSettings::from(&self.genetic))
                    .build(),
            ),
        }
    }
}

#[derive(Parser)]
pub struct GeneticArgs {
    #[clap(long = "ga-population-size", default_value = "100", env = "GA_POPULATION_SIZE")]
    pub population_size: usize,

    #[clap(long = "ga-generations", default_value = "200", env = "GA_GENERATIONS")]
    pub n_generations: usize,

    #[clap(long = "ga-tournament-size", default_value = "5", env = "GA_TOURNAMENT_SIZE")]
    pub tournament_size: usize,

    #[clap(long = "ga-crossover-rate", default_value = "0.8", env = "GA_CROSSOVER_RATE")]
    pub crossover_rate: f64,

    /// Per-gene mutation probability.
    #[clap(long = "ga-mutation-rate", default_value = "0.02", env = "GA_MUTATION_RATE")]
    pub mutation_rate: f64,

    /// Per-child probability of writing a charge-and-release or a harvest pattern.
    #[clap(
        long = "ga-smart-mutation-rate",
        default_value = "0.1",
        env = "GA_SMART_MUTATION_RATE"
    )]
    pub smart_mutation_rate: f64,

    #[clap(long = "ga-elites", default_value = "2", env = "GA_ELITES")]
    pub n_elites: usize,

    /// Stop after this many generations without improvement.
    #[clap(long = "ga-stall-generations", default_value = "30", env = "GA_STALL_GENERATIONS")]
    pub n_stall_generations: usize,

    /// Fitness penalty in pounds per charge-discharge switch.
    #[clap(
        long = "ga-transition-penalty",
        default_value = "0.001",
        env = "GA_TRANSITION_PENALTY"
    )]
    pub transition_penalty: Gbp,

    #[clap(long = "ga-seed", default_value = "42", env = "GA_SEED")]
    pub seed: u64,
}

impl From<&GeneticArgs> for GeneticSettings {
    fn from(args: &GeneticArgs) -> Self {
        Self {
            population_size: args.population_size,
            n_generations: args.n_generations,
            tournament_size: args.tournament_size,
            crossover_rate: args.crossover_rate,
            mutation_rate: args.mutation_rate,
            smart_mutation_rate: args.smart_mutation_rate,
            n_elites: args.n_elites,
            n_stall_generations: args.n_stall_generations,
            transition_penalty: args.transition_penalty,
            seed: args.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::cli::Args;

    #[test]
    fn cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_settings() {
        let args = GeneticArgs::parse_from(["genetic"]);
        let settings = GeneticSettings::from(&args);
        let defaults = GeneticSettings::default();
        assert_eq!(settings.population_size, defaults.population_size);
        assert_eq!(settings.n_generations, defaults.n_generations);
        assert_eq!(settings.n_stall_generations, defaults.n_stall_generations);
        assert_eq!(settings.transition_penalty, defaults.transition_penalty);
        assert_eq!(settings.seed, defaults.seed);
    }
}
