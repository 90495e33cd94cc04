mod battery;
mod forecast;
mod optimizer;
mod plan;

use clap::{Parser, Subcommand};

pub use self::plan::{compare, plan};
use crate::cli::{
    battery::BatteryArgs,
    forecast::ForecastArgs,
    optimizer::{OptimizerKind, TuningArgs},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: plan the day with the selected optimizer and log the schedule.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),

    /// Run every optimizer on the same input and compare the costs.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),
}

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(long, value_enum, default_value = "graph", env = "OPTIMIZER")]
    pub optimizer: OptimizerKind,

    #[clap(flatten)]
    pub forecast: ForecastArgs,

    #[clap(flatten)]
    pub battery: BatteryArgs,

    #[clap(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub forecast: ForecastArgs,

    #[clap(flatten)]
    pub battery: BatteryArgs,

    #[clap(flatten)]
    pub tuning: TuningArgs,
}
