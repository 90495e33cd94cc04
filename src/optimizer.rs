pub mod dynamic;
pub mod genetic;
pub mod graph;

use chrono::NaiveDate;

pub use self::{
    dynamic::DynamicOptimizer,
    genetic::{GeneticOptimizer, GeneticSettings},
    graph::GraphOptimizer,
};
use crate::{core::time_segment::TimeSegment, prelude::*};

/// Charge plan search strategy.
pub trait PlanOptimizer {
    fn name(&self) -> &'static str;

    /// Assign the lowest-cost mode sequence to the segments.
    ///
    /// The first segment's start battery charge is the initial charge. The returned segments are
    /// fully simulated, each one starting with the previous segment's end charge.
    fn create_charge_plan(
        &self,
        segments: Vec<TimeSegment>,
        date: NaiveDate,
    ) -> Result<Vec<TimeSegment>>;
}
