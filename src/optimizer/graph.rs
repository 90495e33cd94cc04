use std::{cmp::Reverse, collections::BinaryHeap, time::Instant};

use bon::Builder;
use chrono::NaiveDate;

use crate::{
    core::{
        battery::Battery,
        energy_level::{EnergyLevel, Quantum},
        outputs_mode::OutputsMode,
        time_segment::TimeSegment,
    },
    optimizer::PlanOptimizer,
    prelude::*,
    quantity::{currency::Gbp, energy::Kwh},
};

/// Shortest path over the layered graph of `(segment, battery level)` states.
///
/// Layer `i` holds the states at the start of segment `i`, and the extra final layer holds the
/// states at the end of the day. Every state has one outgoing edge per [`OutputsMode`], weighted
/// by the simulated segment cost.
#[must_use]
#[derive(Builder)]
pub struct GraphOptimizer {
    battery: Battery,

    /// Battery level step of the state space.
    quantum: Quantum,
}

/// Search state: the battery level at the start of the segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct GraphNode {
    pub segment_index: usize,
    pub battery_step: EnergyLevel,
}

/// Scored transition produced by simulating one mode for one segment.
#[derive(Copy, Clone, Debug)]
pub struct GraphEdge {
    pub from: GraphNode,
    pub to: GraphNode,
    pub mode: OutputsMode,
    pub cost: Gbp,
    pub grid_usage: Kwh,
    pub wasted_solar: Kwh,
}

impl PlanOptimizer for GraphOptimizer {
    fn name(&self) -> &'static str {
        "graph"
    }

    #[instrument(skip_all, name = "graph", fields(%date, quantum = ?self.quantum))]
    fn create_charge_plan(
        &self,
        mut segments: Vec<TimeSegment>,
        date: NaiveDate,
    ) -> Result<Vec<TimeSegment>> {
        let quantum = self.quantum.validate()?;
        let Some(first) = segments.first() else {
            return Ok(segments);
        };
        let start_instant = Instant::now();
        let max_level = quantum.max_level(self.battery.capacity());
        let start = GraphNode {
            segment_index: 0,
            battery_step: quantum.quantize(first.start_battery_charge).min(max_level),
        };
        info!(?max_level, n_segments = segments.len(), "searching…");

        let mut space = SearchSpace::new(segments.len() + 1, max_level);
        space.set(start, Gbp::ZERO, None);
        let mut queue = BinaryHeap::from([Reverse((Gbp::ZERO, start))]);
        let mut n_expanded = 0_usize;

        while let Some(Reverse((distance, node))) = queue.pop() {
            if distance > space.distance(node) {
                // Already reached this node cheaper:
                continue;
            }
            if node.segment_index == segments.len() {
                // The end of the day, nothing to expand:
                continue;
            }
            n_expanded += 1;
            for edge in self.edges(&segments[node.segment_index], node, quantum, max_level) {
                let candidate = distance + edge.cost;
                if candidate < space.distance(edge.to) {
                    space.set(edge.to, candidate, Some(edge));
                    queue.push(Reverse((candidate, edge.to)));
                }
            }
        }

        let final_layer = segments.len();
        let (cost, end) = max_level
            .iter_from_zero()
            .map(|battery_step| GraphNode { segment_index: final_layer, battery_step })
            .filter(|node| space.is_reached(*node))
            .map(|node| (space.distance(node), node))
            .min_by_key(|(cost, _)| *cost)
            .with_context(|| format!("no path reaches the final layer ({final_layer})"))?;
        debug!(%cost, ?end, n_expanded, "found the cheapest end state");

        let path = space.backtrack(end)?;
        debug!(
            grid_usage = %path.iter().map(|edge| edge.grid_usage).sum::<Kwh>(),
            wasted_solar = %path.iter().map(|edge| edge.wasted_solar).sum::<Kwh>(),
            "backtracked",
        );
        for edge in path {
            segments[edge.from.segment_index].mode = edge.mode;
        }
        self.battery.simulate_all(&mut segments);

        info!(elapsed = ?start_instant.elapsed(), n_expanded, "optimized");
        Ok(segments)
    }
}

impl GraphOptimizer {
    /// Simulate every mode for the segment starting at the node's battery level.
    fn edges(
        &self,
        segment: &TimeSegment,
        from: GraphNode,
        quantum: Quantum,
        max_level: EnergyLevel,
    ) -> impl Iterator<Item = GraphEdge> {
        let battery = self.battery;
        let mut segment = segment.clone();
        segment.start_battery_charge = from.battery_step.dequantize(quantum);
        OutputsMode::ALL.into_iter().map(move |mode| {
            segment.mode = mode;
            battery.simulate(&mut segment);
            GraphEdge {
                from,
                to: GraphNode {
                    segment_index: from.segment_index + 1,
                    battery_step: quantum.quantize(segment.end_battery_charge()).min(max_level),
                },
                mode,
                cost: segment.cost(),
                grid_usage: segment.actual_grid_usage,
                wasted_solar: segment.wasted_solar_generation,
            }
        })
    }
}

/// Distances and back-pointers, flattened over `(layer, battery level)`.
struct SearchSpace {
    n_levels: usize,
    distances: Vec<Gbp>,
    previous: Vec<Option<GraphEdge>>,
    reached: Vec<bool>,
}

impl SearchSpace {
    fn new(n_layers: usize, max_level: EnergyLevel) -> Self {
        let n_levels = max_level.0 + 1;
        Self {
            n_levels,
            distances: vec![Gbp::MAX; n_layers * n_levels],
            previous: vec![None; n_layers * n_levels],
            reached: vec![false; n_layers * n_levels],
        }
    }

    fn distance(&self, node: GraphNode) -> Gbp {
        self.distances[self.flat_index(node)]
    }

    fn is_reached(&self, node: GraphNode) -> bool {
        self.reached[self.flat_index(node)]
    }

    fn set(&mut self, node: GraphNode, distance: Gbp, edge: Option<GraphEdge>) {
        let flat_index = self.flat_index(node);
        self.distances[flat_index] = distance;
        self.previous[flat_index] = edge;
        self.reached[flat_index] = true;
    }

    /// Follow the back-pointers from the end node to the first layer.
    fn backtrack(&self, end: GraphNode) -> Result<Vec<GraphEdge>> {
        let mut path = Vec::with_capacity(end.segment_index);
        let mut node = end;
        while node.segment_index != 0 {
            let edge = self.previous[self.flat_index(node)]
                .with_context(|| format!("missing back-pointer at {node:?}"))?;
            path.push(edge);
            node = edge.from;
        }
        path.reverse();
        Ok(path)
    }

    fn flat_index(&self, node: GraphNode) -> usize {
        debug_assert!(node.battery_step.0 < self.n_levels);
        node.segment_index * self.n_levels + node.battery_step.0
    }
}
