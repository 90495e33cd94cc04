mod memo;

use std::time::Instant;

use bon::Builder;
use chrono::NaiveDate;

use self::memo::{Decision, Memo};
use crate::{
    core::{
        battery::Battery,
        energy_level::{EnergyLevel, Quantum},
        outputs_mode::OutputsMode,
        plan::total_cost,
        time_segment::TimeSegment,
    },
    optimizer::PlanOptimizer,
    prelude::*,
    quantity::{currency::Gbp, energy::Kwh},
};

/// [Dynamic programming][1] with backward induction over `(segment, battery level)` states.
///
/// Works backwards from the end of the day, memoizing the best mode and the cost-to-go for every
/// battery level at the start of every segment. Then, walks forward from the actual initial charge,
/// following the memoized decisions and carrying the exact (not rounded) charge.
///
/// [1]: https://en.wikipedia.org/wiki/Dynamic_programming
#[must_use]
#[derive(Builder)]
pub struct DynamicOptimizer {
    battery: Battery,

    /// Rounding granularity of the memo table.
    quantum: Quantum,
}

impl PlanOptimizer for DynamicOptimizer {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    #[instrument(skip_all, name = "dynamic", fields(%date, quantum = ?self.quantum))]
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
        let initial_charge = first.start_battery_charge;
        let max_level = quantum.max_level(self.battery.capacity());
        info!(?max_level, n_segments = segments.len(), "optimizing…");

        let mut memo = Memo::new(segments.len(), max_level);
        let mut n_fallbacks = 0_usize;

        // Going backwards:
        for segment_index in (0..segments.len()).rev() {
            for energy_level in max_level.iter_from_zero() {
                let (decision, is_fallback) =
                    self.decide(&segments, segment_index, energy_level, quantum, &memo);
                n_fallbacks += usize::from(is_fallback);
                *memo.get_mut(segment_index, energy_level) = Some(decision);
            }
        }
        if n_fallbacks != 0 {
            debug!(n_fallbacks, "estimated some tails with the discharge-only fallback");
        }

        // Going forward with the exact charge:
        let mut charge = initial_charge;
        for segment_index in 0..segments.len() {
            let energy_level = quantum.quantize(charge).min(max_level);
            let decision = memo.get(segment_index, energy_level).with_context(|| {
                format!("no decision memoized for segment #{segment_index} at {energy_level:?}")
            })?;
            let segment = &mut segments[segment_index];
            segment.mode = decision.mode;
            segment.start_battery_charge = charge;
            self.battery.simulate(segment);
            charge = segment.end_battery_charge();
        }

        let expected_cost = memo
            .get(0, quantum.quantize(initial_charge).min(max_level))
            .map(|decision| decision.cost_to_go);
        info!(
            elapsed = ?start_instant.elapsed(),
            ?expected_cost,
            actual_cost = %total_cost(&segments),
            "optimized",
        );
        Ok(segments)
    }
}

impl DynamicOptimizer {
    /// Pick the mode minimizing the immediate cost plus the memoized cost-to-go.
    ///
    /// # Returns
    ///
    /// The decision, and whether any successor state was missing from the memo.
    fn decide(
        &self,
        segments: &[TimeSegment],
        segment_index: usize,
        energy_level: EnergyLevel,
        quantum: Quantum,
        memo: &Memo,
    ) -> (Decision, bool) {
        let mut segment = segments[segment_index].clone();
        segment.start_battery_charge = energy_level.dequantize(quantum);

        let mut best = Decision { mode: OutputsMode::Discharge, cost_to_go: Gbp::MAX };
        let mut is_fallback = false;

        for mode in OutputsMode::ALL {
            segment.mode = mode;
            self.battery.simulate(&mut segment);
            let next_index = segment_index + 1;
            let tail_cost = if next_index == segments.len() {
                Gbp::ZERO
            } else if let Some(next) =
                memo.get(next_index, quantum.quantize(segment.end_battery_charge()))
            {
                next.cost_to_go
            } else {
                is_fallback = true;
                self.estimate_tail(&segments[next_index..], segment.end_battery_charge())
            };
            let cost_to_go = segment.cost() + tail_cost;
            if cost_to_go < best.cost_to_go {
                best = Decision { mode, cost_to_go };
            }
        }

        (best, is_fallback)
    }

    /// Estimate the cost of the remaining segments by discharging all the way.
    ///
    /// This is an approximation and not necessarily the optimal tail.
    fn estimate_tail(&self, segments: &[TimeSegment], charge: Kwh) -> Gbp {
        let mut tail = segments.to_vec();
        for segment in &mut tail {
            segment.mode = OutputsMode::Discharge;
        }
        if let Some(first) = tail.first_mut() {
            first.start_battery_charge = charge;
        }
        self.battery.simulate_all(&mut tail);
        total_cost(&tail)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::plan::baseline_cost,
        optimizer::GraphOptimizer,
        testing::{battery, flat_day, segment, sunny_day},
    };

    fn optimizer(capacity: f64, step: f64) -> Result<DynamicOptimizer> {
        Ok(DynamicOptimizer::builder()
            .battery(battery(capacity, 2.0)?)
            .quantum(Quantum(Kwh(step)))
            .build())
    }

    #[test]
    fn flat_price_costs_the_same() -> Result {
        let segments = optimizer(10.0, 0.5)?.create_charge_plan(flat_day(), NaiveDate::MIN)?;
        assert_abs_diff_eq!(total_cost(&segments).0, 4.8, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn beats_baseline() -> Result {
        let battery = battery(10.0, 2.0)?;
        let segments = optimizer(10.0, 0.5)?.create_charge_plan(sunny_day(), NaiveDate::MIN)?;
        assert!(total_cost(&segments) < baseline_cost(&segments, &battery));
        Ok(())
    }

    #[test]
    fn agrees_with_graph_on_same_granularity() -> Result {
        let battery = battery(10.0, 2.0)?;
        let quantum = Quantum(Kwh(0.5));
        let mut day = sunny_day();
        day[0].start_battery_charge = Kwh(1.5);

        let dynamic = DynamicOptimizer::builder()
            .battery(battery)
            .quantum(quantum)
            .build()
            .create_charge_plan(day.clone(), NaiveDate::MIN)?;
        let graph = GraphOptimizer::builder()
            .battery(battery)
            .quantum(quantum)
            .build()
            .create_charge_plan(day, NaiveDate::MIN)?;
        assert_abs_diff_eq!(total_cost(&dynamic).0, total_cost(&graph).0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn carries_exact_charge() -> Result {
        let mut day = sunny_day();
        day[0].start_battery_charge = Kwh(2.2);
        let segments = optimizer(10.0, 0.5)?.create_charge_plan(day, NaiveDate::MIN)?;
        assert_eq!(segments[0].start_battery_charge, Kwh(2.2));
        for (previous, next) in segments.iter().zip(&segments[1..]) {
            assert_eq!(previous.end_battery_charge(), next.start_battery_charge);
        }
        Ok(())
    }

    /// With 9.8 kWh and 0.5 kWh steps, a full battery rounds to an unmemoized level.
    #[test]
    fn falls_back_beyond_memo() -> Result {
        let optimizer = optimizer(9.8, 0.5)?;
        let quantum = Quantum(Kwh(0.5));
        let max_level = quantum.max_level(Kwh(9.8));
        let segments = vec![segment(0, 5.0, 0.0, 0.2), segment(1, 0.0, 1.0, 0.2)];

        let mut memo = Memo::new(segments.len(), max_level);
        for energy_level in max_level.iter_from_zero() {
            let (decision, _) = optimizer.decide(&segments, 1, energy_level, quantum, &memo);
            *memo.get_mut(1, energy_level) = Some(decision);
        }
        let (_, is_fallback) = optimizer.decide(&segments, 0, max_level, quantum, &memo);
        assert!(is_fallback);

        let segments = optimizer.create_charge_plan(segments, NaiveDate::MIN)?;
        assert_abs_diff_eq!(total_cost(&segments).0, 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn estimate_tail_discharges() -> Result {
        let optimizer = optimizer(10.0, 0.5)?;
        let tail = optimizer.estimate_tail(&flat_day()[40..], Kwh(1.0));

        // 8 segments of 0.5 kWh, the first 2 are covered by the battery:
        assert_abs_diff_eq!(tail.0, 6.0 * 0.5 * 0.2, epsilon = 1e-9);
        Ok(())
    }
}
