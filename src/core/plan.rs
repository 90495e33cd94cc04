use crate::{
    core::{battery::Battery, outputs_mode::OutputsMode, time_segment::TimeSegment},
    prelude::*,
    quantity::{currency::Gbp, energy::Kwh},
};

/// Final charge plan for a day.
#[must_use]
#[derive(Debug)]
pub struct Plan {
    pub segments: Vec<TimeSegment>,
    pub summary: Summary,
}

impl Plan {
    /// Summarize the simulated segments against the all-[`OutputsMode::Discharge`] baseline.
    pub fn new(segments: Vec<TimeSegment>, battery: &Battery) -> Self {
        let summary = Summary {
            total_cost: total_cost(&segments),
            baseline_cost: baseline_cost(&segments, battery),
            grid_usage: segments.iter().map(|segment| segment.actual_grid_usage).sum(),
            wasted_solar: segments.iter().map(|segment| segment.wasted_solar_generation).sum(),
        };
        Self { segments, summary }
    }

    pub fn trace(&self) {
        for segment in &self.segments {
            info!(
                segment = %segment.segment,
                mode = %segment.mode,
                price = %segment.grid_price,
                solar = %segment.expected_solar_generation,
                load = %segment.expected_consumption,
                start = %segment.start_battery_charge,
                end = %segment.end_battery_charge(),
                grid = %segment.actual_grid_usage,
                wasted = %segment.wasted_solar_generation,
                cost = %segment.cost(),
                "step",
            );
        }
        info!(
            total_cost = %self.summary.total_cost,
            baseline_cost = %self.summary.baseline_cost,
            saving = %self.summary.saving(),
            grid_usage = %self.summary.grid_usage,
            wasted_solar = %self.summary.wasted_solar,
            "summary",
        );
    }
}

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Summary {
    pub total_cost: Gbp,

    /// Cost of simply discharging all day long, which is what the battery does on its own.
    pub baseline_cost: Gbp,

    pub grid_usage: Kwh,
    pub wasted_solar: Kwh,
}

impl Summary {
    pub fn saving(&self) -> Gbp {
        self.baseline_cost - self.total_cost
    }
}

/// Sum of the segment costs.
pub fn total_cost(segments: &[TimeSegment]) -> Gbp {
    segments.iter().map(TimeSegment::cost).sum()
}

/// Cost of the same day with every segment in [`OutputsMode::Discharge`].
pub fn baseline_cost(segments: &[TimeSegment], battery: &Battery) -> Gbp {
    let mut baseline = segments.to_vec();
    for segment in &mut baseline {
        segment.mode = OutputsMode::Discharge;
    }
    battery.simulate_all(&mut baseline);
    total_cost(&baseline)
}
