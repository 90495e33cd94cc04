use std::time::Instant;

use bon::Builder;
use chrono::{Datelike, NaiveDate};

use crate::{
    core::{
        battery::Battery,
        plan::Plan,
        segment::{HalfHourSegment, N_SEGMENTS},
        time_segment::TimeSegment,
    },
    forecast::{LoadForecast, PriceSource, SolarForecast},
    optimizer::PlanOptimizer,
    prelude::*,
    quantity::energy::Kwh,
};

/// Gathers the forecasts for a day, runs an optimizer and finalizes the plan.
#[must_use]
#[derive(Builder)]
pub struct ChargePlanner<'a> {
    solar: &'a dyn SolarForecast,
    load: &'a dyn LoadForecast,
    prices: &'a dyn PriceSource,
    battery: Battery,
}

impl ChargePlanner<'_> {
    #[instrument(skip_all, fields(%date, optimizer = optimizer.name()))]
    pub fn plan(
        &self,
        optimizer: &dyn PlanOptimizer,
        date: NaiveDate,
        initial_charge: Kwh,
    ) -> Result<Plan> {
        let segments = self.build_segments(date, initial_charge)?;
        let start_instant = Instant::now();
        let mut segments = optimizer.create_charge_plan(segments, date)?;
        ensure!(
            segments.len() == N_SEGMENTS,
            "`{}` returned {} segments instead of {N_SEGMENTS}",
            optimizer.name(),
            segments.len(),
        );

        // Populate the final outputs from the exact initial charge:
        segments[0].start_battery_charge = initial_charge;
        self.battery.simulate_all(&mut segments);

        let plan = Plan::new(segments, &self.battery);
        info!(
            elapsed = ?start_instant.elapsed(),
            total_cost = %plan.summary.total_cost,
            saving = %plan.summary.saving(),
            "planned",
        );
        Ok(plan)
    }

    /// Query the forecasts for every segment of the day and validate them.
    ///
    /// # Errors
    ///
    /// Any negative or NaN forecast, missing price or out-of-range initial charge aborts the planning.
    #[instrument(skip_all, fields(%date, %initial_charge))]
    pub fn build_segments(&self, date: NaiveDate, initial_charge: Kwh) -> Result<Vec<TimeSegment>> {
        ensure!(
            initial_charge.is_finite_non_negative() && initial_charge <= self.battery.capacity(),
            "initial charge {initial_charge} is outside of [0, {}]",
            self.battery.capacity(),
        );
        let day_of_year = date.ordinal();

        let mut segments = HalfHourSegment::iter()
            .map(|segment| {
                let solar = self.solar.solar_generation(day_of_year, segment)?;
                ensure!(
                    solar.is_finite_non_negative(),
                    "invalid solar generation {solar} in {segment}",
                );
                let load = self.load.consumption(day_of_year, segment)?;
                ensure!(load.is_finite_non_negative(), "invalid consumption {load} in {segment}");
                let price = self
                    .prices
                    .grid_price(date, segment)?
                    .with_context(|| format!("no grid price for {date} {segment}"))?;
                Ok(TimeSegment::builder()
                    .segment(segment)
                    .expected_solar_generation(solar)
                    .expected_consumption(load)
                    .grid_price(price)
                    .build())
            })
            .collect::<Result<Vec<_>>>()?;
        segments[0].start_battery_charge = initial_charge;

        debug!(n_segments = segments.len(), "gathered the forecasts");
        Ok(segments)
    }
}
