use crate::{
    cli::{
        CompareArgs,
        PlanArgs,
        battery::BatteryArgs,
        forecast::ForecastArgs,
        optimizer::{OptimizerKind, TuningArgs},
    },
    core::plan::Plan,
    forecast::{PriceSource, WithFallback},
    planner::ChargePlanner,
    prelude::*,
};

#[instrument(skip_all)]
pub fn plan(args: &PlanArgs) -> Result {
    let plan = run(&args.forecast, &args.battery, &args.tuning, &[args.optimizer])?
        .pop()
        .context("the optimizer produced no plan")?;
    plan.trace();
    Ok(())
}

#[instrument(skip_all)]
pub fn compare(args: &CompareArgs) -> Result {
    let plans = run(&args.forecast, &args.battery, &args.tuning, &OptimizerKind::ALL)?;
    for (kind, plan) in OptimizerKind::ALL.into_iter().zip(&plans) {
        info!(
            optimizer = ?kind,
            total_cost = %plan.summary.total_cost,
            baseline_cost = %plan.summary.baseline_cost,
            saving = %plan.summary.saving(),
            grid_usage = %plan.summary.grid_usage,
            wasted_solar = %plan.summary.wasted_solar,
            "compared",
        );
    }
    Ok(())
}

/// Plan the same day with each of the optimizers.
fn run(
    forecast_args: &ForecastArgs,
    battery_args: &BatteryArgs,
    tuning: &TuningArgs,
    kinds: &[OptimizerKind],
) -> Result<Vec<Plan>> {
    let date = forecast_args.date();
    let battery = battery_args.battery()?;
    let mut forecast = forecast_args.read()?;
    let average_prices = forecast.average_prices.take();
    let fallback;
    let prices: &dyn PriceSource = if let Some(average_prices) = average_prices {
        fallback = WithFallback { primary: &forecast, fallback: average_prices };
        &fallback
    } else {
        &forecast
    };
    let planner = ChargePlanner::builder()
        .solar(&forecast)
        .load(&forecast)
        .prices(prices)
        .battery(battery)
        .build();
    kinds
        .iter()
        .map(|kind| {
            let optimizer = tuning.build(*kind, battery);
            planner.plan(optimizer.as_ref(), date, battery_args.initial_charge)
        })
        .collect()
}
