use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{forecast::ForecastFile, prelude::*};

#[derive(Parser)]
pub struct ForecastArgs {
    /// TOML file with the solar, load and price forecast of the day.
    #[clap(long = "forecast", default_value = "forecast.toml", env = "FORECAST_PATH")]
    pub path: PathBuf,

    /// Day to plan, today by default.
    #[clap(long, env = "PLAN_DATE")]
    pub date: Option<NaiveDate>,
}

impl ForecastArgs {
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn read(&self) -> Result<ForecastFile> {
        ForecastFile::read_from(&self.path)
    }
}
