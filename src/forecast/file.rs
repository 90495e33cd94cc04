use std::{fmt::Debug, fs, path::Path, str::FromStr};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    core::segment::{HalfHourSegment, N_SEGMENTS},
    forecast::{LoadForecast, PriceCurve, PriceSource, SolarForecast},
    prelude::*,
    quantity::{energy::Kwh, rate::ElectricityRate},
};

/// Single-day forecast stored in a TOML file:
///
/// ```toml
/// average_prices = [0.25, 0.25, …] # optional, 48 values
///
/// [[segments]]
/// solar = 0.0
/// load = 0.4
/// price = 0.08 # optional
/// ```
#[must_use]
#[derive(Debug, Deserialize)]
pub struct ForecastFile {
    pub segments: Vec<SegmentForecast>,

    /// Typical prices to fall back to when a segment has none.
    #[serde(default)]
    pub average_prices: Option<PriceCurve>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct SegmentForecast {
    pub solar: Kwh,
    pub load: Kwh,

    #[serde(default)]
    pub price: Option<ElectricityRate>,
}

impl FromStr for ForecastFile {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let this: Self = toml::from_str(text)?;
        ensure!(
            this.segments.len() == N_SEGMENTS,
            "expected {N_SEGMENTS} segments, got {}",
            this.segments.len(),
        );
        Ok(this)
    }
}

impl ForecastFile {
    #[instrument(skip_all, fields(?path))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let this = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?
            .parse::<Self>()
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(has_average_prices = this.average_prices.is_some(), "loaded the forecast");
        Ok(this)
    }

    fn get(&self, segment: HalfHourSegment) -> Result<&SegmentForecast> {
        self.segments
            .get(segment.index())
            .with_context(|| format!("the forecast file has no segment {segment}"))
    }
}

impl SolarForecast for ForecastFile {
    fn solar_generation(&self, _day_of_year: u32, segment: HalfHourSegment) -> Result<Kwh> {
        Ok(self.get(segment)?.solar)
    }
}

impl LoadForecast for ForecastFile {
    fn consumption(&self, _day_of_year: u32, segment: HalfHourSegment) -> Result<Kwh> {
        Ok(self.get(segment)?.load)
    }
}

impl PriceSource for ForecastFile {
    fn grid_price(
        &self,
        _date: NaiveDate,
        segment: HalfHourSegment,
    ) -> Result<Option<ElectricityRate>> {
        Ok(self.get(segment)?.price)
    }
}
