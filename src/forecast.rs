//! Per-segment inputs of the planner.
//!
//! Forecasting itself happens elsewhere: the planner only asks these collaborators for numbers.

mod file;
mod price_curve;

use chrono::NaiveDate;

pub use self::{
    file::ForecastFile,
    price_curve::{PriceCurve, WithFallback},
};
use crate::{
    core::segment::HalfHourSegment,
    prelude::*,
    quantity::{energy::Kwh, rate::ElectricityRate},
};

pub trait SolarForecast {
    /// Expected solar generation within the segment.
    fn solar_generation(&self, day_of_year: u32, segment: HalfHourSegment) -> Result<Kwh>;
}

pub trait LoadForecast {
    /// Expected household consumption within the segment.
    fn consumption(&self, day_of_year: u32, segment: HalfHourSegment) -> Result<Kwh>;
}

pub trait PriceSource {
    /// Grid import price for the segment, or `None` if the source does not know it.
    fn grid_price(
        &self,
        date: NaiveDate,
        segment: HalfHourSegment,
    ) -> Result<Option<ElectricityRate>>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn grid_price(
        &self,
        date: NaiveDate,
        segment: HalfHourSegment,
    ) -> Result<Option<ElectricityRate>> {
        (**self).grid_price(date, segment)
    }
}
