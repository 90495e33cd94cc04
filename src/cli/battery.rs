//! Battery-related CLI arguments.

use clap::Parser;

use crate::{core::battery::Battery, prelude::*, quantity::energy::Kwh};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct BatteryArgs {
    /// Usable battery capacity in kilowatt-hours.
    #[clap(long = "battery-capacity", default_value = "10", env = "BATTERY_CAPACITY")]
    pub capacity: Kwh,

    /// Maximum energy taken from the grid within a half-hour, in kilowatt-hours.
    #[clap(long, default_value = "2", env = "GRID_CHARGE_PER_SEGMENT")]
    pub grid_charge_per_segment: Kwh,

    /// Battery charge at the start of the day, in kilowatt-hours.
    #[clap(long, default_value = "0", env = "INITIAL_CHARGE")]
    pub initial_charge: Kwh,
}

impl BatteryArgs {
    pub fn battery(&self) -> Result<Battery> {
        Battery::builder()
            .capacity(self.capacity)
            .grid_charge_per_segment(self.grid_charge_per_segment)
            .build()
    }
}
