use bon::Builder;

use crate::{
    core::{outputs_mode::OutputsMode, segment::HalfHourSegment},
    quantity::{currency::Gbp, energy::Kwh, rate::ElectricityRate},
};

/// No residential battery holds this much; anything above is a simulator defect.
pub const SANITY_CEILING: Kwh = Kwh(30.0);

/// Forecast inputs, chosen mode and simulated outputs of a single half-hour segment.
#[must_use]
#[derive(Clone, Debug, Builder)]
pub struct TimeSegment {
    pub segment: HalfHourSegment,
    pub expected_solar_generation: Kwh,
    pub expected_consumption: Kwh,
    pub grid_price: ElectricityRate,

    #[builder(default)]
    pub mode: OutputsMode,

    #[builder(default)]
    pub start_battery_charge: Kwh,

    #[builder(skip)]
    end_battery_charge: Kwh,

    #[builder(skip)]
    pub wasted_solar_generation: Kwh,

    #[builder(skip)]
    pub actual_grid_usage: Kwh,
}

impl TimeSegment {
    pub const fn end_battery_charge(&self) -> Kwh {
        self.end_battery_charge
    }

    /// # Panics
    ///
    /// When the charge is negative or above [`SANITY_CEILING`].
    pub fn set_end_battery_charge(&mut self, charge: Kwh) {
        assert!(
            charge >= Kwh::ZERO && charge <= SANITY_CEILING,
            "end battery charge {charge:?} in {:?} is outside of the sane range",
            self.segment,
        );
        self.end_battery_charge = charge;
    }

    /// Energy actually billed by the grid.
    ///
    /// In [`OutputsMode::Discharge`], the load is offset by the solar and the battery
    /// contribution. The charging modes account for the split themselves.
    pub fn billed_grid_energy(&self) -> Kwh {
        match self.mode {
            OutputsMode::ChargeFromGridAndSolar | OutputsMode::ChargeSolarOnly => {
                self.actual_grid_usage
            }
            OutputsMode::Discharge => {
                let solar_used = self.expected_solar_generation - self.wasted_solar_generation;
                let battery_contribution = self.start_battery_charge - self.end_battery_charge;
                (self.expected_consumption - solar_used - battery_contribution).max(Kwh::ZERO)
            }
        }
    }

    /// Segment cost: billed grid energy plus the curtailed solar valued at the same rate.
    pub fn cost(&self) -> Gbp {
        self.billed_grid_energy() * self.grid_price + self.wasted_solar_generation * self.grid_price
    }
}
