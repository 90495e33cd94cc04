//! Shared test scenarios.

use crate::{
    core::{
        battery::Battery,
        segment::{HalfHourSegment, N_SEGMENTS},
        time_segment::TimeSegment,
    },
    prelude::*,
    quantity::{currency::Gbp, energy::Kwh, rate::ElectricityRate},
};

pub fn battery(capacity: f64, grid_charge_per_segment: f64) -> Result<Battery> {
    Battery::builder()
        .capacity(Kwh(capacity))
        .grid_charge_per_segment(Kwh(grid_charge_per_segment))
        .build()
}

pub fn segment(index: usize, solar: f64, load: f64, price: f64) -> TimeSegment {
    TimeSegment::builder()
        .segment(HalfHourSegment::try_from(index).unwrap())
        .expected_solar_generation(Kwh(solar))
        .expected_consumption(Kwh(load))
        .grid_price(ElectricityRate::from(Gbp(price)))
        .build()
}

/// No solar, constant 0.5 kWh load at £0.20/kWh, empty battery.
pub fn flat_day() -> Vec<TimeSegment> {
    (0..N_SEGMENTS).map(|index| segment(index, 0.0, 0.5, 0.2)).collect()
}

/// Cheap nights, an evening peak and a sunny midday.
///
/// All the energies are multiples of 0.5 kWh so that a 0.5 kWh state space is exact.
pub fn sunny_day() -> Vec<TimeSegment> {
    (0..N_SEGMENTS)
        .map(|index| {
            let price = match index {
                0..10 => 0.08,
                32..38 => 0.45,
                _ => 0.25,
            };
            let solar = match index {
                16..20 | 32..36 => 0.5,
                20..24 | 28..32 => 1.0,
                24..28 => 2.0,
                _ => 0.0,
            };
            let load = match index {
                14..18 | 32..44 => 1.0,
                _ => 0.5,
            };
            segment(index, solar, load, price)
        })
        .collect()
}
