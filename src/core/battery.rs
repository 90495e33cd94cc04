mod simulator;

use bon::bon;

use crate::{core::time_segment::SANITY_CEILING, prelude::*, quantity::energy::Kwh};

/// Home battery model.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Battery {
    capacity: Kwh,

    /// Maximum energy the battery takes from the grid within a single half-hour segment.
    grid_charge_per_segment: Kwh,
}

#[bon]
impl Battery {
    #[builder]
    pub fn new(capacity: Kwh, grid_charge_per_segment: Kwh) -> Result<Self> {
        ensure!(
            capacity.0.is_finite() && capacity > Kwh::ZERO,
            "battery capacity must be positive, got {capacity}",
        );
        ensure!(
            capacity <= SANITY_CEILING,
            "battery capacity {capacity} exceeds {SANITY_CEILING}",
        );
        ensure!(
            grid_charge_per_segment.is_finite_non_negative(),
            "grid charge rate must be a non-negative number, got {grid_charge_per_segment}",
        );
        Ok(Self { capacity, grid_charge_per_segment })
    }
}

impl Battery {
    pub const fn capacity(&self) -> Kwh {
        self.capacity
    }

    /// Supply the energy to the battery for one segment.
    pub fn transfer(&self, charge: Kwh, supplied: Kwh) -> Transfer {
        let unclamped = charge + supplied;
        Transfer {
            charge: unclamped.min(self.capacity),
            overflow: (unclamped - self.capacity).max(Kwh::ZERO),
        }
    }
}

/// Outcome of [`Battery::transfer`].
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// New charge, capped by the capacity.
    pub charge: Kwh,

    /// Supplied energy that did not fit.
    pub overflow: Kwh,
}
