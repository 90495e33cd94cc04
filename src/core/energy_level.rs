use std::fmt::{Debug, Formatter};

use derive_more::{From, FromStr};

use crate::{prelude::*, quantity::energy::Kwh};

/// Guards the floor against `9.999…` after a division.
const EPSILON: f64 = 1e-9;

/// Discrete unit of energy of a search state space.
///
/// This is the single rounding rule for all the discretized optimizers.
#[must_use]
#[derive(Copy, Clone, From, FromStr)]
#[from(Kwh)]
pub struct Quantum(pub Kwh);

impl Debug for Quantum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Quantum {
    pub fn validate(self) -> Result<Self> {
        ensure!(
            self.0 > Kwh::ZERO && self.0.0.is_finite(),
            "energy quantum must be positive, got {:?}",
            self.0,
        );
        Ok(self)
    }

    /// Convert the energy to the nearest energy level, rounding half to even.
    ///
    /// Negative energy is treated as zero.
    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    pub fn quantize(self, energy: Kwh) -> EnergyLevel {
        EnergyLevel((energy.max(Kwh::ZERO) / self.0).round_ties_even() as usize)
    }

    /// Highest energy level that does not exceed the capacity.
    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    pub fn max_level(self, capacity: Kwh) -> EnergyLevel {
        EnergyLevel((capacity.max(Kwh::ZERO) / self.0 + EPSILON).floor() as usize)
    }
}

/// Discrete energy level expressed in units of quanta.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct EnergyLevel(pub usize);

impl Debug for EnergyLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EnergyLevel {
    /// Convert the quantized energy level back to conventional energy.
    #[expect(clippy::cast_precision_loss)]
    pub fn dequantize(self, quantum: Quantum) -> Kwh {
        quantum.0 * (self.0 as f64)
    }

    /// Iterate through the energy levels starting with zero and ending with the current level.
    pub fn iter_from_zero(self) -> impl Iterator<Item = Self> {
        (0..=self.0).map(Self)
    }
}
