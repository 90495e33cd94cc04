use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use serde::{Deserialize, Serialize};

use crate::quantity::{currency::Gbp, energy::Kwh};

/// Grid price per kilowatt-hour for a single segment.
#[must_use]
#[derive(
    Copy,
    Clone,
    Default,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ElectricityRate(pub Gbp);

impl Mul<Kwh> for ElectricityRate {
    type Output = Gbp;

    fn mul(self, rhs: Kwh) -> Self::Output {
        rhs * self
    }
}

impl Display for ElectricityRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} £/kWh", self.0.0)
    }
}

impl Debug for ElectricityRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}£/kWh", self.0.0)
    }
}
