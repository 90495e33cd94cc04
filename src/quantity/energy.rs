use std::ops::Mul;

use crate::quantity::{currency::Gbp, rate::ElectricityRate};

quantity!(
    /// Energy in kilowatt-hours.
    ///
    /// Negative values are allowed and mean a deficit during intermediate computations.
    Kwh, "kWh", precision: 3
);

impl Mul<ElectricityRate> for Kwh {
    type Output = Gbp;

    fn mul(self, rhs: ElectricityRate) -> Self::Output {
        Gbp(self.0 * rhs.0.0)
    }
}
