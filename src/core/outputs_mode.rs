use std::fmt::{Display, Formatter};

/// Battery control decision for a single half-hour segment.
///
/// The declaration order is the evaluation order of the optimizers, which makes their
/// tie-breaking deterministic.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputsMode {
    /// Forced charging from the grid at the battery's grid charge rate, plus any solar.
    ChargeFromGridAndSolar,

    /// Only solar charging, the household load is served entirely by the grid.
    ChargeSolarOnly,

    /// Serve the household from solar first, then from the battery, then from the grid.
    ///
    /// Excess solar still charges the battery.
    #[default]
    Discharge,
}

impl OutputsMode {
    pub const ALL: [Self; 3] = [Self::ChargeFromGridAndSolar, Self::ChargeSolarOnly, Self::Discharge];

    pub const fn is_charging(self) -> bool {
        matches!(self, Self::ChargeFromGridAndSolar | Self::ChargeSolarOnly)
    }

    /// Whether switching between the two modes flips the battery between charging and discharging.
    pub const fn is_reversal(self, next: Self) -> bool {
        self.is_charging() != next.is_charging()
    }
}

impl Display for OutputsMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChargeFromGridAndSolar => write!(f, "Grid+solar charge"),
            Self::ChargeSolarOnly => write!(f, "Solar-only charge"),
            Self::Discharge => write!(f, "Discharge"),
        }
    }
}
