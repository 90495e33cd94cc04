use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    core::segment::{HalfHourSegment, N_SEGMENTS},
    forecast::PriceSource,
    prelude::*,
    quantity::rate::ElectricityRate,
};

/// Typical grid price for every half-hour of a day.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "Vec<ElectricityRate>")]
pub struct PriceCurve([ElectricityRate; N_SEGMENTS]);

impl TryFrom<Vec<ElectricityRate>> for PriceCurve {
    type Error = Error;

    fn try_from(rates: Vec<ElectricityRate>) -> Result<Self> {
        <[ElectricityRate; N_SEGMENTS]>::try_from(rates).map(Self).map_err(|rates| {
            anyhow::anyhow!("expected {N_SEGMENTS} average prices, got {}", rates.len())
        })
    }
}

impl PriceCurve {
    pub const fn get(&self, segment: HalfHourSegment) -> ElectricityRate {
        self.0[segment.index()]
    }
}

/// Asks the primary source first, and falls back to the average curve where it has no price.
#[must_use]
pub struct WithFallback<P> {
    pub primary: P,
    pub fallback: PriceCurve,
}

impl<P: PriceSource> PriceSource for WithFallback<P> {
    fn grid_price(
        &self,
        date: NaiveDate,
        segment: HalfHourSegment,
    ) -> Result<Option<ElectricityRate>> {
        if let Some(price) = self.primary.grid_price(date, segment)? {
            return Ok(Some(price));
        }
        let price = self.fallback.get(segment);
        debug!(%date, %segment, %price, "falling back to the average price");
        Ok(Some(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::currency::Gbp;

    struct Sparse;

    impl PriceSource for Sparse {
        fn grid_price(
            &self,
            _date: NaiveDate,
            segment: HalfHourSegment,
        ) -> Result<Option<ElectricityRate>> {
            Ok((segment.index() % 2 == 0).then_some(ElectricityRate::from(Gbp(0.1))))
        }
    }

    fn curve() -> Result<PriceCurve> {
        PriceCurve::try_from(vec![ElectricityRate::from(Gbp(0.3)); N_SEGMENTS])
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(PriceCurve::try_from(vec![ElectricityRate::default(); 24]).is_err());
    }

    #[test]
    fn fallback_fills_the_gaps() -> Result {
        let prices = WithFallback { primary: Sparse, fallback: curve()? };
        let date = NaiveDate::MIN;
        assert_eq!(
            prices.grid_price(date, HalfHourSegment::try_from(0)?)?,
            Some(ElectricityRate::from(Gbp(0.1))),
        );
        assert_eq!(
            prices.grid_price(date, HalfHourSegment::try_from(1)?)?,
            Some(ElectricityRate::from(Gbp(0.3))),
        );
        Ok(())
    }
}
