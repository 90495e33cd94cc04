#[macro_use]
mod macros;

pub mod currency;
pub mod energy;
pub mod rate;

#[cfg(test)]
mod tests {
    use super::{currency::Gbp, energy::Kwh, rate::ElectricityRate};

    #[test]
    fn test_min() {
        assert_eq!(Kwh(1.0).min(Kwh(2.0)), Kwh(1.0));
        assert_eq!(Kwh(2.0).min(Kwh(1.0)), Kwh(1.0));
    }

    #[test]
    fn test_max() {
        assert_eq!(Kwh(1.0).max(Kwh(2.0)), Kwh(2.0));
        assert_eq!(Kwh(2.0).max(Kwh(1.0)), Kwh(2.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Kwh(1.0).clamp(Kwh(2.0), Kwh(3.0)), Kwh(2.0));
        assert_eq!(Kwh(4.0).clamp(Kwh(2.0), Kwh(3.0)), Kwh(3.0));
        assert_eq!(Kwh(2.0).clamp(Kwh(1.0), Kwh(3.0)), Kwh(2.0));
    }

    #[test]
    fn test_abs() {
        assert_eq!(Kwh(-1.5).abs(), Kwh(1.5));
        assert_eq!(Gbp(0.25).abs(), Gbp(0.25));
    }

    #[test]
    fn test_is_finite_non_negative() {
        assert!(Kwh::ZERO.is_finite_non_negative());
        assert!(Kwh(1.5).is_finite_non_negative());
        assert!(!Kwh(-0.1).is_finite_non_negative());
        assert!(!Kwh(f64::NAN).is_finite_non_negative());
        assert!(!Kwh(f64::INFINITY).is_finite_non_negative());
    }

    #[test]
    fn test_sum() {
        let total: Gbp = [Gbp(0.1), Gbp(0.2), Gbp(-0.05)].into_iter().sum();
        approx::assert_abs_diff_eq!(total.0, 0.25);
    }

    #[test]
    fn test_energy_times_rate() {
        let cost = Kwh(0.5) * ElectricityRate::from(Gbp(0.2));
        approx::assert_abs_diff_eq!(cost.0, 0.1);
        assert_eq!(ElectricityRate::from(Gbp(0.2)) * Kwh(0.5), cost);
    }

    #[test]
    fn test_parse() {
        assert_eq!("2.5".parse::<Kwh>().unwrap(), Kwh(2.5));
        assert_eq!("0.30".parse::<ElectricityRate>().unwrap(), ElectricityRate::from(Gbp(0.3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Kwh(1.23456).to_string(), "1.235 kWh");
        assert_eq!(Gbp(4.8).to_string(), "4.80 £");
        assert_eq!(ElectricityRate::from(Gbp(0.2)).to_string(), "0.200 £/kWh");
    }
}
