quantity!(
    /// Pounds sterling.
    Gbp, "£", precision: 2
);

impl Gbp {
    /// Initial value for cost minimization.
    pub const MAX: Self = Self(f64::MAX);
}
