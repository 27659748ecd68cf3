use std::cmp::Eq;
use std::fmt::Debug;
use std::fmt::Display;

use derive_more::Display;
use num_traits::One;
use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use ordered_float::FloatCore;
use ordered_float::OrderedFloat;

use crate::cost::Cost;

/// A totally ordered floating point cost.
///
/// Heuristic tables from the textbook graphs carry fractional estimates
/// (`10.4`, `6.7`, ...), so integer costs are not enough for them.
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost<F: FloatCore>(pub OrderedFloat<F>);

/// The cost used by string-labelled graphs.
pub type Weight = FloatCost<f64>;

impl<F> Cost for FloatCost<F>
where
    F: FloatCore + Debug + Display,
{
    /// NaN and infinities are not usable costs.
    #[inline(always)]
    fn valid(&self) -> bool {
        self.0.0.is_finite()
    }
}

impl<F> FloatCost<F>
where
    F: FloatCore,
{
    pub fn new(f: F) -> Self {
        Self(OrderedFloat(f))
    }
    pub fn from_ordered_float(f: OrderedFloat<F>) -> Self {
        Self(f)
    }
    pub fn get(&self) -> F {
        self.0.0
    }

    #[inline(always)]
    pub fn infinity() -> Self {
        Self(OrderedFloat::infinity())
    }
}

impl From<f64> for FloatCost<f64> {
    fn from(f: f64) -> Self {
        Self::new(f)
    }
}
impl From<u32> for FloatCost<f64> {
    fn from(n: u32) -> Self {
        Self::new(f64::from(n))
    }
}

impl<F> std::str::FromStr for FloatCost<F>
where
    F: FloatCore + std::str::FromStr,
{
    type Err = F::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.parse::<F>()?))
    }
}

impl<F> std::ops::Add for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(OrderedFloat(self.0.0 + rhs.0.0))
    }
}
impl<F> std::ops::Mul for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(OrderedFloat(self.0.0 * rhs.0.0))
    }
}

impl<F> std::ops::AddAssign for FloatCost<F>
where
    F: FloatCore,
{
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl<F> SaturatingAdd for FloatCost<F>
where
    F: FloatCore,
{
    /// Floats saturate at infinity on their own.
    fn saturating_add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }
}

impl<F> Zero for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0.0.is_zero()
    }
    #[inline(always)]
    fn zero() -> Self {
        Self::new(F::zero())
    }
}
impl<F> One for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn one() -> Self {
        Self::new(F::one())
    }
}
impl<F> UpperBounded for FloatCost<F>
where
    F: FloatCore,
{
    fn max_value() -> Self {
        Self::infinity()
    }
}

impl<F> PartialOrd for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<F> Ord for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // `Ord` is forwarded to `OrderedFloat`
        self.0.cmp(&other.0)
    }
}
impl<F> PartialEq for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<F> Eq for FloatCost<F> where F: FloatCore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert!(FloatCost::new(0.0f32).is_zero());
        assert!(FloatCost::from_ordered_float(OrderedFloat(0.0f32)).is_zero());
    }

    #[test]
    fn order() {
        assert!(FloatCost::new(0.0f32) <= FloatCost::new(0.0f32));
        assert!(FloatCost::new(0.0f32) == FloatCost::new(0.0f32));
        assert!(Weight::new(6.7) < Weight::new(6.9));
    }

    #[test]
    fn sum() {
        let mut f = FloatCost::new(0.0f32);
        f += FloatCost::new(1.0f32);
        f += FloatCost::new(1.0f32);
        assert!(f == FloatCost::new(2.0f32));
        f += FloatCost::infinity();
        assert!(f == FloatCost::max_value());
    }

    #[test]
    fn validity() {
        assert!(Weight::new(10.4).valid());
        assert!(Weight::new(10.4).is_non_negative());
        assert!(!Weight::new(-1.0).is_non_negative());
        assert!(!Weight::infinity().valid());
        assert!(!Weight::new(f64::NAN).valid());
    }
}
