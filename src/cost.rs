/// A priority, edge weight or heuristic estimate.
///
/// Costs need a total order so the frontier can rank entries, and saturating
/// addition so `g + h` and `parent + weight` never wrap.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
    + std::ops::AddAssign
{
    /// Whether this is a finite, usable value.
    ///
    /// The upper bound is reserved to mean "unreachable".
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }

    #[inline(always)]
    fn is_non_negative(&self) -> bool {
        *self >= Self::zero()
    }
}

impl Cost for u32 {}
impl Cost for u64 {}
impl Cost for usize {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_costs() {
        assert!(0u32.valid());
        assert!(0u32.is_non_negative());
        assert!(!u32::MAX.valid());
        assert!(17u64.valid());
        assert_eq!(
            num_traits::SaturatingAdd::saturating_add(&u32::MAX, &1u32),
            u32::MAX
        );
    }
}
