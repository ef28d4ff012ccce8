//! Explicit rounding direction for arithmetic operations.

/// Specifies the rounding direction for fixed-point multiplication and
/// division.
///
/// Every rounding decision in pool math is taken by the kernel in
/// [`math::fixed_point`](crate::math::fixed_point); pool code only picks
/// the direction.  Amounts paid out round [`Rounding::Down`], amounts
/// charged round [`Rounding::Up`].
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::Rounding;
///
/// let r = Rounding::Up;
/// assert!(r.is_up());
/// assert_eq!(r.opposite(), Rounding::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// Returns the other direction.
    ///
    /// Dividing by a quantity rounded one way requires the quotient to be
    /// rounded the other way to stay conservative.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}
