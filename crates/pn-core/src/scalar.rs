//! Scalar abstraction shared by plain and automatic-differentiation evaluation.
//!
//! Every state-dependent operator, the effort vector and the residual
//! functors are written once against [`Scalar`] and instantiated for `f64`
//! (residual values) and [`Dual64`] (one Jacobian column per evaluation).

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};
use num_dual::{Dual64, DualNum};

/// Numeric type usable inside operators and residuals.
pub trait Scalar:
    nalgebra::Scalar
    + Copy
    + Debug
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
{
    fn zero() -> Self {
        Self::from(0.0)
    }

    fn one() -> Self {
        Self::from(1.0)
    }

    fn abs(self) -> Self;

    fn powf(self, exponent: f64) -> Self;

    /// Real (value) part; the identity for `f64`.
    fn re(self) -> f64;
}

impl Scalar for f64 {
    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn powf(self, exponent: f64) -> Self {
        f64::powf(self, exponent)
    }

    #[inline]
    fn re(self) -> f64 {
        self
    }
}

impl Scalar for Dual64 {
    #[inline]
    fn abs(self) -> Self {
        if self.re < 0.0 { -self } else { self }
    }

    #[inline]
    fn powf(self, exponent: f64) -> Self {
        DualNum::powf(&self, exponent)
    }

    #[inline]
    fn re(self) -> f64 {
        self.re
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn friction_like<T: Scalar>(rho: T, mom: T) -> T {
        (mom / rho).abs() * T::from(0.5)
    }

    #[test]
    fn plain_and_dual_agree_on_value() {
        let plain = friction_like(2.0, -3.0);
        let dual = friction_like(Dual64::from(2.0), Dual64::from(-3.0));
        assert_eq!(plain, 0.75);
        assert_eq!(dual.re(), plain);
    }

    #[test]
    fn dual_abs_flips_derivative_for_negative_values() {
        let x = Dual64::from(-3.0).derivative();
        let y = Scalar::abs(x);
        assert_eq!(y.re, 3.0);
        assert_eq!(y.eps, -1.0);
    }

    #[test]
    fn dual_powf_derivative() {
        // d/dx x^(1/2) at 4 = 1/4
        let x = Dual64::from(4.0).derivative();
        let y = Scalar::powf(x, 0.5);
        assert!((y.re - 2.0).abs() < 1e-14);
        assert!((y.eps - 0.25).abs() < 1e-14);
    }
}
