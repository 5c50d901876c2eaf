//! Arithmetic over possibly-unknown values.
//!
//! An unknown value is `None`. Addition and subtraction treat it as the identity element,
//! while division refuses an unknown or zero denominator instead of producing an infinity.
//! A result that overflows into an infinity or `NaN` is unknown as well.

use std::ops::{Add, Div, Sub};

use crate::quantity::{Finite, Zero};

/// Sum two possibly-unknown values, falling back to whichever one is known.
#[must_use]
pub fn add_safely<T>(lhs: Option<T>, rhs: Option<T>) -> Option<T>
where
    T: Add<Output = T> + Finite,
{
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(lhs + rhs),
        (lhs, None) => lhs,
        (None, rhs) => rhs,
    }
    .filter(Finite::is_finite)
}

/// Subtract `rhs` from `lhs`. An unknown `lhs` stays unknown, an unknown `rhs` subtracts nothing.
#[must_use]
pub fn subtract_safely<T>(lhs: Option<T>, rhs: Option<T>) -> Option<T>
where
    T: Sub<Output = T> + Finite,
{
    let lhs = lhs?;
    Some(match rhs {
        Some(rhs) => lhs - rhs,
        None => lhs,
    })
    .filter(Finite::is_finite)
}

/// Divide, yielding unknown for an unknown operand or a denominator that is exactly zero.
#[must_use]
pub fn divide_safely<N, D>(numerator: Option<N>, denominator: Option<D>) -> Option<N::Output>
where
    N: Div<D>,
    N::Output: Finite,
    D: Zero + PartialEq,
{
    let denominator = denominator.filter(|denominator| *denominator != D::ZERO)?;
    Some(numerator? / denominator).filter(Finite::is_finite)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::power::Watts;

    #[test]
    fn add_falls_back_to_known_operand() {
        assert_eq!(add_safely(None, Some(Watts(42.0))), Some(Watts(42.0)));
        assert_eq!(add_safely(Some(Watts(42.0)), None), Some(Watts(42.0)));
        assert_eq!(add_safely(Some(Watts(40.0)), Some(Watts(2.0))), Some(Watts(42.0)));
    }

    #[test]
    fn add_unknowns() {
        assert_eq!(add_safely::<Watts>(None, None), None);
    }

    #[test]
    fn subtract_unknown_minuend() {
        assert_eq!(subtract_safely(None, Some(Watts(1.0))), None);
        assert_eq!(subtract_safely::<Watts>(None, None), None);
    }

    #[test]
    fn subtract_unknown_subtrahend() {
        assert_eq!(subtract_safely(Some(Watts(5.0)), None), Some(Watts(5.0)));
        assert_eq!(subtract_safely(Some(Watts(5.0)), Some(Watts(7.0))), Some(Watts(-2.0)));
    }

    #[test]
    fn divide_by_zero_is_unknown() {
        assert_eq!(divide_safely(Some(Watts(5.0)), Some(Watts(0.0))), None);
        assert_eq!(divide_safely(Some(Watts(0.0)), Some(Watts(0.0))), None);
        assert_eq!(divide_safely(None::<Watts>, Some(Watts(0.0))), None);
        assert_eq!(divide_safely(Some(1.0), Some(-0.0)), None);
    }

    #[test]
    fn divide_unknowns() {
        assert_eq!(divide_safely(None::<Watts>, Some(Watts(2.0))), None);
        assert_eq!(divide_safely(Some(Watts(2.0)), None::<Watts>), None);
    }

    #[test]
    fn divide_ok() {
        let ratio = divide_safely(Some(Watts(-200.0)), Some(Watts(500.0))).unwrap();
        assert_abs_diff_eq!(ratio, -0.4);
        assert_eq!(divide_safely(Some(Watts(300.0)), Some(3.0)), Some(Watts(100.0)));
    }

    #[test]
    fn overflow_is_unknown() {
        let max = Some(Watts(f64::MAX));
        assert_eq!(add_safely(max, max), None);
        assert_eq!(subtract_safely(Some(Watts(-f64::MAX)), max), None);
        assert_eq!(divide_safely(max, Some(0.5)), None);
        assert_eq!(divide_safely(max, Some(Watts(f64::MIN_POSITIVE))), None);
    }

    #[test]
    fn non_finite_operand_is_unknown() {
        assert_eq!(add_safely(Some(Watts(f64::INFINITY)), None), None);
        assert_eq!(subtract_safely(Some(Watts(f64::NAN)), Some(Watts(1.0))), None);
        assert_eq!(divide_safely(Some(Watts(1.0)), Some(Watts(f64::NAN))), None);
    }
}
