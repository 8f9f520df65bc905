//! Float assertions for checking metrics and figure geometry in tests.
//!
//! ### [`crate::assert_close`]
//! Asserts that two `f64` values are equal within a tolerance.
//! - Defaults to `f64::EPSILON` scaled by the magnitude of the operands.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of equal length.
//!
//! ```rust
//! # use gaviz::{assert_close, assert_all_close};
//! assert_close!(0.1 + 0.2, 0.3);
//! assert_close!(0.2887, (1.0f64 / 12.0).sqrt(), tol = 1e-3);
//! assert_all_close!([1.0, 2.0], [1.0, 2.0 + 1e-16]);
//! ```

/// Asserts that two floating-point values are approximately equal.
///
/// # Parameters
/// - `$a`: First value.
/// - `$b`: Second value.
/// - `tol = $tol`: *(optional)* Absolute tolerance. Defaults to a few ulps relative to the operands.
/// - `$msg`: *(optional)* Custom failure message, with `format!` arguments.
///
/// # Panics
/// Panics if `|a - b|` exceeds the tolerance.
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $($msg:tt)+)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($($msg)+); )?

        let (a, b): (f64, f64) = ($a, $b);
        let tol: f64 = $tol;
        assert!(a == b || (a - b).abs() <= tol, "{msg}: {a} != {b} (tolerance {tol})");
    }};

    ($a:expr, $b:expr $(, $($msg:tt)+)?) => {{
        let (a, b): (f64, f64) = ($a, $b);
        let scale = a.abs().max(b.abs()).max(1.0);
        $crate::assert_close!(a, b, tol = 4.0 * f64::EPSILON * scale $(, $($msg)+)?);
    }};
}

/// Asserts that two slices of floating-point values are approximately equal element-wise.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements is not [`crate::assert_close`].
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tol = $tol:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tol = $tol, "src[{}]", i);
        }
    }};

    ($src:expr, $dst:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "src[{}]", i);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, "Values should be close");
        assert_close!(0.1 + 0.2, 0.3);
        assert_close!(1.0, 1.05, tol = 0.1);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_macro_fails() {
        assert_close!(1.0, 1.1);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b);
        assert_all_close!(a, [1.01, 2.0, 3.0], tol = 0.1);
    }
}
