//! Tolerant floating-point comparison used by model equality.

/// Absolute tolerance applied to every comparison.
pub const ABS_TOL: f64 = 1e-6;
/// Relative tolerance, scaled by the larger magnitude of the two operands.
pub const REL_TOL: f64 = 1e-6;

/// Returns true when `a` and `b` agree within [`ABS_TOL`] plus [`REL_TOL`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= ABS_TOL + REL_TOL * a.abs().max(b.abs())
}

/// Element-wise [`approx_eq`] over two slices of equal length.
pub fn slices_approx_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y))
}
