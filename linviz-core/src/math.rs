/// Fixed-size vector and matrix helpers shared by the whole core
use nalgebra::{Matrix3, Vector3};

/// Absolute tolerance used by the identity check
pub const IDENTITY_ABS_TOLERANCE: f64 = 1e-8;
/// Relative tolerance used by the identity check
pub const IDENTITY_REL_TOLERANCE: f64 = 1e-5;

/// Compare two scalars with an absolute plus relative tolerance.
///
/// `b` is the reference value, so the relative term scales with it.
pub fn approx_eq(a: f64, b: f64, abs_tol: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= abs_tol + rel_tol * b.abs()
}

pub fn approx_eq_vector(a: &Vector3<f64>, b: &Vector3<f64>, epsilon: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}

pub fn approx_eq_matrix(a: &Matrix3<f64>, b: &Matrix3<f64>, epsilon: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}

/// Whether `m` is the identity within the default tolerances
pub fn is_identity(m: &Matrix3<f64>) -> bool {
    let identity = Matrix3::<f64>::identity();
    m.iter().zip(identity.iter()).all(|(x, y)| {
        approx_eq(*x, *y, IDENTITY_ABS_TOLERANCE, IDENTITY_REL_TOLERANCE)
    })
}

/// Build a matrix from nine values in row-major order
pub fn matrix_from_rows(values: &[f64; 9]) -> Matrix3<f64> {
    Matrix3::from_row_slice(values)
}

/// Linear blend `(1 - t) * a + t * b`.
///
/// Written in this form so that `t == 0` and `t == 1` reproduce the endpoints
/// exactly.
pub fn lerp_vector(a: &Vector3<f64>, b: &Vector3<f64>, t: f64) -> Vector3<f64> {
    a * (1.0 - t) + b * t
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}
