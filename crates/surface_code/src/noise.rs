//! Random single-qubit error matrices
//!
//! Gantree: L3_Code → NoiseMatrix
//!
//! Draws four uniforms `e0..e3`, scales them by `1 / Σ eᵢ²`, forms
//! `M = [[e0+e2, e1-e3], [e1+e3, e0-e2]]` and returns the orthonormal
//! factor `Q` of the Householder QR decomposition `M = QR`.

use rand::Rng;
use surface_core::{Matrix2, SurfaceResult};

/// Householder `Q` factor of a real 2×2 matrix
/// Gantree: householder_q(m) -> [[f64;2];2] // QR 직교 인자
///
/// Sign convention follows LAPACK `geqrf`: the reflector maps the first
/// column `(a, c)` to `(β, 0)` with `β = -sign(a)·‖(a, c)‖`, and a column
/// that is already upper triangular (`c = 0`) yields the identity.
pub fn householder_q(m: [[f64; 2]; 2]) -> [[f64; 2]; 2] {
    let (a, c) = (m[0][0], m[1][0]);
    let norm = a.hypot(c);

    if c == 0.0 || norm == 0.0 {
        return [[1.0, 0.0], [0.0, 1.0]];
    }

    // Q = H = I - τvvᵀ has first column (a, c)/β and is symmetric
    let beta = if a >= 0.0 { -norm } else { norm };
    let (q00, q10) = (a / beta, c / beta);
    [[q00, q10], [q10, -q00]]
}

/// Unnormalised error matrix from four uniforms
pub fn error_matrix(e: [f64; 4]) -> [[f64; 2]; 2] {
    let scale: f64 = e.iter().map(|v| v * v).sum();
    let e = if scale > 0.0 {
        e.map(|v| v / scale)
    } else {
        e
    };
    [[e[0] + e[2], e[1] - e[3]], [e[1] + e[3], e[0] - e[2]]]
}

/// Draw a random orthogonal error matrix
/// Gantree: random_error_unitary(rng) -> Result<Matrix2> // 무작위 오류 행렬
pub fn random_error_unitary<R: Rng>(rng: &mut R) -> SurfaceResult<Matrix2> {
    let e: [f64; 4] = [rng.gen(), rng.gen(), rng.gen(), rng.gen()];
    Matrix2::from_real(householder_q(error_matrix(e)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_orthogonal(q: [[f64; 2]; 2]) -> bool {
        let dot = |i: usize, j: usize| q[0][i] * q[0][j] + q[1][i] * q[1][j];
        (dot(0, 0) - 1.0).abs() < 1e-12
            && (dot(1, 1) - 1.0).abs() < 1e-12
            && dot(0, 1).abs() < 1e-12
    }

    #[test]
    fn test_householder_positive_column() {
        // (3, 4) → Q = -(1/5)[[3, 4], [4, -3]]
        let q = householder_q([[3.0, 1.0], [4.0, 2.0]]);
        assert_relative_eq!(q[0][0], -0.6, epsilon = 1e-12);
        assert_relative_eq!(q[0][1], -0.8, epsilon = 1e-12);
        assert_relative_eq!(q[1][0], -0.8, epsilon = 1e-12);
        assert_relative_eq!(q[1][1], 0.6, epsilon = 1e-12);
        assert!(is_orthogonal(q));
    }

    #[test]
    fn test_householder_r_is_upper_triangular() {
        let m = [[0.7, -0.2], [1.3, 0.4]];
        let q = householder_q(m);
        // R = Qᵀ M
        let r10 = q[0][1] * m[0][0] + q[1][1] * m[1][0];
        assert_relative_eq!(r10, 0.0, epsilon = 1e-12);
        let r00 = q[0][0] * m[0][0] + q[1][0] * m[1][0];
        assert!(r00 < 0.0);
    }

    #[test]
    fn test_householder_negative_and_trivial_columns() {
        let q = householder_q([[-3.0, 0.0], [4.0, 1.0]]);
        assert_relative_eq!(q[0][0], -0.6, epsilon = 1e-12);
        assert!(is_orthogonal(q));

        assert_eq!(householder_q([[-2.0, 1.0], [0.0, 1.0]]), [[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_error_matrix_scaling() {
        let m = error_matrix([1.0, 1.0, 1.0, 1.0]);
        // Each entry divided by 4
        assert_relative_eq!(m[0][0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(m[0][1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(m[1][0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(m[1][1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_random_error_is_orthogonal() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            let u = random_error_unitary(&mut rng).unwrap();
            assert!(u.is_unitary(1e-12));
            for r in 0..2 {
                for c in 0..2 {
                    assert_relative_eq!(u.get(r, c).im, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = random_error_unitary(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let b = random_error_unitary(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }
}
