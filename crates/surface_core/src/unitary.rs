//! Single-qubit unitary matrices
//!
//! Gantree: L1_Program → Unitary
//!
//! Dense 2×2 complex matrices carried by custom unitary gates.

use crate::constants::numeric::UNITARY_TOLERANCE;
use crate::error::{SurfaceError, SurfaceResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2×2 complex matrix, row-major
/// Gantree: Matrix2 // 2x2 유니터리
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2 {
    entries: [[Complex64; 2]; 2],
}

impl Matrix2 {
    /// Create a matrix, checking that it is unitary
    /// Gantree: new(entries) -> Result<Self> // 생성+검증
    pub fn new(entries: [[Complex64; 2]; 2]) -> SurfaceResult<Self> {
        let matrix = Self { entries };
        if !matrix.is_unitary(UNITARY_TOLERANCE) {
            return Err(SurfaceError::InvalidUnitary(format!(
                "matrix {} is not unitary",
                matrix
            )));
        }
        Ok(matrix)
    }

    /// Create from a real matrix, checking that it is orthogonal
    pub fn from_real(entries: [[f64; 2]; 2]) -> SurfaceResult<Self> {
        let c = |v: f64| Complex64::new(v, 0.0);
        Self::new([
            [c(entries[0][0]), c(entries[0][1])],
            [c(entries[1][0]), c(entries[1][1])],
        ])
    }

    /// Identity matrix
    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            entries: [[one, zero], [zero, one]],
        }
    }

    /// Pauli-X matrix
    pub fn pauli_x() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            entries: [[zero, one], [one, zero]],
        }
    }

    /// Get entry at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.entries[row][col]
    }

    /// Raw entries
    pub fn entries(&self) -> &[[Complex64; 2]; 2] {
        &self.entries
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Self {
        let e = &self.entries;
        Self {
            entries: [
                [e[0][0].conj(), e[1][0].conj()],
                [e[0][1].conj(), e[1][1].conj()],
            ],
        }
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &Matrix2) -> Self {
        let a = &self.entries;
        let b = &other.entries;
        let mut out = [[Complex64::new(0.0, 0.0); 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        Self { entries: out }
    }

    /// Check `U†U = I` within tolerance
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.dagger().mul(self);
        let identity = Self::identity();
        (0..2).all(|r| {
            (0..2).all(|c| (product.get(r, c) - identity.get(r, c)).norm() <= tolerance)
        })
    }

    /// Apply to the amplitude pair `(a0, a1)` of one qubit
    #[inline]
    pub fn apply(&self, a0: Complex64, a1: Complex64) -> (Complex64, Complex64) {
        let e = &self.entries;
        (e[0][0] * a0 + e[0][1] * a1, e[1][0] * a0 + e[1][1] * a1)
    }

    /// Euler angles `(θ, φ, λ)` with `self = e^{iα} U(θ, φ, λ)`
    /// Gantree: u_angles(&self) -> (θ,φ,λ) // U 게이트 분해
    ///
    /// `U(θ, φ, λ) = [[cos θ/2, -e^{iλ} sin θ/2], [e^{iφ} sin θ/2, e^{i(φ+λ)} cos θ/2]]`
    pub fn u_angles(&self) -> (f64, f64, f64) {
        let [[a, b], [c, d]] = self.entries;
        let theta = 2.0 * c.norm().atan2(a.norm());
        let eps = 1e-12;

        if c.norm() < eps {
            // Diagonal: only φ + λ is defined
            let alpha = a.arg();
            (theta, 0.0, d.arg() - alpha)
        } else if a.norm() < eps {
            // Anti-diagonal: only λ - φ is defined
            let alpha = c.arg();
            (theta, 0.0, (-b).arg() - alpha)
        } else {
            let alpha = a.arg();
            (theta, c.arg() - alpha, (-b).arg() - alpha)
        }
    }

    /// Build `U(θ, φ, λ)` (no global phase)
    pub fn from_u_angles(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let e = |angle: f64| Complex64::from_polar(1.0, angle);
        Self {
            entries: [
                [Complex64::new(c, 0.0), -e(lambda) * s],
                [e(phi) * s, e(phi + lambda) * c],
            ],
        }
    }

    /// Equality up to a global phase
    pub fn approx_eq_up_to_phase(&self, other: &Matrix2, tolerance: f64) -> bool {
        // |tr(A†B)| = 2 exactly when B = e^{iα} A for unitary A, B
        let product = self.dagger().mul(other);
        let trace = product.get(0, 0) + product.get(1, 1);
        (trace.norm() - 2.0).abs() <= tolerance
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entries;
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            e[0][0], e[0][1], e[1][0], e[1][1]
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_is_unitary() {
        assert!(Matrix2::identity().is_unitary(1e-12));
        assert!(Matrix2::pauli_x().is_unitary(1e-12));
    }

    #[test]
    fn test_reject_non_unitary() {
        assert!(Matrix2::from_real([[1.0, 1.0], [0.0, 1.0]]).is_err());
    }

    #[test]
    fn test_rotation_is_unitary() {
        let (s, c) = 0.3f64.sin_cos();
        let m = Matrix2::from_real([[c, -s], [s, c]]).unwrap();
        let (a0, a1) = m.apply(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
        assert_relative_eq!(a0.re, c, epsilon = 1e-12);
        assert_relative_eq!(a1.re, s, epsilon = 1e-12);
    }

    #[test]
    fn test_u_angles_roundtrip() {
        let (s, c) = 0.7f64.sin_cos();
        let reflection = Matrix2::from_real([[-c, -s], [-s, c]]).unwrap();
        let (theta, phi, lambda) = reflection.u_angles();
        let rebuilt = Matrix2::from_u_angles(theta, phi, lambda);
        assert!(reflection.approx_eq_up_to_phase(&rebuilt, 1e-9));

        let (theta, phi, lambda) = Matrix2::pauli_x().u_angles();
        assert_relative_eq!(theta, std::f64::consts::PI, epsilon = 1e-12);
        let rebuilt = Matrix2::from_u_angles(theta, phi, lambda);
        assert!(Matrix2::pauli_x().approx_eq_up_to_phase(&rebuilt, 1e-9));

        let rebuilt = {
            let (t, p, l) = Matrix2::identity().u_angles();
            Matrix2::from_u_angles(t, p, l)
        };
        assert!(Matrix2::identity().approx_eq_up_to_phase(&rebuilt, 1e-9));
    }

    #[test]
    fn test_pauli_x_squares_to_identity() {
        let x = Matrix2::pauli_x();
        assert_eq!(x.mul(&x), Matrix2::identity());
    }
}
