//! Rotated surface code lattice
//!
//! Gantree: L3_Code → Lattice
//!
//! A distance-`d` patch: `d²` data qubits in row-major order and one
//! stabilizer face per syndrome qubit. Face order is fixed at
//! construction; face `k` is measured into bit `k` of every round
//! register.
//!
//! Face order:
//!
//! 1. Interior faces, row-major over `row, col ∈ [0, d-2]`
//! 2. Boundary faces, for each `k ∈ [0, d/2)`: top, right, bottom, left

use serde::{Deserialize, Serialize};
use std::fmt;
use surface_core::{QubitId, SurfaceError, SurfaceResult};

/// Pauli type of a stabilizer face
/// Gantree: StabilizerKind // X/Z 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilizerKind {
    /// Product of X on participants; detects phase flips
    X,
    /// Product of Z on participants; detects bit flips
    Z,
}

/// Where a face sits on the patch
/// Gantree: FaceLocation // 면 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceLocation {
    /// Weight-4 face with upper-left corner at data `(row, col)`
    Interior {
        /// Row of the upper-left corner
        row: usize,
        /// Column of the upper-left corner
        col: usize,
    },
    /// Weight-2 face on the top edge
    Top(usize),
    /// Weight-2 face on the right edge
    Right(usize),
    /// Weight-2 face on the bottom edge
    Bottom(usize),
    /// Weight-2 face on the left edge
    Left(usize),
}

/// Stabilizer face
///
/// Corners are data-qubit indices; boundary faces have exactly two.
/// Gantree: Face // 스태빌라이저 면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Stabilizer type
    pub kind: StabilizerKind,
    /// Position on the patch
    pub location: FaceLocation,
    /// Upper-left corner
    pub ul: Option<QubitId>,
    /// Upper-right corner
    pub ur: Option<QubitId>,
    /// Lower-left corner
    pub ll: Option<QubitId>,
    /// Lower-right corner
    pub lr: Option<QubitId>,
}

impl Face {
    /// Participating data qubits in `ul, ur, ll, lr` order
    pub fn participants(&self) -> Vec<QubitId> {
        [self.ul, self.ur, self.ll, self.lr]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Number of participating data qubits
    pub fn weight(&self) -> usize {
        self.participants().len()
    }

    /// Check if data qubit participates
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.participants().contains(&qubit)
    }

    /// `(ul, ur)` if both exist
    pub fn upper_pair(&self) -> Option<(QubitId, QubitId)> {
        self.ul.zip(self.ur)
    }

    /// `(ll, lr)` if both exist
    pub fn lower_pair(&self) -> Option<(QubitId, QubitId)> {
        self.ll.zip(self.lr)
    }

    /// `(ul, ll)` if both exist
    pub fn left_pair(&self) -> Option<(QubitId, QubitId)> {
        self.ul.zip(self.ll)
    }

    /// `(ur, lr)` if both exist
    pub fn right_pair(&self) -> Option<(QubitId, QubitId)> {
        self.ur.zip(self.lr)
    }

    /// Check if face lies on an edge of the patch
    pub fn is_boundary(&self) -> bool {
        !matches!(self.location, FaceLocation::Interior { .. })
    }

    /// Number of shared data qubits with another face
    pub fn overlap(&self, other: &Face) -> usize {
        self.participants()
            .iter()
            .filter(|&&q| other.contains(q))
            .count()
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}{:?}", self.kind, self.location, self.participants())
    }
}

/// Surface code lattice of odd distance `d`
/// Gantree: Lattice // 격자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    /// Code distance
    /// Gantree: distance: usize // 코드 거리
    distance: usize,

    /// Faces in measurement order
    /// Gantree: faces: Vec<Face> // 면 목록
    faces: Vec<Face>,
}

impl Lattice {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build the lattice for distance `d`
    /// Gantree: new(d) -> Result<Self> // 격자 생성
    pub fn new(distance: usize) -> SurfaceResult<Self> {
        if distance == 0 || distance % 2 == 0 {
            return Err(SurfaceError::InvalidDistance(distance));
        }
        if distance == 1 {
            log::warn!("distance 1 lattice has no stabilizers");
        }

        let d = distance;
        let mut faces = Vec::with_capacity(d * d - 1);

        for row in 0..d - 1 {
            for col in 0..d - 1 {
                let ul = row * d + col;
                let kind = if (row + col) % 2 == 0 {
                    StabilizerKind::Z
                } else {
                    StabilizerKind::X
                };
                faces.push(Face {
                    kind,
                    location: FaceLocation::Interior { row, col },
                    ul: Some(ul),
                    ur: Some(ul + 1),
                    ll: Some(ul + d),
                    lr: Some(ul + d + 1),
                });
            }
        }

        for k in 0..d / 2 {
            let top = 2 * k;
            faces.push(Face {
                kind: StabilizerKind::X,
                location: FaceLocation::Top(k),
                ul: None,
                ur: None,
                ll: Some(top),
                lr: Some(top + 1),
            });

            let right = 2 * k * d + d - 1;
            faces.push(Face {
                kind: StabilizerKind::Z,
                location: FaceLocation::Right(k),
                ul: Some(right),
                ur: None,
                ll: Some(right + d),
                lr: None,
            });

            let bottom = d * d - 1 - 2 * k;
            faces.push(Face {
                kind: StabilizerKind::X,
                location: FaceLocation::Bottom(k),
                ul: Some(bottom - 1),
                ur: Some(bottom),
                ll: None,
                lr: None,
            });

            let left = 2 * k * d + d;
            faces.push(Face {
                kind: StabilizerKind::Z,
                location: FaceLocation::Left(k),
                ul: None,
                ur: Some(left),
                ll: None,
                lr: Some(left + d),
            });
        }

        Ok(Self { distance, faces })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Code distance
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Faces in measurement order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Face by measurement index
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Number of data qubits (`d²`)
    pub fn num_data(&self) -> usize {
        self.distance * self.distance
    }

    /// Number of syndrome qubits (`d² - 1`)
    pub fn num_syndrome(&self) -> usize {
        self.faces.len()
    }

    /// Total program qubits: data, syndrome, ancilla (`2d²`)
    pub fn num_qubits(&self) -> usize {
        self.num_data() + self.num_syndrome() + 1
    }

    // ========================================================================
    // Qubit Addressing
    // ========================================================================

    /// Program qubit of data qubit `i`
    pub fn data(&self, index: usize) -> SurfaceResult<QubitId> {
        if index >= self.num_data() {
            return Err(SurfaceError::QubitOutOfRange {
                qubit: index,
                max: self.num_data() - 1,
            });
        }
        Ok(index)
    }

    /// Program qubit of the syndrome qubit for face `k`
    pub fn syndrome(&self, face: usize) -> SurfaceResult<QubitId> {
        if face >= self.num_syndrome() {
            return Err(SurfaceError::QubitOutOfRange {
                qubit: face,
                max: self.num_syndrome().saturating_sub(1),
            });
        }
        Ok(self.num_data() + face)
    }

    /// Program qubit of the readout ancilla
    pub fn ancilla(&self) -> QubitId {
        self.num_qubits() - 1
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Indices of faces of the given type
    pub fn faces_of_kind(&self, kind: StabilizerKind) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of faces containing a data qubit
    /// Gantree: faces_containing(q) -> Vec<usize> // 큐비트 포함 면
    pub fn faces_containing(&self, qubit: QubitId) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.contains(qubit))
            .map(|(i, _)| i)
            .collect()
    }

    /// Data qubits of the logical Z operator (first row)
    pub fn logical_z_support(&self) -> Vec<QubitId> {
        (0..self.distance).collect()
    }

    /// Data qubits of the logical X operator (first column)
    pub fn logical_x_support(&self) -> Vec<QubitId> {
        (0..self.distance).map(|i| i * self.distance).collect()
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lattice(d={}, data={}, faces={}, qubits={})",
            self.distance,
            self.num_data(),
            self.num_syndrome(),
            self.num_qubits()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
