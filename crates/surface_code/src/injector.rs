//! Fault injection on data qubits
//!
//! Gantree: L3_Code → ErrorInjector

use crate::lattice::Lattice;
use crate::noise::random_error_unitary;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use surface_core::{Program, QubitId, SurfaceResult};

/// Label carried by injected unitary errors
pub const ERROR_LABEL: &str = "error";

/// Data qubit a fault is applied to
/// Gantree: DataTarget // 대상 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTarget {
    /// Specific data qubit index
    Index(usize),
    /// Uniformly random data qubit, drawn once
    Random,
}

impl DataTarget {
    /// Resolve to a data qubit index
    /// Gantree: resolve(lattice, rng) -> Result<QubitId> // 대상 해석
    pub fn resolve<R: Rng>(self, lattice: &Lattice, rng: &mut R) -> SurfaceResult<QubitId> {
        match self {
            DataTarget::Index(i) => lattice.data(i),
            DataTarget::Random => lattice.data(rng.gen_range(0..lattice.num_data())),
        }
    }
}

impl From<usize> for DataTarget {
    fn from(index: usize) -> Self {
        DataTarget::Index(index)
    }
}

/// Single-qubit fault
/// Gantree: Fault // 오류 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fault {
    /// Pauli X
    BitFlip,
    /// Pauli Z
    PhaseFlip,
    /// Random orthogonal 2×2 matrix
    Unitary,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fault::BitFlip => "bit_flip",
            Fault::PhaseFlip => "phase_flip",
            Fault::Unitary => "unitary",
        };
        write!(f, "{}", name)
    }
}

/// Record of an applied fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedFault {
    /// Fault kind
    pub fault: Fault,
    /// Data qubit hit
    pub qubit: QubitId,
    /// Number of rounds emitted before the fault
    pub after_round: usize,
}

/// Append a fault on the target data qubit; returns the qubit hit
/// Gantree: inject(program, lattice, fault, target, rng) -> Result<QubitId> // 오류 주입
pub fn inject<R: Rng>(
    program: &mut Program,
    lattice: &Lattice,
    fault: Fault,
    target: DataTarget,
    rng: &mut R,
) -> SurfaceResult<QubitId> {
    let qubit = target.resolve(lattice, rng)?;
    match fault {
        Fault::BitFlip => program.x(qubit)?,
        Fault::PhaseFlip => program.z(qubit)?,
        Fault::Unitary => {
            let matrix = random_error_unitary(rng)?;
            program.unitary(qubit, matrix, ERROR_LABEL)?;
        }
    }
    Ok(qubit)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::memory_program;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use surface_core::{Gate, SurfaceError};

    fn setup() -> (Lattice, Program, ChaCha8Rng) {
        let lattice = Lattice::new(3).unwrap();
        let program = memory_program(&lattice).unwrap();
        (lattice, program, ChaCha8Rng::seed_from_u64(1))
    }

    #[test]
    fn test_bit_and_phase_flip() {
        let (lattice, mut program, mut rng) = setup();
        inject(&mut program, &lattice, Fault::BitFlip, 4.into(), &mut rng).unwrap();
        inject(&mut program, &lattice, Fault::PhaseFlip, 8.into(), &mut rng).unwrap();
        assert_eq!(program.gates(), &[Gate::X(4), Gate::Z(8)]);
    }

    #[test]
    fn test_unitary_fault_label() {
        let (lattice, mut program, mut rng) = setup();
        inject(&mut program, &lattice, Fault::Unitary, 2.into(), &mut rng).unwrap();
        match &program.gates()[0] {
            Gate::Unitary { qubit, label, matrix } => {
                assert_eq!(*qubit, 2);
                assert_eq!(label, ERROR_LABEL);
                assert!(matrix.is_unitary(1e-9));
            }
            other => panic!("unexpected gate {}", other),
        }
    }

    #[test]
    fn test_target_out_of_range() {
        let (lattice, mut program, mut rng) = setup();
        let err = inject(&mut program, &lattice, Fault::BitFlip, 9.into(), &mut rng).unwrap_err();
        assert!(matches!(err, SurfaceError::QubitOutOfRange { qubit: 9, max: 8 }));
        assert!(program.is_empty());
    }

    #[test]
    fn test_random_target_is_data_qubit() {
        let (lattice, _, mut rng) = setup();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let q = DataTarget::Random.resolve(&lattice, &mut rng).unwrap();
            assert!(q < lattice.num_data());
            seen.insert(q);
        }
        assert_eq!(seen.len(), lattice.num_data());
    }

    #[test]
    fn test_random_target_reproducible() {
        let lattice = Lattice::new(5).unwrap();
        let a = DataTarget::Random
            .resolve(&lattice, &mut ChaCha8Rng::seed_from_u64(11))
            .unwrap();
        let b = DataTarget::Random
            .resolve(&lattice, &mut ChaCha8Rng::seed_from_u64(11))
            .unwrap();
        assert_eq!(a, b);
    }
}
