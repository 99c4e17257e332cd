//! Constants for SURFMEM
//!
//! Gantree: L0_Foundation → Constants
//!
//! Register naming, numeric tolerances, and execution limits.

// ============================================================================
// Register Names
// Gantree: registers // 레지스터 이름
// ============================================================================

pub mod registers {
    //! Names of the quantum and classical registers in a memory program

    /// Data qubit register
    pub const DATA: &str = "data";

    /// Syndrome qubit register
    pub const SYNDROME: &str = "syndrome";

    /// Ancilla register used for logical readout
    pub const ANCILLA: &str = "ancilla";

    /// Classical register receiving the logical readout bit
    pub const MEASUREMENT: &str = "measurement";

    /// Prefix of per-round syndrome registers (`readout0`, `readout1`, ...)
    pub const READOUT_PREFIX: &str = "readout";

    /// Name of the round register for round `n`
    pub fn readout(round: usize) -> String {
        format!("{}{}", READOUT_PREFIX, round)
    }
}

// ============================================================================
// Numeric Constants
// Gantree: numeric // 수치 상수
// ============================================================================

pub mod numeric {
    //! Tolerances for matrix checks

    /// Tolerance for unitarity checks
    pub const UNITARY_TOLERANCE: f64 = 1e-9;

    /// Probabilities below this are treated as zero when sampling
    pub const PROBABILITY_FLOOR: f64 = 1e-12;
}

// ============================================================================
// Execution Limits
// Gantree: limits // 실행 한계
// ============================================================================

pub mod limits {
    //! Default limits of the bundled execution services

    /// Default qubit limit of the state-vector service (2^24 amplitudes)
    pub const STATEVECTOR_MAX_QUBITS: usize = 24;

    /// Default qubit limit of the stabilizer service
    pub const STABILIZER_MAX_QUBITS: usize = 4096;

    /// Default shot count for a memory run
    pub const DEFAULT_SHOTS: u64 = 1;

    /// Maximum shots per execution
    pub const MAX_SHOTS: u64 = 100_000;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_names() {
        assert_eq!(registers::readout(0), "readout0");
        assert_eq!(registers::readout(12), "readout12");
    }

    #[test]
    fn test_limits() {
        // d = 3 needs 2 * 9 = 18 qubits
        assert!(limits::STATEVECTOR_MAX_QUBITS >= 18);
        assert!(limits::STABILIZER_MAX_QUBITS > limits::STATEVECTOR_MAX_QUBITS);
    }
}
