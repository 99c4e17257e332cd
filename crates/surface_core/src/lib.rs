//! # SURFMEM Core
//!
//! Core types, gates, and gate programs for surface code memory simulation.
//!
//! ## Gantree Architecture
//!
//! ```text
//! surface_core // L0+L1: Foundation + Program (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // 큐비트/클비트/비트열 (완료)
//!         Constants // 레지스터 이름/허용 오차 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Program // 프로그램 구조 (완료)
//!         Unitary // 2x2 유니터리 (완료)
//!         Gate // 게이트 enum (완료)
//!         Program // 레지스터 + 게이트 목록 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use surface_core::prelude::*;
//!
//! let mut program = Program::new();
//! let data = program.add_qreg("data", 2).unwrap();
//! let out = program.add_creg("out", 2).unwrap();
//!
//! program.h(data.start).unwrap();
//! program.cx(data.start, data.start + 1).unwrap();
//! program.measure_into(&data.qubits(), out).unwrap();
//!
//! assert_eq!(program.count_2q(), 1);
//! println!("{}", program.to_qasm());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Single-qubit unitaries (Gantree: L1_Program → Unitary)
pub mod unitary;

/// Program operations (Gantree: L1_Program → Gate)
pub mod gate;

/// Program structure (Gantree: L1_Program → Program)
pub mod program;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{limits, numeric, registers};
pub use error::{Stage, SurfaceError, SurfaceResult};
pub use gate::Gate;
pub use program::{ClassicalRegister, Program, QuantumRegister};
pub use types::{Bitstring, Clbit, QubitId, RegisterId};
pub use unitary::Matrix2;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use surface_core::prelude::*;
    //! ```

    pub use crate::constants::{limits, numeric, registers};
    pub use crate::error::{Stage, SurfaceError, SurfaceResult};
    pub use crate::gate::Gate;
    pub use crate::program::{ClassicalRegister, Program, QuantumRegister};
    pub use crate::types::{Bitstring, Clbit, QubitId, RegisterId};
    pub use crate::unitary::Matrix2;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_memory_register_layout() {
        // d = 3: 9 data, 8 syndrome, 1 ancilla
        let mut program = Program::new();
        let data = program.add_qreg(registers::DATA, 9).unwrap();
        let syndrome = program.add_qreg(registers::SYNDROME, 8).unwrap();
        let ancilla = program.add_qreg(registers::ANCILLA, 1).unwrap();

        assert_eq!(data.start, 0);
        assert_eq!(syndrome.start, 9);
        assert_eq!(ancilla.start, 17);
        assert_eq!(program.num_qubits(), 18);

        let r0 = program.add_creg(registers::readout(0), 8).unwrap();
        let m = program.add_creg(registers::MEASUREMENT, 1).unwrap();
        assert_eq!((r0, m), (0, 1));
        assert_eq!(program.creg_widths(), vec![8, 1]);
    }

    #[test]
    fn test_syndrome_round_program() {
        let mut program = Program::new();
        program.add_qreg(registers::DATA, 2).unwrap();
        program.add_qreg(registers::SYNDROME, 1).unwrap();
        let reg = program.add_creg(registers::readout(0), 1).unwrap();

        // ZZ parity check onto the syndrome qubit
        program.cx(0, 2).unwrap();
        program.cx(1, 2).unwrap();
        program.measure_into(&[2], reg).unwrap();
        program.reset(2).unwrap();
        program.barrier_all().unwrap();

        assert_eq!(program.count_2q(), 2);
        assert_eq!(program.count_measurements(), 1);
        assert!(program.is_clifford());

        let qasm = program.to_qasm();
        assert!(qasm.contains("cx data[0],syndrome[0];"));
        assert!(qasm.contains("measure syndrome[0] -> readout0[0];"));
        assert!(qasm.contains("barrier data[0],data[1],syndrome[0];"));
    }

    #[test]
    fn test_syndrome_xor() {
        let previous = Bitstring::parse("00000000").unwrap();
        let current = Bitstring::parse("00100001").unwrap();
        let diff = previous.xor(&current).unwrap();
        assert_eq!(diff.ones(), vec![0, 5]);
    }

    #[test]
    fn test_emission_errors_carry_stage() {
        let mut program = Program::new();
        program.add_qreg(registers::DATA, 1).unwrap();
        let err = program.h(5).unwrap_err();
        assert_eq!(err.stage(), Stage::Emission);
    }
}
