//! Error types for SURFMEM
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every failure of a memory run is reported through [`SurfaceError`],
//! tagged with the [`Stage`] of the run that raised it.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for SURFMEM
/// Gantree: SurfaceError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// Code distance is even or zero
    /// Gantree: InvalidDistance(usize) // 홀수 거리
    #[error("Invalid code distance {0}: must be odd and positive")]
    InvalidDistance(usize),

    // ========================================================================
    // Program Emission Errors
    // ========================================================================
    /// Qubit index out of range
    /// Gantree: QubitOutOfRange{{q,max}} // 큐비트 범위
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but program has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Classical register index not declared in the program
    #[error("Unknown classical register {index}: program declares {count}")]
    UnknownRegister { index: usize, count: usize },

    /// Register name already declared
    #[error("Register '{0}' is already declared")]
    DuplicateRegister(String),

    /// Classical bit outside its register
    #[error("Bit {bit} out of range for register '{register}' of width {width}")]
    ClbitOutOfRange {
        register: String,
        bit: usize,
        width: usize,
    },

    /// Gate operands are malformed (e.g. CNOT control equals target)
    #[error("Invalid gate {gate}: {reason}")]
    InvalidGate { gate: String, reason: String },

    /// Matrix is not a valid single-qubit unitary
    #[error("Invalid unitary: {0}")]
    InvalidUnitary(String),

    /// Invalid bitstring format
    #[error("Invalid bitstring '{0}': must contain only '0' and '1'")]
    InvalidBitstring(String),

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Execution service could not run the program
    /// Gantree: ExecutionFailure(String) // 실행 실패
    #[error("Execution failure: {0}")]
    ExecutionFailure(String),

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// Measurement outcomes do not match the program that produced them
    /// Gantree: ShapeMismatch{{item,expected,actual}} // 형상 불일치
    #[error("Shape mismatch in {item}: expected {expected}, got {actual}")]
    ShapeMismatch {
        item: String,
        expected: usize,
        actual: usize,
    },

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for SURFMEM operations
/// Gantree: SurfaceResult<T> // type alias
pub type SurfaceResult<T> = Result<T, SurfaceError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for SurfaceError {
    fn from(err: serde_json::Error) -> Self {
        SurfaceError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for SurfaceError {
    fn from(err: std::io::Error) -> Self {
        SurfaceError::FileError(err.to_string())
    }
}

// ============================================================================
// Run Stage
// ============================================================================

/// Stage of a memory run in which an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Lattice construction
    Construction,
    /// Appending operations to the program
    Emission,
    /// Hand-off to the execution service
    Execution,
    /// Syndrome decoding
    Decode,
    /// Loading or validating a run configuration
    Configuration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Construction => "construction",
            Stage::Emission => "emission",
            Stage::Execution => "execution",
            Stage::Decode => "decode",
            Stage::Configuration => "configuration",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl SurfaceError {
    /// Stage of the run this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            SurfaceError::InvalidDistance(_) => Stage::Construction,
            SurfaceError::QubitOutOfRange { .. }
            | SurfaceError::GateQubitMismatch { .. }
            | SurfaceError::UnknownRegister { .. }
            | SurfaceError::DuplicateRegister(_)
            | SurfaceError::ClbitOutOfRange { .. }
            | SurfaceError::InvalidGate { .. }
            | SurfaceError::InvalidUnitary(_) => Stage::Emission,
            SurfaceError::ExecutionFailure(_) => Stage::Execution,
            SurfaceError::ShapeMismatch { .. } | SurfaceError::InvalidBitstring(_) => {
                Stage::Decode
            }
            SurfaceError::InvalidConfig(_)
            | SurfaceError::JsonError(_)
            | SurfaceError::FileError(_) => Stage::Configuration,
        }
    }

    /// Check if error came from program emission
    pub fn is_emission_error(&self) -> bool {
        self.stage() == Stage::Emission
    }

    /// Shorthand for a register-shape mismatch
    pub fn shape(item: impl Into<String>, expected: usize, actual: usize) -> Self {
        SurfaceError::ShapeMismatch {
            item: item.into(),
            expected,
            actual,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
