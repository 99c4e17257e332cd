//! # SURFMEM Backend
//!
//! Execution services for SURFMEM gate programs.
//!
//! ## Gantree Architecture
//!
//! ```text
//! surface_backend // L2: Backend (완료)
//!     ExecutionService // 실행 서비스 trait + 결과 타입 (완료)
//!     StabilizerBackend // CHP 테이블 시뮬레이터 (완료)
//!     StatevectorBackend // 상태벡터 시뮬레이터 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use surface_backend::prelude::*;
//! use surface_core::Program;
//!
//! let mut program = Program::new();
//! program.add_qreg("q", 2).unwrap();
//! let out = program.add_creg("out", 2).unwrap();
//! program.h(0).unwrap();
//! program.cx(0, 1).unwrap();
//! program.measure_into(&[0, 1], out).unwrap();
//!
//! let backend = StabilizerBackend::new().with_seed(42);
//! let result = backend.execute(&program, 100).unwrap();
//! for outcome in &result.outcomes {
//!     let bits = outcome.register(out).unwrap();
//!     assert_eq!(bits.is_set(0), bits.is_set(1));
//! }
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Execution types and service trait (Gantree: L2_Backend → ExecutionService)
pub mod execution;

/// Stabilizer tableau service (Gantree: L2_Backend → StabilizerBackend)
pub mod stabilizer;

/// State-vector service (Gantree: L2_Backend → StatevectorBackend)
pub mod statevector;

// ============================================================================
// Re-exports
// ============================================================================

pub use execution::{
    Counts, ExecutionMetadata, ExecutionResult, ExecutionService, MeasurementOutcome,
};
pub use stabilizer::{StabilizerBackend, Tableau};
pub use statevector::StatevectorBackend;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use surface_backend::prelude::*;
    //! ```

    pub use crate::execution::{
        Counts, ExecutionMetadata, ExecutionResult, ExecutionService, MeasurementOutcome,
    };
    pub use crate::stabilizer::StabilizerBackend;
    pub use crate::statevector::StatevectorBackend;
}

// ============================================================================
// Integration Tests
// ============================================================================
