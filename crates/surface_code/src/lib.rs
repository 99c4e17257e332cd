//! # SURFMEM Code
//!
//! Rotated surface code memory: lattice geometry, stabilization rounds,
//! fault injection, and chain decoding of the logical-Z readout.
//!
//! ## Gantree Architecture
//!
//! ```text
//! surface_code // L3~L5: Code + Memory + Experiment (완료)
//!     L3_Code // 코드 구조 (완료)
//!         Lattice // 격자/면 생성 (완료)
//!         RoundEmitter // 안정화 라운드 (완료)
//!         NoiseMatrix // 무작위 오류 행렬 (완료)
//!         ErrorInjector // 오류 주입 (완료)
//!         ChainDecoder // 체인 디코더 (완료)
//!     L4_Memory // 메모리 실행 (완료)
//!         SurfaceMemory // 빌더 + 봉인 (완료)
//!         MemoryConfig // 설정 (완료)
//!     L5_Experiment // 실험 (완료)
//!         FaultSweep // 큐비트별 오류 스윕 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use surface_code::prelude::*;
//! use surface_backend::StabilizerBackend;
//!
//! let service = StabilizerBackend::new().with_seed(42);
//!
//! let mut memory = SurfaceMemory::with_seed(3, 42).unwrap();
//! memory.stabilize().unwrap();
//! memory.bit_flip(DataTarget::Index(0)).unwrap();
//! memory.stabilize().unwrap();
//!
//! // A single bit flip is corrected
//! assert_eq!(memory.measure_z(&service).unwrap(), 0);
//! ```
//!
//! ## Fault Sweep
//!
//! ```rust
//! use surface_code::prelude::*;
//!
//! let config = MemoryConfig::default_d3().with_seed(1);
//! let service = config.build_backend();
//! let report = FaultSweep::run(&config, service.as_ref()).unwrap();
//! assert_eq!(report.logical_error_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Lattice geometry (Gantree: L3_Code → Lattice)
pub mod lattice;

/// Round emission (Gantree: L3_Code → RoundEmitter)
pub mod rounds;

/// Random error matrices (Gantree: L3_Code → NoiseMatrix)
pub mod noise;

/// Fault injection (Gantree: L3_Code → ErrorInjector)
pub mod injector;

/// Chain decoder (Gantree: L3_Code → ChainDecoder)
pub mod decoder;

/// Memory builder (Gantree: L4_Memory → SurfaceMemory)
pub mod memory;

/// Run configuration (Gantree: L4_Memory → MemoryConfig)
pub mod config;

/// Fault sweeps (Gantree: L5_Experiment → FaultSweep)
pub mod experiment;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{BackendKind, FaultKind, MemoryConfig};
pub use decoder::{ChainDecoder, DecodeReport};
pub use experiment::{run_memory, FaultSweep, SweepEntry, SweepReport};
pub use injector::{DataTarget, Fault, InjectedFault};
pub use lattice::{Face, FaceLocation, Lattice, StabilizerKind};
pub use memory::{FinalizedMemory, SurfaceMemory};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use surface_code::prelude::*;
    //! ```

    pub use crate::config::{BackendKind, FaultKind, MemoryConfig};
    pub use crate::decoder::{ChainDecoder, DecodeReport};
    pub use crate::experiment::{run_memory, FaultSweep, SweepReport};
    pub use crate::injector::{DataTarget, Fault};
    pub use crate::lattice::{Lattice, StabilizerKind};
    pub use crate::memory::{FinalizedMemory, SurfaceMemory};
    pub use surface_backend::{ExecutionService, MeasurementOutcome};
    pub use surface_core::{SurfaceError, SurfaceResult};
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
    use surface_backend::{ExecutionResult, StabilizerBackend, StatevectorBackend};
    use surface_core::{Bitstring, Program};

    /// Service that replays a fixed counts key, ignoring the program
    struct ReplayService {
        key: &'static str,
    }

    impl ExecutionService for ReplayService {
        fn name(&self) -> &str {
            "replay"
        }

        fn max_qubits(&self) -> usize {
            usize::MAX
        }

        fn execute(&self, program: &Program, shots: u64) -> SurfaceResult<ExecutionResult> {
            self.check_request(program, shots)?;
            let outcome = MeasurementOutcome::from_counts_key(self.key, &program.creg_widths())?;
            Ok(ExecutionResult::new(vec![outcome; shots as usize], self.name()))
        }
    }

    struct FailingService;

    impl ExecutionService for FailingService {
        fn name(&self) -> &str {
            "offline"
        }

        fn max_qubits(&self) -> usize {
            0
        }

        fn execute(&self, _program: &Program, _shots: u64) -> SurfaceResult<ExecutionResult> {
            Err(SurfaceError::ExecutionFailure("service unavailable".into()))
        }
    }

    fn d3_trace() -> FinalizedMemory {
        let mut memory = SurfaceMemory::with_seed(3, 0).unwrap();
        memory.stabilize().unwrap();
        memory.bit_flip(DataTarget::Index(0)).unwrap();
        memory.stabilize().unwrap();
        memory.finalize().unwrap()
    }

    #[test]
    fn test_d3_trace_on_both_services() {
        let finalized = d3_trace();
        let services: Vec<Box<dyn ExecutionService>> = vec![
            Box::new(StabilizerBackend::new().with_seed(1)),
            Box::new(StatevectorBackend::new().with_seed(1)),
        ];
        for service in &services {
            let report = finalized.run(service.as_ref()).unwrap();
            assert_eq!(report.aggregate.ones(), vec![0], "{}", service.name());
            assert_eq!(report.flips, 1);
            assert!(report.ancilla);
            assert_eq!(report.logical, 0);
        }
    }

    #[test]
    fn test_d3_trace_from_counts_key() {
        // X faces may fire in round 0 and repeat in round 1; only
        // the XOR of the two rounds and the ancilla matter
        let finalized = d3_trace();
        let service = ReplayService {
            key: "1 01010111 01010110",
        };
        let report = finalized.run(&service).unwrap();
        assert_eq!(report.aggregate, Bitstring::parse("00000001").unwrap());
        assert_eq!(report.logical, 0);
    }

    #[test]
    fn test_shape_mismatch_from_service() {
        // Service reports one round too few
        let finalized = d3_trace();
        let outcome = MeasurementOutcome::from_counts_key("1 00000000", &[8, 1]).unwrap();
        let err = finalized.decode(&outcome).unwrap_err();
        assert!(matches!(err, SurfaceError::ShapeMismatch { .. }));
        assert_eq!(err.stage(), surface_core::Stage::Decode);
    }

    #[test]
    fn test_execution_failure_propagates() {
        let err = d3_trace().run(&FailingService).unwrap_err();
        assert!(matches!(err, SurfaceError::ExecutionFailure(_)));
    }

    #[test]
    fn test_logical_x_all_distances() {
        let service = StabilizerBackend::new().with_seed(3);
        for d in [3usize, 5, 7, 9] {
            let mut memory = SurfaceMemory::with_seed(d, 3).unwrap();
            memory.stabilize().unwrap();
            memory.logical_x().unwrap();
            memory.stabilize().unwrap();
            assert_eq!(memory.measure_z(&service).unwrap(), 1, "d={}", d);
        }
    }

    #[test]
    fn test_distance_one_memory() {
        let service = StabilizerBackend::new();
        let mut memory = SurfaceMemory::with_seed(1, 0).unwrap();
        memory.stabilize_n(2).unwrap();
        memory.bit_flip(DataTarget::Index(0)).unwrap();
        assert_eq!(memory.measure_z(&service).unwrap(), 1);
    }

    #[test]
    fn test_qasm_export_of_memory() {
        let qasm = d3_trace().program().to_qasm();
        assert!(qasm.contains("qreg data[9];"));
        assert!(qasm.contains("qreg syndrome[8];"));
        assert!(qasm.contains("qreg ancilla[1];"));
        assert!(qasm.contains("creg readout0[8];"));
        assert!(qasm.contains("creg measurement[1];"));
        assert!(qasm.contains("x data[0];"));
        assert!(qasm.contains("measure ancilla[0] -> measurement[0];"));
    }
}
