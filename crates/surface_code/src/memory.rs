//! Surface code memory experiment
//!
//! Gantree: L4_Memory → SurfaceMemory
//!
//! Owns one lattice and one growing gate program. Rounds, faults and
//! logical operators are appended in call order; [`SurfaceMemory::finalize`]
//! closes the program with the logical-Z readout and seals it.

use crate::decoder::{ChainDecoder, DecodeReport};
use crate::injector::{inject, DataTarget, Fault, InjectedFault};
use crate::lattice::Lattice;
use crate::rounds::{emit_logical_readout, emit_round, memory_program};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use surface_backend::{ExecutionResult, ExecutionService, MeasurementOutcome};
use surface_core::{Program, SurfaceError, SurfaceResult};

/// Memory under construction
/// Gantree: SurfaceMemory<R> // 메모리 빌더
pub struct SurfaceMemory<R: Rng = ChaCha8Rng> {
    /// Lattice geometry
    lattice: Lattice,

    /// Program built so far
    program: Program,

    /// Completed stabilization rounds
    /// Gantree: rounds: usize // 라운드 카운터
    rounds: usize,

    /// Applied faults, in order
    faults: Vec<InjectedFault>,

    /// Source for random targets and error matrices
    rng: R,
}

impl SurfaceMemory<ChaCha8Rng> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a memory of distance `d` with an entropy-seeded source
    /// Gantree: new(d) -> Result<Self> // 생성자
    pub fn new(distance: usize) -> SurfaceResult<Self> {
        Self::with_rng(distance, ChaCha8Rng::from_entropy())
    }

    /// Create a reproducible memory
    pub fn with_seed(distance: usize, seed: u64) -> SurfaceResult<Self> {
        Self::with_rng(distance, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SurfaceMemory<R> {
    /// Create a memory with a caller-supplied random source
    pub fn with_rng(distance: usize, rng: R) -> SurfaceResult<Self> {
        let lattice = Lattice::new(distance)?;
        let program = memory_program(&lattice)?;
        Ok(Self {
            lattice,
            program,
            rounds: 0,
            faults: Vec::new(),
            rng,
        })
    }

    // ========================================================================
    // Program Construction
    // ========================================================================

    /// Append one stabilization round
    /// Gantree: stabilize(&mut) -> Result<&mut Self> // 안정화
    pub fn stabilize(&mut self) -> SurfaceResult<&mut Self> {
        let before = self.program.gate_count();
        emit_round(&mut self.program, &self.lattice, self.rounds)?;
        log::debug!(
            "round {} emitted: {} operations",
            self.rounds,
            self.program.gate_count() - before
        );
        self.rounds += 1;
        Ok(self)
    }

    /// Append `n` stabilization rounds
    pub fn stabilize_n(&mut self, n: usize) -> SurfaceResult<&mut Self> {
        for _ in 0..n {
            self.stabilize()?;
        }
        Ok(self)
    }

    /// Apply a fault to a data qubit
    /// Gantree: inject(&mut, fault, target) -> Result<&mut Self> // 오류 주입
    pub fn inject(&mut self, fault: Fault, target: DataTarget) -> SurfaceResult<&mut Self> {
        let qubit = inject(&mut self.program, &self.lattice, fault, target, &mut self.rng)?;
        log::debug!("{} on data qubit {} after round {}", fault, qubit, self.rounds);
        self.faults.push(InjectedFault {
            fault,
            qubit,
            after_round: self.rounds,
        });
        Ok(self)
    }

    /// Pauli X on a data qubit
    pub fn bit_flip(&mut self, target: DataTarget) -> SurfaceResult<&mut Self> {
        self.inject(Fault::BitFlip, target)
    }

    /// Pauli Z on a data qubit
    pub fn phase_flip(&mut self, target: DataTarget) -> SurfaceResult<&mut Self> {
        self.inject(Fault::PhaseFlip, target)
    }

    /// Random orthogonal error on a data qubit
    pub fn unitary_error(&mut self, target: DataTarget) -> SurfaceResult<&mut Self> {
        self.inject(Fault::Unitary, target)
    }

    /// Logical X: X on the first data column, then barrier
    /// Gantree: logical_x(&mut) -> Result<&mut Self> // 논리 X
    pub fn logical_x(&mut self) -> SurfaceResult<&mut Self> {
        for q in self.lattice.logical_x_support() {
            self.program.x(q)?;
        }
        self.program.barrier_all()?;
        Ok(self)
    }

    /// Logical Z: Z on the first data row, then barrier
    /// Gantree: logical_z(&mut) -> Result<&mut Self> // 논리 Z
    pub fn logical_z(&mut self) -> SurfaceResult<&mut Self> {
        for q in self.lattice.logical_z_support() {
            self.program.z(q)?;
        }
        self.program.barrier_all()?;
        Ok(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of rounds emitted so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Lattice geometry
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Program built so far
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Faults applied so far
    pub fn faults(&self) -> &[InjectedFault] {
        &self.faults
    }

    // ========================================================================
    // Readout
    // ========================================================================

    /// Close the program with the logical-Z readout
    /// Gantree: finalize(self) -> Result<FinalizedMemory> // 프로그램 봉인
    pub fn finalize(mut self) -> SurfaceResult<FinalizedMemory> {
        emit_logical_readout(&mut self.program, &self.lattice)?;
        Ok(FinalizedMemory {
            decoder: ChainDecoder::new(self.lattice.distance(), self.rounds),
            lattice: self.lattice,
            program: self.program,
            rounds: self.rounds,
            faults: self.faults,
        })
    }

    /// Finalize, run one shot, and decode the logical bit
    /// Gantree: measure_z(self, service) -> Result<u8> // 논리 Z 측정
    pub fn measure_z(self, service: &dyn ExecutionService) -> SurfaceResult<u8> {
        Ok(self.finalize()?.run(service)?.logical)
    }
}

/// Sealed memory program, ready for execution and decoding
/// Gantree: FinalizedMemory // 봉인된 프로그램
#[derive(Debug, Clone)]
pub struct FinalizedMemory {
    lattice: Lattice,
    program: Program,
    rounds: usize,
    faults: Vec<InjectedFault>,
    decoder: ChainDecoder,
}

impl FinalizedMemory {
    /// Hand the program to an execution service
    pub fn execute(&self, service: &dyn ExecutionService, shots: u64) -> SurfaceResult<ExecutionResult> {
        service.execute(&self.program, shots)
    }

    /// Decode one shot's outcome
    pub fn decode(&self, outcome: &MeasurementOutcome) -> SurfaceResult<DecodeReport> {
        self.decoder.decode(outcome)
    }

    /// Execute one shot and decode it
    /// Gantree: run(service) -> Result<DecodeReport> // 실행+디코딩
    pub fn run(&self, service: &dyn ExecutionService) -> SurfaceResult<DecodeReport> {
        let result = self.execute(service, 1)?;
        let outcome = result.first().ok_or_else(|| {
            SurfaceError::ExecutionFailure(format!("{} returned no outcomes", service.name()))
        })?;
        self.decode(outcome)
    }

    /// Execute `shots` shots and decode each
    pub fn run_shots(&self, service: &dyn ExecutionService, shots: u64) -> SurfaceResult<Vec<DecodeReport>> {
        let result = self.execute(service, shots)?;
        if result.outcomes.len() as u64 != shots {
            return Err(SurfaceError::ExecutionFailure(format!(
                "{} returned {} outcomes for {} shots",
                service.name(),
                result.outcomes.len(),
                shots
            )));
        }
        result.outcomes.iter().map(|o| self.decode(o)).collect()
    }

    /// Sealed program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Lattice geometry
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of stabilization rounds in the program
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Faults applied while building
    pub fn faults(&self) -> &[InjectedFault] {
        &self.faults
    }
}

// ============================================================================
// Tests
// ============================================================================
