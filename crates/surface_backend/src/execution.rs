//! Execution types and service trait
//!
//! Gantree: L2_Backend → ExecutionService
//!
//! Defines the interface an execution service offers to a memory run,
//! and the per-shot outcome vector it hands back.

use surface_core::limits::MAX_SHOTS;
use surface_core::{Bitstring, Clbit, Program, SurfaceError, SurfaceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Measurement counts keyed by Qiskit-style register string
pub type Counts = HashMap<String, u64>;

// ============================================================================
// Measurement Outcome
// ============================================================================

/// Outcome of one shot: one bit vector per classical register,
/// in declaration order
/// Gantree: MeasurementOutcome // 샷별 측정 결과
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Register values, index = register declaration index
    pub registers: Vec<Bitstring>,
}

impl MeasurementOutcome {
    /// Create from register values
    pub fn new(registers: Vec<Bitstring>) -> Self {
        Self { registers }
    }

    /// All-zero outcome for the given register widths
    pub fn zeros(widths: &[usize]) -> Self {
        Self {
            registers: widths.iter().map(|&w| Bitstring::zeros(w)).collect(),
        }
    }

    /// Get number of registers
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Register by declaration index
    pub fn register(&self, index: usize) -> Option<&Bitstring> {
        self.registers.get(index)
    }

    /// Last declared register
    pub fn last(&self) -> Option<&Bitstring> {
        self.registers.last()
    }

    /// Record one measured bit
    pub fn set_bit(&mut self, clbit: Clbit, value: bool) -> SurfaceResult<()> {
        let count = self.registers.len();
        self.registers
            .get_mut(clbit.register)
            .ok_or(SurfaceError::UnknownRegister {
                index: clbit.register,
                count,
            })?
            .set(clbit.bit, value)
    }

    /// Qiskit-style counts key: last declared register first,
    /// registers separated by single spaces
    /// Gantree: to_counts_key(&self) -> String // 카운트 키 변환
    pub fn to_counts_key(&self) -> String {
        self.registers
            .iter()
            .rev()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a Qiskit-style counts key, checking register widths
    /// Gantree: from_counts_key(key, widths) -> Result<Self> // 카운트 키 파싱
    pub fn from_counts_key(key: &str, widths: &[usize]) -> SurfaceResult<Self> {
        let mut fields: Vec<&str> = key.split_whitespace().collect();
        if fields.len() != widths.len() {
            return Err(SurfaceError::shape("register count", widths.len(), fields.len()));
        }
        fields.reverse();

        let registers = fields
            .into_iter()
            .zip(widths)
            .map(|(field, &width)| {
                let bits = Bitstring::parse(field)?;
                if bits.len() != width {
                    return Err(SurfaceError::shape("register width", width, bits.len()));
                }
                Ok(bits)
            })
            .collect::<SurfaceResult<Vec<_>>>()?;

        Ok(Self { registers })
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_counts_key())
    }
}

// ============================================================================
// Execution Result
// ============================================================================

/// Result of program execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// One outcome per shot, in execution order
    pub outcomes: Vec<MeasurementOutcome>,

    /// Number of shots executed
    pub shots: u64,

    /// Execution metadata
    pub metadata: ExecutionMetadata,
}

/// Execution metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Service name
    pub backend: String,

    /// Execution time in milliseconds
    pub execution_time_ms: Option<u64>,

    /// Whether simulation was used
    pub simulated: bool,

    /// Seed used (if any)
    pub seed: Option<u64>,

    /// Additional info
    pub extra: HashMap<String, String>,
}

impl ExecutionResult {
    /// Create new execution result
    pub fn new(outcomes: Vec<MeasurementOutcome>, backend: &str) -> Self {
        let shots = outcomes.len() as u64;
        Self {
            outcomes,
            shots,
            metadata: ExecutionMetadata {
                backend: backend.to_string(),
                simulated: true,
                ..Default::default()
            },
        }
    }

    /// Outcome of the first shot
    pub fn first(&self) -> Option<&MeasurementOutcome> {
        self.outcomes.first()
    }

    /// Aggregate outcomes into counts keyed by Qiskit-style strings
    /// Gantree: counts(&self) -> Counts // 카운트 집계
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.to_counts_key()).or_insert(0) += 1;
        }
        counts
    }

    /// Get probability of a specific counts key
    pub fn probability(&self, key: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        let count = self
            .outcomes
            .iter()
            .filter(|o| o.to_counts_key() == key)
            .count();
        count as f64 / self.shots as f64
    }

    /// Get most frequent counts key
    pub fn most_frequent(&self) -> Option<(String, u64)> {
        self.counts().into_iter().max_by_key(|(_, count)| *count)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SurfaceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecutionResult(backend={}, shots={}, unique={})",
            self.metadata.backend,
            self.shots,
            self.counts().len()
        )
    }
}

// ============================================================================
// Execution Service Trait
// ============================================================================

/// Execution service trait
/// Gantree: ExecutionService // 실행 서비스 인터페이스
pub trait ExecutionService: Send + Sync {
    /// Get service name
    fn name(&self) -> &str;

    /// Largest program (in qubits) the service accepts
    fn max_qubits(&self) -> usize;

    /// Execute a program
    /// Gantree: execute(program, shots) -> Result<ExecutionResult>
    fn execute(&self, program: &Program, shots: u64) -> SurfaceResult<ExecutionResult>;

    /// Execute multiple programs (batch)
    fn execute_batch(&self, programs: &[Program], shots: u64) -> SurfaceResult<Vec<ExecutionResult>> {
        programs.iter().map(|p| self.execute(p, shots)).collect()
    }

    /// Check if service is a simulator
    fn is_simulator(&self) -> bool {
        true
    }

    /// Get maximum shots per execution
    fn max_shots(&self) -> u64 {
        MAX_SHOTS
    }

    /// Reject requests the service cannot run
    fn check_request(&self, program: &Program, shots: u64) -> SurfaceResult<()> {
        if shots == 0 {
            return Err(SurfaceError::ExecutionFailure(format!(
                "{}: shot count must be positive",
                self.name()
            )));
        }
        if shots > self.max_shots() {
            return Err(SurfaceError::ExecutionFailure(format!(
                "{}: {} shots exceeds limit {}",
                self.name(),
                shots,
                self.max_shots()
            )));
        }
        if program.num_qubits() > self.max_qubits() {
            return Err(SurfaceError::ExecutionFailure(format!(
                "{}: program needs {} qubits, service supports {}",
                self.name(),
                program.num_qubits(),
                self.max_qubits()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
