//! Fault sweep experiments
//!
//! Gantree: L5_Experiment → FaultSweep
//!
//! For every data qubit: fresh memory, rounds, one fault on that qubit,
//! remaining rounds, logical-Z readout and decode.

use crate::config::MemoryConfig;
use crate::decoder::DecodeReport;
use crate::injector::DataTarget;
use crate::memory::SurfaceMemory;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use surface_backend::ExecutionService;
use surface_core::{Bitstring, SurfaceError, SurfaceResult};

/// Build, execute and decode one memory run
/// Gantree: run_memory(config, service, target) -> Result<Vec<DecodeReport>> // 단일 실행
///
/// Emits `config.rounds` rounds with the configured fault on `target`
/// after the first half; returns one report per shot.
pub fn run_memory(
    config: &MemoryConfig,
    service: &dyn ExecutionService,
    target: Option<DataTarget>,
) -> SurfaceResult<Vec<DecodeReport>> {
    config.validate()?;

    let rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut memory = SurfaceMemory::with_rng(config.distance, rng)?;

    let before = config.rounds_before_fault();
    memory.stabilize_n(before)?;
    if let (Some(fault), Some(target)) = (config.fault.to_fault(), target) {
        memory.inject(fault, target)?;
    }
    memory.stabilize_n(config.rounds - before)?;

    memory.finalize()?.run_shots(service, config.shots)
}

/// Result for one swept data qubit
/// Gantree: SweepEntry // 큐비트별 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEntry {
    /// Data qubit carrying the fault
    pub qubit: usize,
    /// Decoded bit of the first shot
    pub logical: u8,
    /// Aggregate syndrome of the first shot
    pub aggregate: Bitstring,
    /// Shots decoding to 1
    pub error_shots: u64,
    /// Shots executed
    pub shots: u64,
}

/// Fault sweep report
/// Gantree: SweepReport // 스윕 보고서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Configuration the sweep ran with
    pub config: MemoryConfig,
    /// One entry per data qubit
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    /// Total shots decoding to 1
    pub fn logical_error_count(&self) -> u64 {
        self.entries.iter().map(|e| e.error_shots).sum()
    }

    /// Fraction of all shots decoding to 1
    pub fn logical_error_rate(&self) -> f64 {
        let shots: u64 = self.entries.iter().map(|e| e.shots).sum();
        if shots == 0 {
            return 0.0;
        }
        self.logical_error_count() as f64 / shots as f64
    }

    /// Qubits whose first shot decoded to 1
    pub fn failing_qubits(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.logical == 1)
            .map(|e| e.qubit)
            .collect()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SurfaceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.config)?;
        writeln!(f, "  qubit  logical  errors/shots  syndrome")?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:>5}  {:>7}  {:>6}/{:<5}  {}",
                e.qubit, e.logical, e.error_shots, e.shots, e.aggregate
            )?;
        }
        write!(f, "  logical error rate: {:.4}", self.logical_error_rate())
    }
}

/// Single-fault sweep over every data qubit
/// Gantree: FaultSweep // 오류 스윕
pub struct FaultSweep;

impl FaultSweep {
    /// Run the sweep
    /// Gantree: run(config, service) -> Result<SweepReport> // 스윕 실행
    pub fn run(config: &MemoryConfig, service: &dyn ExecutionService) -> SurfaceResult<SweepReport> {
        config.validate()?;
        log::info!("fault sweep start: {} on {}", config, service.name());

        let num_data = config.distance * config.distance;
        let mut entries = Vec::with_capacity(num_data);

        for qubit in 0..num_data {
            let mut run_config = config.clone();
            run_config.seed = config.seed_for(qubit);

            let reports = run_memory(&run_config, service, Some(DataTarget::Index(qubit)))?;
            let first = reports.first().ok_or_else(|| {
                SurfaceError::ExecutionFailure(format!("no outcomes for qubit {}", qubit))
            })?;

            entries.push(SweepEntry {
                qubit,
                logical: first.logical,
                aggregate: first.aggregate.clone(),
                error_shots: reports.iter().filter(|r| r.logical == 1).count() as u64,
                shots: reports.len() as u64,
            });
        }

        let report = SweepReport {
            config: config.clone(),
            entries,
        };
        log::info!(
            "fault sweep done: {} logical errors, rate {:.4}",
            report.logical_error_count(),
            report.logical_error_rate()
        );
        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================
