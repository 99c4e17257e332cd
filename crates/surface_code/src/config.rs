//! Memory run configuration
//!
//! Gantree: L4_Memory → MemoryConfig
//!
//! Distance, rounds, shots, fault, and execution service for a memory
//! run or fault sweep. Loadable from JSON and from `SURFMEM_*`
//! environment variables.

use crate::injector::Fault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use surface_backend::{ExecutionService, StabilizerBackend, StatevectorBackend};
use surface_core::limits::{DEFAULT_SHOTS, MAX_SHOTS, STATEVECTOR_MAX_QUBITS};
use surface_core::{SurfaceError, SurfaceResult};

/// Environment variable overriding the distance
pub const ENV_DISTANCE: &str = "SURFMEM_DISTANCE";
/// Environment variable overriding the round count
pub const ENV_ROUNDS: &str = "SURFMEM_ROUNDS";
/// Environment variable overriding the seed
pub const ENV_SEED: &str = "SURFMEM_SEED";
/// Environment variable overriding the backend
pub const ENV_BACKEND: &str = "SURFMEM_BACKEND";

/// Execution service selection
/// Gantree: BackendKind // 백엔드 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackendKind {
    /// Stabilizer tableau (Clifford only, any distance)
    /// Gantree: Stabilizer // 스태빌라이저
    #[default]
    Stabilizer,

    /// Dense state vector (all gates, small distances)
    /// Gantree: Statevector // 상태벡터
    Statevector,
}

impl FromStr for BackendKind {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stabilizer" | "tableau" => Ok(BackendKind::Stabilizer),
            "statevector" | "state_vector" => Ok(BackendKind::Statevector),
            other => Err(SurfaceError::InvalidConfig(format!("unknown backend '{}'", other))),
        }
    }
}

/// Fault applied by a sweep
/// Gantree: FaultKind // 오류 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FaultKind {
    /// Pauli X
    #[default]
    BitFlip,
    /// Pauli Z
    PhaseFlip,
    /// Random orthogonal matrix
    Unitary,
    /// No fault
    None,
}

impl FaultKind {
    /// Fault to inject, if any
    pub fn to_fault(self) -> Option<Fault> {
        match self {
            FaultKind::BitFlip => Some(Fault::BitFlip),
            FaultKind::PhaseFlip => Some(Fault::PhaseFlip),
            FaultKind::Unitary => Some(Fault::Unitary),
            FaultKind::None => None,
        }
    }
}

/// Memory run configuration
/// Gantree: MemoryConfig // 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Code distance
    /// Gantree: distance: usize // 코드 거리 (3)
    pub distance: usize,

    /// Stabilization rounds per run
    /// Gantree: rounds: usize // 라운드 (2)
    pub rounds: usize,

    /// Shots per execution
    /// Gantree: shots: u64 // 샷 수 (1)
    pub shots: u64,

    /// Random seed
    /// Gantree: seed: Option<u64> // 시드
    pub seed: Option<u64>,

    /// Execution service
    pub backend: BackendKind,

    /// Fault injected between rounds
    pub fault: FaultKind,
}

impl MemoryConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Distance 3, two rounds, one shot, bit flips on the stabilizer service
    /// Gantree: default_d3() -> Self // 기본값
    pub fn default_d3() -> Self {
        Self {
            distance: 3,
            rounds: 2,
            shots: DEFAULT_SHOTS,
            seed: None,
            backend: BackendKind::Stabilizer,
            fault: FaultKind::BitFlip,
        }
    }

    /// Configuration for a specific distance
    pub fn for_distance(distance: usize) -> Self {
        Self::default_d3().with_distance(distance)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> SurfaceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> SurfaceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to JSON
    pub fn to_json_string(&self) -> SurfaceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Defaults overlaid with `SURFMEM_*` environment variables
    /// Gantree: from_env() -> Result<Self> // 환경 변수
    pub fn from_env() -> SurfaceResult<Self> {
        Self::default_d3().with_env_overrides()
    }

    /// Overlay `SURFMEM_*` environment variables
    pub fn with_env_overrides(self) -> SurfaceResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup
    fn with_overrides<F>(mut self, lookup: F) -> SurfaceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DISTANCE) {
            self.distance = parse_var(ENV_DISTANCE, &value)?;
        }
        if let Some(value) = lookup(ENV_ROUNDS) {
            self.rounds = parse_var(ENV_ROUNDS, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_BACKEND) {
            self.backend = value.parse()?;
        }
        Ok(self)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set distance
    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    /// Set rounds
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set number of shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set execution service
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set fault
    pub fn with_fault(mut self, fault: FaultKind) -> Self {
        self.fault = fault;
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Program qubits (`2d²`)
    pub fn num_qubits(&self) -> usize {
        2 * self.distance * self.distance
    }

    /// Rounds emitted before the fault; the rest follow it
    pub fn rounds_before_fault(&self) -> usize {
        self.rounds.div_ceil(2)
    }

    /// Seed for the run on data qubit `index`
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> SurfaceResult<()> {
        if self.distance == 0 || self.distance % 2 == 0 {
            return Err(SurfaceError::InvalidConfig(format!(
                "distance must be odd and positive, got {}",
                self.distance
            )));
        }

        if self.shots == 0 || self.shots > MAX_SHOTS {
            return Err(SurfaceError::InvalidConfig(format!(
                "shots must be in [1, {}], got {}",
                MAX_SHOTS, self.shots
            )));
        }

        if self.backend == BackendKind::Statevector && self.num_qubits() > STATEVECTOR_MAX_QUBITS {
            return Err(SurfaceError::InvalidConfig(format!(
                "statevector backend supports {} qubits, distance {} needs {}",
                STATEVECTOR_MAX_QUBITS,
                self.distance,
                self.num_qubits()
            )));
        }

        if self.backend == BackendKind::Stabilizer && self.fault == FaultKind::Unitary {
            return Err(SurfaceError::InvalidConfig(
                "unitary faults need the statevector backend".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the configured execution service
    /// Gantree: build_backend(&self) -> Box<dyn ExecutionService> // 서비스 생성
    pub fn build_backend(&self) -> Box<dyn ExecutionService> {
        match (self.backend, self.seed) {
            (BackendKind::Stabilizer, Some(seed)) => Box::new(StabilizerBackend::new().with_seed(seed)),
            (BackendKind::Stabilizer, None) => Box::new(StabilizerBackend::new()),
            (BackendKind::Statevector, Some(seed)) => Box::new(StatevectorBackend::new().with_seed(seed)),
            (BackendKind::Statevector, None) => Box::new(StatevectorBackend::new()),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> SurfaceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SurfaceError::InvalidConfig(format!("{}: cannot parse '{}'", key, value)))
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::default_d3()
    }
}

impl fmt::Display for MemoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryConfig(d={}, rounds={}, shots={}, backend={:?}, fault={:?})",
            self.distance, self.rounds, self.shots, self.backend, self.fault
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
