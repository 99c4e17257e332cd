//! State-vector execution service
//!
//! Gantree: L2_Backend → StatevectorBackend
//!
//! Dense amplitude simulation. Supports every program operation,
//! including custom unitaries, with mid-circuit measurement collapse.

use crate::execution::{ExecutionMetadata, ExecutionResult, ExecutionService, MeasurementOutcome};
use log::debug;
use num_complex::Complex64;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use surface_core::limits::STATEVECTOR_MAX_QUBITS;
use surface_core::numeric::PROBABILITY_FLOOR;
use surface_core::{Gate, Matrix2, Program, SurfaceResult};

/// State-vector execution service
/// Gantree: StatevectorBackend // 상태벡터 시뮬레이터
pub struct StatevectorBackend {
    /// Service name
    name: String,

    /// Qubit limit
    max_qubits: usize,

    /// Random seed
    seed: Option<u64>,
}

impl StatevectorBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new state-vector backend
    pub fn new() -> Self {
        Self {
            name: "surfmem_statevector".to_string(),
            max_qubits: STATEVECTOR_MAX_QUBITS,
            seed: None,
        }
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set qubit limit, capped at [`STATEVECTOR_MAX_QUBITS`]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(STATEVECTOR_MAX_QUBITS);
        self
    }

    /// Set service name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Simulate a single shot
    fn simulate_single_shot(
        &self,
        program: &Program,
        rng: &mut ChaCha8Rng,
    ) -> SurfaceResult<MeasurementOutcome> {
        let n = program.num_qubits();
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
        state[0] = Complex64::new(1.0, 0.0); // |00...0⟩
        let mut outcome = MeasurementOutcome::zeros(&program.creg_widths());

        for gate in program.gates() {
            match gate {
                Gate::H(q) => self.apply_h(&mut state, *q),
                Gate::X(q) => self.apply_x(&mut state, *q),
                Gate::Z(q) => self.apply_z(&mut state, *q),
                Gate::Unitary { qubit, matrix, .. } => self.apply_unitary(&mut state, *qubit, matrix),
                Gate::Cnot(c, t) => self.apply_cnot(&mut state, *c, *t),
                Gate::Measure { qubit, clbit } => {
                    let bit = self.measure_qubit(&mut state, *qubit, rng);
                    outcome.set_bit(*clbit, bit)?;
                }
                Gate::Reset(q) => {
                    if self.measure_qubit(&mut state, *q, rng) {
                        self.apply_x(&mut state, *q);
                    }
                }
                Gate::Barrier(_) => {}
            }
        }

        Ok(outcome)
    }

    /// Measure one qubit, collapsing the state
    /// Gantree: measure_qubit(state, q, rng) -> bool // 부분 측정 + 붕괴
    fn measure_qubit(&self, state: &mut [Complex64], q: usize, rng: &mut ChaCha8Rng) -> bool {
        let mask = 1usize << q;
        let p1: f64 = state
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        let outcome = if p1 < PROBABILITY_FLOOR {
            false
        } else if p1 > 1.0 - PROBABILITY_FLOOR {
            true
        } else {
            rng.gen::<f64>() < p1
        };

        let p = if outcome { p1 } else { 1.0 - p1 };
        let scale = 1.0 / p.max(PROBABILITY_FLOOR).sqrt();
        for (i, amp) in state.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }

        outcome
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    fn apply_h(&self, state: &mut [Complex64], q: usize) {
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        self.apply_single_qubit_gate(state, q, |a, b| ((a + b) * sqrt2_inv, (a - b) * sqrt2_inv));
    }

    fn apply_x(&self, state: &mut [Complex64], q: usize) {
        self.apply_single_qubit_gate(state, q, |a, b| (b, a));
    }

    fn apply_z(&self, state: &mut [Complex64], q: usize) {
        self.apply_single_qubit_gate(state, q, |a, b| (a, -b));
    }

    fn apply_unitary(&self, state: &mut [Complex64], q: usize, matrix: &Matrix2) {
        self.apply_single_qubit_gate(state, q, |a, b| matrix.apply(a, b));
    }

    fn apply_single_qubit_gate<F>(&self, state: &mut [Complex64], q: usize, f: F)
    where
        F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
    {
        let mask = 1 << q;
        for i in 0..state.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (new_i, new_j) = f(state[i], state[j]);
                state[i] = new_i;
                state[j] = new_j;
            }
        }
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    fn apply_cnot(&self, state: &mut [Complex64], control: usize, target: usize) {
        let control_mask = 1 << control;
        let target_mask = 1 << target;

        for i in 0..state.len() {
            if (i & control_mask) != 0 && (i & target_mask) == 0 {
                let j = i | target_mask;
                state.swap(i, j);
            }
        }
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionService for StatevectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn execute(&self, program: &Program, shots: u64) -> SurfaceResult<ExecutionResult> {
        self.check_request(program, shots)?;

        debug!(
            "{}: executing {} gates on {} qubits, {} shots",
            self.name,
            program.gate_count(),
            program.num_qubits(),
            shots
        );

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let start = Instant::now();
        let outcomes = (0..shots)
            .map(|_| self.simulate_single_shot(program, &mut rng))
            .collect::<SurfaceResult<Vec<_>>>()?;

        Ok(ExecutionResult {
            outcomes,
            shots,
            metadata: ExecutionMetadata {
                backend: self.name.clone(),
                execution_time_ms: Some(start.elapsed().as_millis() as u64),
                simulated: true,
                seed: self.seed,
                ..Default::default()
            },
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn measured_program(n: usize) -> (Program, usize) {
        let mut program = Program::new();
        program.add_qreg("q", n).unwrap();
        let reg = program.add_creg("out", n).unwrap();
        (program, reg)
    }

    #[test]
    fn test_bell_state() {
        let (mut program, reg) = measured_program(2);
        program.h(0).unwrap();
        program.cx(0, 1).unwrap();
        program.measure_into(&[0, 1], reg).unwrap();

        let backend = StatevectorBackend::new().with_seed(42);
        let result = backend.execute(&program, 1000).unwrap();

        let p00 = result.probability("00");
        let p11 = result.probability("11");
        assert_relative_eq!(p00, 0.5, epsilon = 0.1);
        assert_relative_eq!(p00 + p11, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mid_circuit_collapse() {
        let (mut program, reg) = measured_program(2);
        program.h(0).unwrap();
        program.cx(0, 1).unwrap();
        program.measure_into(&[0, 1], reg).unwrap();
        program.reset(0).unwrap();
        program.reset(1).unwrap();

        let result = StatevectorBackend::new()
            .with_seed(3)
            .execute(&program, 200)
            .unwrap();
        for outcome in &result.outcomes {
            let bits = outcome.register(0).unwrap();
            assert_eq!(bits.is_set(0), bits.is_set(1));
        }
    }

    #[test]
    fn test_unitary_pauli_x() {
        let (mut program, reg) = measured_program(1);
        program.unitary(0, Matrix2::pauli_x(), "error").unwrap();
        program.measure_into(&[0], reg).unwrap();

        let result = StatevectorBackend::new().execute(&program, 10).unwrap();
        assert_eq!(result.counts().get("1"), Some(&10));
    }

    #[test]
    fn test_hzh_is_x() {
        let (mut program, reg) = measured_program(1);
        program.h(0).unwrap();
        program.z(0).unwrap();
        program.h(0).unwrap();
        program.measure_into(&[0], reg).unwrap();

        let result = StatevectorBackend::new().execute(&program, 10).unwrap();
        assert_relative_eq!(result.probability("1"), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_qubit_limit() {
        let (program, _) = measured_program(5);
        let backend = StatevectorBackend::new().with_max_qubits(3);
        assert!(backend.execute(&program, 1).is_err());
    }

    #[test]
    fn test_qubit_limit_is_capped() {
        let backend = StatevectorBackend::new().with_max_qubits(128);
        assert_eq!(backend.max_qubits(), STATEVECTOR_MAX_QUBITS);

        let (program, _) = measured_program(STATEVECTOR_MAX_QUBITS + 1);
        assert!(matches!(
            backend.execute(&program, 1),
            Err(surface_core::SurfaceError::ExecutionFailure(_))
        ));
    }

    #[test]
    fn test_seed_reproducibility() {
        let (mut program, reg) = measured_program(3);
        for q in 0..3 {
            program.h(q).unwrap();
        }
        program.measure_into(&[0, 1, 2], reg).unwrap();

        let r1 = StatevectorBackend::new().with_seed(42).execute(&program, 100).unwrap();
        let r2 = StatevectorBackend::new().with_seed(42).execute(&program, 100).unwrap();
        assert_eq!(r1.outcomes, r2.outcomes);
    }
}
