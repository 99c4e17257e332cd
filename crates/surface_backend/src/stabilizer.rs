//! Stabilizer tableau execution service
//!
//! Gantree: L2_Backend → StabilizerBackend
//!
//! Aaronson–Gottesman (CHP) tableau simulation. Each qubit costs two
//! tableau rows, so memory programs at any practical distance fit.
//! Only Clifford operations are accepted.

use crate::execution::{ExecutionMetadata, ExecutionResult, ExecutionService, MeasurementOutcome};
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use surface_core::limits::STABILIZER_MAX_QUBITS;
use surface_core::{Gate, Program, SurfaceError, SurfaceResult};

// ============================================================================
// Tableau
// ============================================================================

/// Stabilizer tableau over `n` qubits
///
/// Rows `0..n` are destabilizers, rows `n..2n` stabilizers, row `2n`
/// is scratch space for deterministic measurements. X and Z parts are
/// packed into `u64` words, `words` per row.
/// Gantree: Tableau // CHP 테이블
#[derive(Debug, Clone)]
pub struct Tableau {
    n: usize,
    words: usize,
    x: Vec<u64>,
    z: Vec<u64>,
    r: Vec<bool>,
}

impl Tableau {
    /// Tableau for `|0…0⟩`
    pub fn new(n: usize) -> Self {
        let words = n.div_ceil(64).max(1);
        let rows = 2 * n + 1;
        let mut tableau = Self {
            n,
            words,
            x: vec![0; rows * words],
            z: vec![0; rows * words],
            r: vec![false; rows],
        };
        for q in 0..n {
            let (w, mask) = Self::locate(q);
            tableau.x[q * words + w] |= mask;
            tableau.z[(n + q) * words + w] |= mask;
        }
        tableau
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.n
    }

    #[inline]
    fn locate(q: usize) -> (usize, u64) {
        (q / 64, 1u64 << (q % 64))
    }

    #[inline]
    fn x_bit(&self, row: usize, q: usize) -> bool {
        let (w, mask) = Self::locate(q);
        self.x[row * self.words + w] & mask != 0
    }

    // ========================================================================
    // Clifford Gates
    // ========================================================================

    /// Hadamard
    pub fn h(&mut self, q: usize) {
        let (w, mask) = Self::locate(q);
        for row in 0..2 * self.n {
            let i = row * self.words + w;
            let (xb, zb) = (self.x[i] & mask, self.z[i] & mask);
            if xb != 0 && zb != 0 {
                self.r[row] ^= true;
            }
            self.x[i] = (self.x[i] & !mask) | zb;
            self.z[i] = (self.z[i] & !mask) | xb;
        }
    }

    /// Pauli-X: flips the sign of rows with a Z component on `q`
    pub fn x(&mut self, q: usize) {
        let (w, mask) = Self::locate(q);
        for row in 0..2 * self.n {
            if self.z[row * self.words + w] & mask != 0 {
                self.r[row] ^= true;
            }
        }
    }

    /// Pauli-Z: flips the sign of rows with an X component on `q`
    pub fn z(&mut self, q: usize) {
        let (w, mask) = Self::locate(q);
        for row in 0..2 * self.n {
            if self.x[row * self.words + w] & mask != 0 {
                self.r[row] ^= true;
            }
        }
    }

    /// Controlled-NOT
    pub fn cnot(&mut self, control: usize, target: usize) {
        let (wc, mc) = Self::locate(control);
        let (wt, mt) = Self::locate(target);
        for row in 0..2 * self.n {
            let base = row * self.words;
            let xc = self.x[base + wc] & mc != 0;
            let zc = self.z[base + wc] & mc != 0;
            let xt = self.x[base + wt] & mt != 0;
            let zt = self.z[base + wt] & mt != 0;

            if xc && zt && (xt == zc) {
                self.r[row] ^= true;
            }
            if xc {
                self.x[base + wt] ^= mt;
            }
            if zt {
                self.z[base + wc] ^= mc;
            }
        }
    }

    // ========================================================================
    // Row Operations
    // ========================================================================

    /// Replace row `h` by the product of rows `i` and `h`, tracking phase
    /// Gantree: rowsum(h, i) // 행 곱셈
    fn rowsum(&mut self, h: usize, i: usize) {
        let (bh, bi) = (h * self.words, i * self.words);
        let mut phase: i64 = 2 * (self.r[h] as i64) + 2 * (self.r[i] as i64);

        for w in 0..self.words {
            let (x1, z1) = (self.x[bi + w], self.z[bi + w]);
            let (x2, z2) = (self.x[bh + w], self.z[bh + w]);

            // Exponent of i picked up per qubit when multiplying the Paulis
            let y1 = x1 & z1;
            let x_only = x1 & !z1;
            let z_only = !x1 & z1;
            let plus = (y1 & z2 & !x2) | (x_only & z2 & x2) | (z_only & x2 & !z2);
            let minus = (y1 & x2 & !z2) | (x_only & z2 & !x2) | (z_only & x2 & z2);
            phase += plus.count_ones() as i64 - minus.count_ones() as i64;

            self.x[bh + w] ^= x1;
            self.z[bh + w] ^= z1;
        }

        self.r[h] = phase.rem_euclid(4) == 2;
    }

    fn copy_row(&mut self, dst: usize, src: usize) {
        let (bd, bs) = (dst * self.words, src * self.words);
        for w in 0..self.words {
            self.x[bd + w] = self.x[bs + w];
            self.z[bd + w] = self.z[bs + w];
        }
        self.r[dst] = self.r[src];
    }

    fn clear_row(&mut self, row: usize) {
        let base = row * self.words;
        for w in 0..self.words {
            self.x[base + w] = 0;
            self.z[base + w] = 0;
        }
        self.r[row] = false;
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Measure `q` in the computational basis
    /// Gantree: measure(q, rng) -> bool // Z 측정
    pub fn measure<R: Rng>(&mut self, q: usize, rng: &mut R) -> bool {
        let n = self.n;
        let pivot = (n..2 * n).find(|&row| self.x_bit(row, q));

        match pivot {
            Some(p) => {
                // Random outcome
                for row in 0..2 * n {
                    if row != p && self.x_bit(row, q) {
                        self.rowsum(row, p);
                    }
                }
                self.copy_row(p - n, p);
                self.clear_row(p);
                let (w, mask) = Self::locate(q);
                self.z[p * self.words + w] |= mask;
                let outcome = rng.gen::<bool>();
                self.r[p] = outcome;
                outcome
            }
            None => {
                // Deterministic outcome
                let scratch = 2 * n;
                self.clear_row(scratch);
                for row in 0..n {
                    if self.x_bit(row, q) {
                        self.rowsum(scratch, row + n);
                    }
                }
                self.r[scratch]
            }
        }
    }

    /// Reset `q` to `|0⟩`
    pub fn reset<R: Rng>(&mut self, q: usize, rng: &mut R) {
        if self.measure(q, rng) {
            self.x(q);
        }
    }
}

// ============================================================================
// Stabilizer Backend
// ============================================================================

/// Stabilizer execution service
/// Gantree: StabilizerBackend // 스태빌라이저 시뮬레이터
pub struct StabilizerBackend {
    /// Service name
    name: String,

    /// Qubit limit
    max_qubits: usize,

    /// Random seed
    seed: Option<u64>,
}

impl StabilizerBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new stabilizer backend
    pub fn new() -> Self {
        Self {
            name: "surfmem_stabilizer".to_string(),
            max_qubits: STABILIZER_MAX_QUBITS,
            seed: None,
        }
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set qubit limit
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
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
        let mut tableau = Tableau::new(program.num_qubits());
        let mut outcome = MeasurementOutcome::zeros(&program.creg_widths());

        for gate in program.gates() {
            match gate {
                Gate::H(q) => tableau.h(*q),
                Gate::X(q) => tableau.x(*q),
                Gate::Z(q) => tableau.z(*q),
                Gate::Cnot(c, t) => tableau.cnot(*c, *t),
                Gate::Measure { qubit, clbit } => {
                    let bit = tableau.measure(*qubit, rng);
                    outcome.set_bit(*clbit, bit)?;
                }
                Gate::Reset(q) => tableau.reset(*q, rng),
                Gate::Barrier(_) => {}
                Gate::Unitary { label, .. } => {
                    return Err(SurfaceError::ExecutionFailure(format!(
                        "{}: unitary '{}' is not a Clifford operation",
                        self.name, label
                    )));
                }
            }
        }

        Ok(outcome)
    }
}

impl Default for StabilizerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionService for StabilizerBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn execute(&self, program: &Program, shots: u64) -> SurfaceResult<ExecutionResult> {
        self.check_request(program, shots)?;
        if let Some(gate) = program.gates().iter().find(|g| !g.is_clifford()) {
            return Err(SurfaceError::ExecutionFailure(format!(
                "{}: gate '{}' is not a Clifford operation",
                self.name,
                gate.name()
            )));
        }

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
    use surface_core::Clbit;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_initial_state_measures_zero() {
        let mut t = Tableau::new(3);
        let mut rng = rng();
        for q in 0..3 {
            assert!(!t.measure(q, &mut rng));
        }
    }

    #[test]
    fn test_x_flips() {
        let mut t = Tableau::new(2);
        let mut rng = rng();
        t.x(1);
        assert!(!t.measure(0, &mut rng));
        assert!(t.measure(1, &mut rng));
    }

    #[test]
    fn test_hzh_is_x() {
        let mut t = Tableau::new(1);
        t.h(0);
        t.z(0);
        t.h(0);
        assert!(t.measure(0, &mut rng()));
    }

    #[test]
    fn test_bell_pair_correlated() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut t = Tableau::new(2);
            t.h(0);
            t.cnot(0, 1);
            let a = t.measure(0, &mut rng);
            let b = t.measure(1, &mut rng);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_measurement_is_repeatable() {
        let mut rng = rng();
        let mut t = Tableau::new(1);
        t.h(0);
        let first = t.measure(0, &mut rng);
        for _ in 0..5 {
            assert_eq!(t.measure(0, &mut rng), first);
        }
    }

    #[test]
    fn test_reset() {
        let mut rng = rng();
        let mut t = Tableau::new(2);
        t.h(0);
        t.cnot(0, 1);
        t.reset(0, &mut rng);
        assert!(!t.measure(0, &mut rng));
    }

    #[test]
    fn test_parity_check_wide() {
        // ZZ parity of qubits far apart, crossing a word boundary
        let n = 130;
        let mut t = Tableau::new(n);
        let mut rng = rng();
        t.x(3);
        t.cnot(3, 129);
        t.cnot(70, 129);
        assert!(t.measure(129, &mut rng));
        t.x(70);
        t.reset(129, &mut rng);
        t.cnot(3, 129);
        t.cnot(70, 129);
        assert!(!t.measure(129, &mut rng));
    }

    #[test]
    fn test_x_stabilizer_measurement() {
        // Measure X⊗X of a Bell pair via an ancilla: always +1
        let mut rng = rng();
        for _ in 0..10 {
            let mut t = Tableau::new(3);
            t.h(0);
            t.cnot(0, 1);
            t.h(2);
            t.cnot(2, 0);
            t.cnot(2, 1);
            t.h(2);
            assert!(!t.measure(2, &mut rng));
        }
    }

    #[test]
    fn test_execute_records_registers() {
        let mut program = Program::new();
        program.add_qreg("q", 2).unwrap();
        let reg = program.add_creg("out", 2).unwrap();
        program.x(1).unwrap();
        program.measure(0, Clbit::new(reg, 0)).unwrap();
        program.measure(1, Clbit::new(reg, 1)).unwrap();

        let backend = StabilizerBackend::new().with_seed(42);
        let result = backend.execute(&program, 5).unwrap();
        assert_eq!(result.shots, 5);
        assert_eq!(result.counts().get("10"), Some(&5));
        assert_eq!(result.metadata.seed, Some(42));
    }

    #[test]
    fn test_rejects_unitary() {
        let mut program = Program::new();
        program.add_qreg("q", 1).unwrap();
        program
            .unitary(0, surface_core::Matrix2::pauli_x(), "error")
            .unwrap();
        let err = StabilizerBackend::new().execute(&program, 1).unwrap_err();
        assert!(matches!(err, SurfaceError::ExecutionFailure(_)));
    }

    #[test]
    fn test_rejects_zero_shots_and_large_programs() {
        let mut program = Program::new();
        program.add_qreg("q", 4).unwrap();
        assert!(StabilizerBackend::new().execute(&program, 0).is_err());
        assert!(StabilizerBackend::new()
            .with_max_qubits(3)
            .execute(&program, 1)
            .is_err());
    }

    #[test]
    fn test_seed_reproducibility() {
        let mut program = Program::new();
        program.add_qreg("q", 3).unwrap();
        let reg = program.add_creg("out", 3).unwrap();
        for q in 0..3 {
            program.h(q).unwrap();
        }
        program.measure_into(&[0, 1, 2], reg).unwrap();

        let r1 = StabilizerBackend::new().with_seed(9).execute(&program, 50).unwrap();
        let r2 = StabilizerBackend::new().with_seed(9).execute(&program, 50).unwrap();
        assert_eq!(r1.outcomes, r2.outcomes);
        assert!(r1.counts().len() > 1);
    }
}
