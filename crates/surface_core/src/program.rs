//! Gate program structure for SURFMEM
//!
//! Gantree: L1_Program → Program
//!
//! An append-only sequence of operations over named quantum registers,
//! plus an ordered list of classical registers that receive measurement
//! outcomes. Registers are addressed by declaration index.

use crate::error::{SurfaceError, SurfaceResult};
use crate::gate::Gate;
use crate::types::{Clbit, QubitId, RegisterId};
use crate::unitary::Matrix2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named, contiguous block of qubits
/// Gantree: QuantumRegister // 양자 레지스터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// Register name
    pub name: String,
    /// First qubit of the block
    pub start: QubitId,
    /// Number of qubits
    pub size: usize,
}

impl QuantumRegister {
    /// Qubit at offset `index` in this register
    pub fn qubit(&self, index: usize) -> SurfaceResult<QubitId> {
        if index >= self.size {
            return Err(SurfaceError::QubitOutOfRange {
                qubit: index,
                max: self.size.saturating_sub(1),
            });
        }
        Ok(self.start + index)
    }

    /// Check if qubit lies in this register
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit >= self.start && qubit < self.start + self.size
    }

    /// All qubits of the register, in order
    pub fn qubits(&self) -> Vec<QubitId> {
        (self.start..self.start + self.size).collect()
    }
}

/// Named classical register
/// Gantree: ClassicalRegister // 고전 레지스터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    /// Register name
    pub name: String,
    /// Number of bits
    pub size: usize,
}

/// Gate program
/// Gantree: Program // 게이트 프로그램
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Total number of qubits across all quantum registers
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Quantum registers in declaration order
    qregs: Vec<QuantumRegister>,

    /// Classical registers in declaration order
    /// Gantree: cregs: Vec<ClassicalRegister> // 고전 레지스터 목록
    cregs: Vec<ClassicalRegister>,

    /// Operation sequence
    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,

    /// Optional program name
    name: Option<String>,
}

impl Program {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty program with no registers
    /// Gantree: new() -> Self // 생성자
    pub fn new() -> Self {
        Self {
            num_qubits: 0,
            qregs: Vec::new(),
            cregs: Vec::new(),
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a program with a name
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut program = Self::new();
        program.name = Some(name.into());
        program
    }

    // ========================================================================
    // Registers
    // ========================================================================

    /// Declare a quantum register; its qubits follow the previous ones
    /// Gantree: add_qreg(&mut, name, n) -> Result<QuantumRegister> // 양자 레지스터 추가
    pub fn add_qreg(&mut self, name: impl Into<String>, size: usize) -> SurfaceResult<QuantumRegister> {
        let name = name.into();
        if self.has_register(&name) {
            return Err(SurfaceError::DuplicateRegister(name));
        }
        let register = QuantumRegister {
            name,
            start: self.num_qubits,
            size,
        };
        self.num_qubits += size;
        self.qregs.push(register.clone());
        Ok(register)
    }

    /// Declare a classical register; returns its declaration index
    /// Gantree: add_creg(&mut, name, n) -> Result<RegisterId> // 고전 레지스터 추가
    pub fn add_creg(&mut self, name: impl Into<String>, size: usize) -> SurfaceResult<RegisterId> {
        let name = name.into();
        if self.has_register(&name) {
            return Err(SurfaceError::DuplicateRegister(name));
        }
        self.cregs.push(ClassicalRegister { name, size });
        Ok(self.cregs.len() - 1)
    }

    fn has_register(&self, name: &str) -> bool {
        self.qregs.iter().any(|r| r.name == name) || self.cregs.iter().any(|r| r.name == name)
    }

    /// Look up a quantum register by name
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name == name)
    }

    /// Quantum registers in declaration order
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Classical register by declaration index
    pub fn creg(&self, id: RegisterId) -> SurfaceResult<&ClassicalRegister> {
        self.cregs.get(id).ok_or(SurfaceError::UnknownRegister {
            index: id,
            count: self.cregs.len(),
        })
    }

    /// Widths of all classical registers, in declaration order
    pub fn creg_widths(&self) -> Vec<usize> {
        self.cregs.iter().map(|r| r.size).collect()
    }

    /// Total number of classical bits
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|r| r.size).sum()
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Append a gate after validating its operands
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> SurfaceResult<()> {
        for &qubit in &gate.qubits() {
            if qubit >= self.num_qubits {
                return Err(SurfaceError::GateQubitMismatch {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        if let Gate::Cnot(control, target) = &gate {
            if control == target {
                return Err(SurfaceError::InvalidGate {
                    gate: gate.to_string(),
                    reason: "control and target must differ".to_string(),
                });
            }
        }
        if let Gate::Measure { clbit, .. } = &gate {
            let register = self.creg(clbit.register)?;
            if clbit.bit >= register.size {
                return Err(SurfaceError::ClbitOutOfRange {
                    register: register.name.clone(),
                    bit: clbit.bit,
                    width: register.size,
                });
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Hadamard
    pub fn h(&mut self, qubit: QubitId) -> SurfaceResult<()> {
        self.add_gate(Gate::H(qubit))
    }

    /// Pauli-X
    pub fn x(&mut self, qubit: QubitId) -> SurfaceResult<()> {
        self.add_gate(Gate::X(qubit))
    }

    /// Pauli-Z
    pub fn z(&mut self, qubit: QubitId) -> SurfaceResult<()> {
        self.add_gate(Gate::Z(qubit))
    }

    /// Controlled-NOT
    /// Gantree: cx(&mut, c, t) -> Result // CNOT 추가
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> SurfaceResult<()> {
        self.add_gate(Gate::Cnot(control, target))
    }

    /// Labelled custom unitary
    pub fn unitary(
        &mut self,
        qubit: QubitId,
        matrix: Matrix2,
        label: impl Into<String>,
    ) -> SurfaceResult<()> {
        self.add_gate(Gate::Unitary {
            qubit,
            matrix,
            label: label.into(),
        })
    }

    /// Measure one qubit into one classical bit
    pub fn measure(&mut self, qubit: QubitId, clbit: Clbit) -> SurfaceResult<()> {
        self.add_gate(Gate::Measure { qubit, clbit })
    }

    /// Measure `qubits[k]` into bit `k` of `register`
    /// Gantree: measure_into(&mut, qs, reg) -> Result // 레지스터 측정
    pub fn measure_into(&mut self, qubits: &[QubitId], register: RegisterId) -> SurfaceResult<()> {
        let width = self.creg(register)?.size;
        if width != qubits.len() {
            return Err(SurfaceError::shape("measured register width", width, qubits.len()));
        }
        for (bit, &qubit) in qubits.iter().enumerate() {
            self.measure(qubit, Clbit::new(register, bit))?;
        }
        Ok(())
    }

    /// Reset a qubit to |0⟩
    pub fn reset(&mut self, qubit: QubitId) -> SurfaceResult<()> {
        self.add_gate(Gate::Reset(qubit))
    }

    /// Barrier across the given qubits
    pub fn barrier(&mut self, qubits: Vec<QubitId>) -> SurfaceResult<()> {
        self.add_gate(Gate::Barrier(qubits))
    }

    /// Barrier across every qubit of the program
    /// Gantree: barrier_all(&mut) -> Result // 전체 배리어
    pub fn barrier_all(&mut self) -> SurfaceResult<()> {
        let qubits: Vec<QubitId> = (0..self.num_qubits).collect();
        self.add_gate(Gate::Barrier(qubits))
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get program name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if program has no gates
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Program Analysis
    // ========================================================================

    /// Longest path through the program, barriers excluded
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in self.gates.iter().filter(|g| !g.is_barrier()) {
            let qubits = gate.qubits();
            let max_depth = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0);
            for &q in &qubits {
                qubit_depths[q] = max_depth + 1;
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Get total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit gates
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_single_qubit()).count()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Count measurement operations
    pub fn count_measurements(&self) -> usize {
        self.gates.iter().filter(|g| g.is_measurement()).count()
    }

    /// Check if every gate is Clifford (or measurement/reset/barrier)
    pub fn is_clifford(&self) -> bool {
        self.gates.iter().all(|g| g.is_clifford())
    }

    // ========================================================================
    // QASM Conversion
    // ========================================================================

    fn qubit_name(&self, qubit: QubitId) -> String {
        self.qregs
            .iter()
            .find(|r| r.contains(qubit))
            .map(|r| format!("{}[{}]", r.name, qubit - r.start))
            .unwrap_or_else(|| format!("q[{}]", qubit))
    }

    fn clbit_name(&self, clbit: Clbit) -> String {
        self.cregs
            .get(clbit.register)
            .map(|r| format!("{}[{}]", r.name, clbit.bit))
            .unwrap_or_else(|| format!("c{}[{}]", clbit.register, clbit.bit))
    }

    /// Convert to OpenQASM 2.0 with named registers
    /// Gantree: to_qasm(&self) -> String // QASM2 출력
    pub fn to_qasm(&self) -> String {
        let mut lines = Vec::new();

        lines.push("OPENQASM 2.0;".to_string());
        lines.push("include \"qelib1.inc\";".to_string());
        lines.push(String::new());

        for reg in &self.qregs {
            lines.push(format!("qreg {}[{}];", reg.name, reg.size));
        }
        for reg in &self.cregs {
            lines.push(format!("creg {}[{}];", reg.name, reg.size));
        }
        lines.push(String::new());

        let qubit_name = |q: QubitId| self.qubit_name(q);
        let clbit_name = |c: Clbit| self.clbit_name(c);
        for gate in &self.gates {
            lines.push(gate.to_qasm_with(&qubit_name, &clbit_name));
        }

        lines.join("\n")
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Program({} qubits, {} registers, {} gates)",
            self.num_qubits,
            self.cregs.len(),
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        writeln!(f, "  1Q gates: {}", self.count_1q())?;
        writeln!(f, "  2Q gates: {}", self.count_2q())?;
        writeln!(f, "  Measurements: {}", self.count_measurements())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
