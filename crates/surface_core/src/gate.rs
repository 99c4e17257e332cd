//! Elementary operations for SURFMEM
//!
//! Gantree: L1_Program → Gate
//!
//! The closed set of operations a memory program is made of:
//! Hadamard, CNOT, Pauli-X/Z, labelled custom unitary, measure,
//! reset, and barrier.

use crate::types::{Clbit, QubitId};
use crate::unitary::Matrix2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Program operation
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================
    /// Hadamard gate
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),

    /// Pauli-X gate (NOT)
    /// Gantree: X(QubitId) // 파울리 X
    X(QubitId),

    /// Pauli-Z gate
    /// Gantree: Z(QubitId) // 파울리 Z
    Z(QubitId),

    /// Custom single-qubit unitary with a display label
    /// Gantree: Unitary{{q,m,label}} // 사용자 유니터리
    Unitary {
        /// Target qubit
        qubit: QubitId,
        /// 2×2 matrix applied to the qubit
        matrix: Matrix2,
        /// Display label (e.g. "error")
        label: String,
    },

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (control, target)
    /// Gantree: CNOT(QubitId, QubitId) // ctrl, tgt
    Cnot(QubitId, QubitId),

    // ========================================================================
    // Measurement and Control
    // ========================================================================
    /// Measure a qubit into a classical bit
    /// Gantree: Measure{{q,clbit}} // 측정
    Measure {
        /// Measured qubit
        qubit: QubitId,
        /// Destination bit
        clbit: Clbit,
    },

    /// Reset qubit to |0⟩
    Reset(QubitId),

    /// Ordering barrier
    /// Gantree: Barrier // 배리어
    Barrier(Vec<QubitId>),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Z(q)
            | Gate::Reset(q)
            | Gate::Unitary { qubit: q, .. }
            | Gate::Measure { qubit: q, .. } => vec![*q],
            Gate::Cnot(c, t) => vec![*c, *t],
            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// Check if gate is a single-qubit unitary
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            Gate::H(_) | Gate::X(_) | Gate::Z(_) | Gate::Unitary { .. }
        )
    }

    /// Check if gate is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::Cnot(_, _))
    }

    /// Check if gate is measurement
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure { .. })
    }

    /// Check if gate is a barrier
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Check if gate belongs to the Clifford+measurement set
    /// (everything except custom unitaries)
    pub fn is_clifford(&self) -> bool {
        !matches!(self, Gate::Unitary { .. })
    }

    /// Get gate name
    pub fn name(&self) -> &str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Z(_) => "z",
            Gate::Unitary { label, .. } => label.as_str(),
            Gate::Cnot(_, _) => "cx",
            Gate::Measure { .. } => "measure",
            Gate::Reset(_) => "reset",
            Gate::Barrier(_) => "barrier",
        }
    }

    /// Convert to an OpenQASM 2.0 statement with caller-provided operand names
    /// Gantree: to_qasm_with(&self, qn, cn) -> String // QASM 변환
    pub fn to_qasm_with(
        &self,
        qubit_name: &dyn Fn(QubitId) -> String,
        clbit_name: &dyn Fn(Clbit) -> String,
    ) -> String {
        match self {
            Gate::H(q) => format!("h {};", qubit_name(*q)),
            Gate::X(q) => format!("x {};", qubit_name(*q)),
            Gate::Z(q) => format!("z {};", qubit_name(*q)),
            Gate::Unitary { qubit, matrix, .. } => {
                let (theta, phi, lambda) = matrix.u_angles();
                format!("u3({},{},{}) {};", theta, phi, lambda, qubit_name(*qubit))
            }
            Gate::Cnot(c, t) => format!("cx {},{};", qubit_name(*c), qubit_name(*t)),
            Gate::Measure { qubit, clbit } => {
                format!("measure {} -> {};", qubit_name(*qubit), clbit_name(*clbit))
            }
            Gate::Reset(q) => format!("reset {};", qubit_name(*q)),
            Gate::Barrier(qs) => {
                let qubits: Vec<String> = qs.iter().map(|&q| qubit_name(q)).collect();
                format!("barrier {};", qubits.join(","))
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qasm = self.to_qasm_with(&|q| format!("q[{}]", q), &|c| {
            format!("c{}[{}]", c.register, c.bit)
        });
        write!(f, "{}", qasm)
    }
}

// ============================================================================
// Tests
// ============================================================================
