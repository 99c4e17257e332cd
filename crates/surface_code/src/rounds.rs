//! Stabilization round emission
//!
//! Gantree: L3_Code → RoundEmitter
//!
//! Lays out the memory program's quantum registers and appends
//! stabilizer-measurement circuits for each face of a [`Lattice`].

use crate::lattice::{Face, Lattice, StabilizerKind};
use surface_core::registers;
use surface_core::{Program, QubitId, RegisterId, SurfaceResult};

/// Empty program with `data`, `syndrome`, and `ancilla` registers
/// Gantree: memory_program(lattice) -> Result<Program> // 레지스터 배치
pub fn memory_program(lattice: &Lattice) -> SurfaceResult<Program> {
    let mut program = Program::with_name(format!("surface_memory_d{}", lattice.distance()));
    program.add_qreg(registers::DATA, lattice.num_data())?;
    program.add_qreg(registers::SYNDROME, lattice.num_syndrome())?;
    program.add_qreg(registers::ANCILLA, 1)?;
    Ok(program)
}

/// Append the measurement circuit of one face onto its syndrome qubit
/// Gantree: emit_face(program, face, s) -> Result // 면 회로
///
/// X faces: `H(s)`, CNOT from `s` onto the upper pair then the lower
/// pair, `H(s)`. Z faces: CNOT from the left pair then the right pair
/// onto `s`. Missing pairs are skipped.
pub fn emit_face(program: &mut Program, face: &Face, syndrome: QubitId) -> SurfaceResult<()> {
    match face.kind {
        StabilizerKind::X => {
            program.h(syndrome)?;
            for (a, b) in [face.upper_pair(), face.lower_pair()].into_iter().flatten() {
                program.cx(syndrome, a)?;
                program.cx(syndrome, b)?;
            }
            program.h(syndrome)?;
        }
        StabilizerKind::Z => {
            for (a, b) in [face.left_pair(), face.right_pair()].into_iter().flatten() {
                program.cx(a, syndrome)?;
                program.cx(b, syndrome)?;
            }
        }
    }
    Ok(())
}

/// Append one full stabilization round
/// Gantree: emit_round(program, lattice, n) -> Result<RegisterId> // 안정화 라운드
///
/// All faces in lattice order, then every syndrome qubit measured into
/// a fresh `readout{round}` register, reset, and a barrier.
pub fn emit_round(program: &mut Program, lattice: &Lattice, round: usize) -> SurfaceResult<RegisterId> {
    for (k, face) in lattice.faces().iter().enumerate() {
        emit_face(program, face, lattice.syndrome(k)?)?;
    }

    let syndromes = (0..lattice.num_syndrome())
        .map(|k| lattice.syndrome(k))
        .collect::<SurfaceResult<Vec<_>>>()?;

    let register = program.add_creg(registers::readout(round), syndromes.len())?;
    program.measure_into(&syndromes, register)?;
    for &s in &syndromes {
        program.reset(s)?;
    }
    program.barrier_all()?;

    Ok(register)
}

/// Append the logical-Z readout onto the ancilla
/// Gantree: emit_logical_readout(program, lattice) -> Result<RegisterId> // 논리 Z 측정
///
/// CNOT from each data qubit of the first row onto the ancilla, measure
/// into `measurement`, reset, barrier.
pub fn emit_logical_readout(program: &mut Program, lattice: &Lattice) -> SurfaceResult<RegisterId> {
    let ancilla = lattice.ancilla();
    for q in lattice.logical_z_support() {
        program.cx(q, ancilla)?;
    }
    let register = program.add_creg(registers::MEASUREMENT, 1)?;
    program.measure_into(&[ancilla], register)?;
    program.reset(ancilla)?;
    program.barrier_all()?;
    Ok(register)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use surface_core::Gate;

    #[test]
    fn test_memory_program_layout() {
        let lattice = Lattice::new(3).unwrap();
        let program = memory_program(&lattice).unwrap();
        assert_eq!(program.num_qubits(), 18);
        assert_eq!(program.qreg(registers::SYNDROME).unwrap().start, 9);
        assert_eq!(program.qreg(registers::ANCILLA).unwrap().start, 17);
        assert!(program.cregs().is_empty());
    }

    #[test]
    fn test_x_face_circuit() {
        let lattice = Lattice::new(3).unwrap();
        let mut program = memory_program(&lattice).unwrap();
        // Face 1: interior X on 1, 2, 4, 5
        emit_face(&mut program, lattice.face(1).unwrap(), 10).unwrap();
        assert_eq!(
            program.gates(),
            &[
                Gate::H(10),
                Gate::Cnot(10, 1),
                Gate::Cnot(10, 2),
                Gate::Cnot(10, 4),
                Gate::Cnot(10, 5),
                Gate::H(10),
            ]
        );
    }

    #[test]
    fn test_boundary_face_circuits() {
        let lattice = Lattice::new(3).unwrap();
        let mut program = memory_program(&lattice).unwrap();
        // Face 4: top X on (0, 1), lower pair only
        emit_face(&mut program, lattice.face(4).unwrap(), 13).unwrap();
        // Face 7: left Z on (3, 6), right pair only
        emit_face(&mut program, lattice.face(7).unwrap(), 16).unwrap();
        assert_eq!(
            program.gates(),
            &[
                Gate::H(13),
                Gate::Cnot(13, 0),
                Gate::Cnot(13, 1),
                Gate::H(13),
                Gate::Cnot(3, 16),
                Gate::Cnot(6, 16),
            ]
        );
    }

    #[test]
    fn test_z_face_circuit() {
        let lattice = Lattice::new(3).unwrap();
        let mut program = memory_program(&lattice).unwrap();
        emit_face(&mut program, lattice.face(0).unwrap(), 9).unwrap();
        assert_eq!(
            program.gates(),
            &[
                Gate::Cnot(0, 9),
                Gate::Cnot(3, 9),
                Gate::Cnot(1, 9),
                Gate::Cnot(4, 9),
            ]
        );
    }

    #[test]
    fn test_round_registers() {
        let lattice = Lattice::new(3).unwrap();
        let mut program = memory_program(&lattice).unwrap();
        assert_eq!(emit_round(&mut program, &lattice, 0).unwrap(), 0);
        assert_eq!(emit_round(&mut program, &lattice, 1).unwrap(), 1);

        let names: Vec<&str> = program.cregs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["readout0", "readout1"]);
        assert_eq!(program.creg_widths(), vec![8, 8]);
        assert_eq!(program.count_measurements(), 16);

        // Faces: 4 X (2 weight-4, 2 weight-2) and 4 Z
        let per_round_cx = 2 * 4 + 2 * 2 + 2 * 4 + 2 * 2;
        assert_eq!(program.count_2q(), 2 * per_round_cx);
    }

    #[test]
    fn test_logical_readout() {
        let lattice = Lattice::new(3).unwrap();
        let mut program = memory_program(&lattice).unwrap();
        emit_round(&mut program, &lattice, 0).unwrap();
        let register = emit_logical_readout(&mut program, &lattice).unwrap();
        assert_eq!(register, 1);
        assert_eq!(program.cregs().last().unwrap().name, registers::MEASUREMENT);
        assert_eq!(program.creg_widths(), vec![8, 1]);

        let tail = &program.gates()[program.gate_count() - 6..];
        assert_eq!(&tail[..3], &[Gate::Cnot(0, 17), Gate::Cnot(1, 17), Gate::Cnot(2, 17)]);
        assert!(tail[3].is_measurement());
        assert_eq!(tail[4], Gate::Reset(17));
        assert!(tail[5].is_barrier());
    }
}
