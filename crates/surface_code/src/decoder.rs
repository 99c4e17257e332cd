//! Chain decoder for the logical-Z memory
//!
//! Gantree: L3_Code → ChainDecoder
//!
//! Folds the round registers into one aggregate syndrome and counts
//! error chains that cross the logical-Z row. The logical bit is the
//! parity of that count plus the raw ancilla readout.

use serde::{Deserialize, Serialize};
use std::fmt;
use surface_backend::MeasurementOutcome;
use surface_core::{Bitstring, SurfaceError, SurfaceResult};

/// Decoding result for one shot
/// Gantree: DecodeReport // 디코딩 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// XOR-fold of all consecutive round differences
    pub aggregate: Bitstring,
    /// Number of chains counted against the readout
    pub flips: usize,
    /// Raw ancilla readout
    pub ancilla: bool,
    /// Decoded logical bit
    pub logical: u8,
}

impl fmt::Display for DecodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecodeReport(syndrome={}, flips={}, ancilla={}, logical={})",
            self.aggregate, self.flips, self.ancilla as u8, self.logical
        )
    }
}

/// Decoder for a memory of fixed distance and round count
/// Gantree: ChainDecoder // 체인 디코더
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainDecoder {
    distance: usize,
    rounds: usize,
}

impl ChainDecoder {
    /// Create decoder
    pub fn new(distance: usize, rounds: usize) -> Self {
        Self { distance, rounds }
    }

    /// Width of every round register (`d² - 1`)
    pub fn syndrome_width(&self) -> usize {
        (self.distance * self.distance).saturating_sub(1)
    }

    /// Check register count and widths against the program shape
    /// Gantree: check_shape(outcome) -> Result // 형상 검증
    pub fn check_shape(&self, outcome: &MeasurementOutcome) -> SurfaceResult<()> {
        if outcome.num_registers() != self.rounds + 1 {
            return Err(SurfaceError::shape(
                "register count",
                self.rounds + 1,
                outcome.num_registers(),
            ));
        }
        for (round, register) in outcome.registers[..self.rounds].iter().enumerate() {
            if register.len() != self.syndrome_width() {
                return Err(SurfaceError::shape(
                    format!("readout{} width", round),
                    self.syndrome_width(),
                    register.len(),
                ));
            }
        }
        let last = outcome.registers[self.rounds].len();
        if last != 1 {
            return Err(SurfaceError::shape("measurement width", 1, last));
        }
        Ok(())
    }

    /// XOR consecutive rounds, then XOR-fold the differences
    /// Gantree: aggregate(rounds) -> Result<Bitstring> // 신드롬 누적
    pub fn aggregate(&self, rounds: &[Bitstring]) -> SurfaceResult<Bitstring> {
        let mut aggregate = Bitstring::zeros(self.syndrome_width());
        for pair in rounds.windows(2) {
            let difference = pair[0].xor(&pair[1])?;
            aggregate = aggregate.xor(&difference)?;
        }
        Ok(aggregate)
    }

    /// Count chains crossing the logical-Z row
    /// Gantree: count_flips(aggregate) -> usize // 체인 계수
    ///
    /// A chain is counted at each even `p < d-1` whose first-row Z face
    /// fired while both Z faces below it stayed silent, plus once when
    /// the first right-edge face fired without its interior neighbour.
    pub fn count_flips(&self, aggregate: &Bitstring) -> usize {
        let d = self.distance;
        let boundary = d.saturating_sub(1).pow(2);
        let bit = |k: Option<usize>| k.map_or(false, |k| aggregate.is_set(k));

        let mut flips = (0..d.saturating_sub(1))
            .step_by(2)
            .filter(|&p| {
                let up = bit(Some(p));
                let lower_right = bit(Some(p + d));
                let lower_left = if p == 0 {
                    bit(Some(boundary + 3))
                } else {
                    bit((p + d).checked_sub(2))
                };
                up && !lower_right && !lower_left
            })
            .count();

        if bit(Some(boundary + 1)) && !bit((2 * d).checked_sub(3)) {
            flips += 1;
        }
        flips
    }

    /// Decode one shot
    /// Gantree: decode(outcome) -> Result<DecodeReport> // 디코딩
    pub fn decode(&self, outcome: &MeasurementOutcome) -> SurfaceResult<DecodeReport> {
        self.check_shape(outcome)?;

        let aggregate = self.aggregate(&outcome.registers[..self.rounds])?;
        let flips = self.count_flips(&aggregate);
        let ancilla = outcome.registers[self.rounds].is_set(0);
        let logical = ((flips + ancilla as usize) % 2) as u8;

        log::debug!(
            "decoded d={} rounds={}: syndrome={} flips={} ancilla={} -> {}",
            self.distance,
            self.rounds,
            aggregate,
            flips,
            ancilla as u8,
            logical
        );

        Ok(DecodeReport {
            aggregate,
            flips,
            ancilla,
            logical,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(keys: &[&str]) -> MeasurementOutcome {
        MeasurementOutcome::new(keys.iter().map(|k| Bitstring::parse(k).unwrap()).collect())
    }

    #[test]
    fn test_shape_mismatch() {
        let decoder = ChainDecoder::new(3, 2);
        // Missing round
        let err = decoder.decode(&outcome(&["00000000", "0"])).unwrap_err();
        assert!(matches!(err, SurfaceError::ShapeMismatch { expected: 3, actual: 2, .. }));
        // Wrong round width
        assert!(decoder.decode(&outcome(&["0000000", "00000000", "0"])).is_err());
        // Wide last register
        assert!(decoder.decode(&outcome(&["00000000", "00000000", "00"])).is_err());
    }

    #[test]
    fn test_zero_rounds() {
        let decoder = ChainDecoder::new(3, 0);
        let report = decoder.decode(&outcome(&["1"])).unwrap();
        assert_eq!(report.flips, 0);
        assert_eq!(report.logical, 1);
        assert_eq!(report.aggregate, Bitstring::zeros(8));

        let report = decoder.decode(&outcome(&["0"])).unwrap();
        assert_eq!(report.logical, 0);
    }

    #[test]
    fn test_single_round_has_no_differences() {
        let decoder = ChainDecoder::new(3, 1);
        let report = decoder.decode(&outcome(&["01010110", "0"])).unwrap();
        assert_eq!(report.aggregate.popcount(), 0);
        assert_eq!(report.flips, 0);
    }

    #[test]
    fn test_aggregate_folds_differences() {
        let decoder = ChainDecoder::new(3, 3);
        let rounds = [
            Bitstring::parse("00000010").unwrap(),
            Bitstring::parse("00000011").unwrap(),
            Bitstring::parse("00100011").unwrap(),
        ];
        // (r0^r1) ^ (r1^r2) = r0^r2
        let aggregate = decoder.aggregate(&rounds).unwrap();
        assert_eq!(aggregate.to_string(), "00100001");
    }

    #[test]
    fn test_d3_first_row_chain() {
        // Bit 0 fired alone: X on data 0 or 1
        let decoder = ChainDecoder::new(3, 2);
        let report = decoder.decode(&outcome(&["00000000", "00000001", "1"])).unwrap();
        assert_eq!(report.flips, 1);
        assert_eq!(report.logical, 0);
    }

    #[test]
    fn test_d3_blocked_chains() {
        let decoder = ChainDecoder::new(3, 2);
        // Bits 0 and 7 (left edge) fired: X on data 3
        let report = decoder.decode(&outcome(&["00000000", "10000001", "0"])).unwrap();
        assert_eq!(report.flips, 0);
        // Bits 0 and 3 fired: X on data 4
        let report = decoder.decode(&outcome(&["00000000", "00001001", "0"])).unwrap();
        assert_eq!(report.flips, 0);
    }

    #[test]
    fn test_d3_right_edge_chain() {
        let decoder = ChainDecoder::new(3, 2);
        // Bit 5 alone: X on data 2
        let report = decoder.decode(&outcome(&["00000000", "00100000", "1"])).unwrap();
        assert_eq!(report.flips, 1);
        assert_eq!(report.logical, 0);
        // Bits 3 and 5: X on data 5
        let report = decoder.decode(&outcome(&["00000000", "00101000", "0"])).unwrap();
        assert_eq!(report.flips, 0);
    }

    #[test]
    fn test_d5_positions() {
        let decoder = ChainDecoder::new(5, 2);
        let mut fired = Bitstring::zeros(24);
        fired.set(2, true).unwrap();
        let quiet = Bitstring::zeros(24);
        let o = MeasurementOutcome::new(vec![quiet.clone(), fired.clone(), Bitstring::from_value(1, 1)]);
        assert_eq!(decoder.decode(&o).unwrap().flips, 1);

        // p = 2 is blocked by bit p+d-2 = 5
        fired.set(5, true).unwrap();
        let o = MeasurementOutcome::new(vec![quiet, fired, Bitstring::zeros(1)]);
        assert_eq!(decoder.decode(&o).unwrap().flips, 0);
    }

    #[test]
    fn test_distance_one() {
        let decoder = ChainDecoder::new(1, 2);
        let report = decoder.decode(&outcome(&["", "", "1"])).unwrap();
        assert_eq!(report.flips, 0);
        assert_eq!(report.logical, 1);
    }
}
