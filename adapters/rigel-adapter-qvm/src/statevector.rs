//! Statevector simulation engine.
//!
//! Executes Quil gate applications over a dense amplitude vector, with
//! projective measurement collapse for mid-circuit `MEASURE`.

use num_complex::Complex64;
use std::f64::consts::PI;

use rigel_ir::{QuilGate, TwoQubitMatrix};

use crate::error::QvmError;

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Apply a named gate to the given qubits.
    pub fn apply_gate(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[usize],
    ) -> Result<(), QvmError> {
        let expect = |num_params: usize, num_qubits: usize| -> Result<(), QvmError> {
            if params.len() != num_params {
                return Err(QvmError::WrongParameterCount {
                    gate: name.to_string(),
                    expected: num_params,
                    got: params.len(),
                });
            }
            if qubits.len() != num_qubits {
                return Err(QvmError::WrongQubitCount {
                    gate: name.to_string(),
                    expected: num_qubits,
                    got: qubits.len(),
                });
            }
            Ok(())
        };

        match name {
            "I" => expect(0, 1)?,
            "X" => {
                expect(0, 1)?;
                self.apply_x(qubits[0]);
            }
            "Y" => {
                expect(0, 1)?;
                self.apply_y(qubits[0]);
            }
            "Z" => {
                expect(0, 1)?;
                self.apply_phase(qubits[0], PI);
            }
            "H" => {
                expect(0, 1)?;
                self.apply_h(qubits[0]);
            }
            "S" => {
                expect(0, 1)?;
                self.apply_phase(qubits[0], PI / 2.0);
            }
            "SDAGGER" => {
                expect(0, 1)?;
                self.apply_phase(qubits[0], -PI / 2.0);
            }
            "T" => {
                expect(0, 1)?;
                self.apply_phase(qubits[0], PI / 4.0);
            }
            "TDAGGER" => {
                expect(0, 1)?;
                self.apply_phase(qubits[0], -PI / 4.0);
            }
            "RX" => {
                expect(1, 1)?;
                self.apply_rx(qubits[0], params[0]);
            }
            "RY" => {
                expect(1, 1)?;
                self.apply_ry(qubits[0], params[0]);
            }
            "RZ" => {
                expect(1, 1)?;
                self.apply_rz(qubits[0], params[0]);
            }
            "PHASE" => {
                expect(1, 1)?;
                self.apply_phase(qubits[0], params[0]);
            }
            "CNOT" => {
                expect(0, 2)?;
                self.apply_cx(qubits[0], qubits[1]);
            }
            "CZ" => {
                expect(0, 2)?;
                self.apply_cz(qubits[0], qubits[1]);
            }
            "SWAP" => {
                expect(0, 2)?;
                self.apply_swap(qubits[0], qubits[1]);
            }
            "ISWAP" => {
                expect(0, 2)?;
                self.apply_two_qubit_matrix(&QuilGate::XY(PI).matrix(), qubits[0], qubits[1]);
            }
            "CPHASE" => {
                expect(1, 2)?;
                self.apply_cp(qubits[0], qubits[1], params[0]);
            }
            "XY" => {
                expect(1, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::XY(params[0]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            "PSWAP" => {
                expect(1, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::PSwap(params[0]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            "CPHASE00" => {
                expect(1, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::CPhase00(params[0]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            "CPHASE01" => {
                expect(1, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::CPhase01(params[0]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            "CPHASE10" => {
                expect(1, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::CPhase10(params[0]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            "CAN" => {
                expect(3, 2)?;
                self.apply_two_qubit_matrix(
                    &QuilGate::Can(params[0], params[1], params[2]).matrix(),
                    qubits[0],
                    qubits[1],
                );
            }
            _ => return Err(QvmError::UnknownGate(name.to_string())),
        }

        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] *= phase;
            }
        }
    }

    /// Apply a 4x4 matrix over the basis |ab⟩, where `a` is the first
    /// operand (high bit of the local index) and `b` the second.
    fn apply_two_qubit_matrix(&mut self, matrix: &TwoQubitMatrix, a: usize, b: usize) {
        let mask_a = 1 << a;
        let mask_b = 1 << b;
        for i in 0..(1 << self.num_qubits) {
            if (i & mask_a == 0) && (i & mask_b == 0) {
                let indices = [i, i | mask_b, i | mask_a, i | mask_a | mask_b];
                let input = indices.map(|idx| self.amplitudes[idx]);
                for (row, &idx) in indices.iter().enumerate() {
                    let mut acc = Complex64::new(0.0, 0.0);
                    for (col, value) in input.iter().enumerate() {
                        acc += matrix[row][col] * value;
                    }
                    self.amplitudes[idx] = acc;
                }
            }
        }
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit: sample an outcome, collapse the state, renormalize.
    pub fn measure(&mut self, qubit: usize) -> u8 {
        use rand::Rng;
        let mask = 1 << qubit;

        let mut p_one = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if i & mask != 0 {
                p_one += amp.norm_sqr();
            }
        }

        let mut rng = rand::thread_rng();
        let r: f64 = rng.r#gen();
        let outcome = u8::from(r < p_one);

        let keep_set = outcome == 1;
        let norm = if keep_set { p_one } else { 1.0 - p_one }.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if ((i & mask != 0) == keep_set) && norm > 0.0 {
                *amp /= norm;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }

        outcome
    }

    /// Reset a qubit to |0⟩ by folding the excited branch down and
    /// renormalizing.
    pub fn reset_qubit(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let mut norm_sq = 0.0;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                let j = i & !mask;
                let val = self.amplitudes[i];
                self.amplitudes[j] += val;
                self.amplitudes[i] = Complex64::new(0.0, 0.0);
            }
            norm_sq += self.amplitudes[i].norm_sqr();
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Reset every qubit to |0⟩.
    pub fn reset_all(&mut self) {
        for q in 0..self.num_qubits {
            self.reset_qubit(q);
        }
    }
}
