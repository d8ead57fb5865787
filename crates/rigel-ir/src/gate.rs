//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A 4x4 unitary over the two-qubit basis |ab⟩, where `a` is the first
/// operand (high bit) and `b` the second (low bit).
pub type TwoQubitMatrix = [[Complex64; 4]; 4];

/// Standard gates with known semantics.
///
/// Rotation angles are concrete radians; this IR has no symbolic
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    Phase(f64),
    /// Controlled-X gate.
    Cnot,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled phase gate.
    CPhase(f64),
}

impl StandardGate {
    /// Get the Quil name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "I",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::H => "H",
            StandardGate::S => "S",
            StandardGate::Sdg => "SDAGGER",
            StandardGate::T => "T",
            StandardGate::Tdg => "TDAGGER",
            StandardGate::Rx(_) => "RX",
            StandardGate::Ry(_) => "RY",
            StandardGate::Rz(_) => "RZ",
            StandardGate::Phase(_) => "PHASE",
            StandardGate::Cnot => "CNOT",
            StandardGate::Cz => "CZ",
            StandardGate::Swap => "SWAP",
            StandardGate::ISwap => "ISWAP",
            StandardGate::CPhase(_) => "CPHASE",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::Phase(_) => 1,

            StandardGate::Cnot
            | StandardGate::Cz
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CPhase(_) => 2,
        }
    }

    /// Get the concrete parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(theta)
            | StandardGate::Ry(theta)
            | StandardGate::Rz(theta)
            | StandardGate::Phase(theta)
            | StandardGate::CPhase(theta) => vec![*theta],
            _ => vec![],
        }
    }
}

/// The Quil two-qubit parameterized gate family.
///
/// These are plain value records with fixed parameter arity; each carries a
/// full matrix definition. The compilation stage serializes them textually
/// like any other gate, and backends that cannot execute them directly
/// decompose them during translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuilGate {
    /// XY(θ): partial iSWAP, rotating within span{|01⟩, |10⟩}. XY(π) is
    /// iSWAP; also known as parametric iSWAP.
    XY(f64),
    /// Parametric SWAP: swaps and phases the |01⟩/|10⟩ subspace.
    PSwap(f64),
    /// Controlled phase on |00⟩.
    CPhase00(f64),
    /// Controlled phase on |01⟩.
    CPhase01(f64),
    /// Controlled phase on |10⟩.
    CPhase10(f64),
    /// Canonical gate CAN(α, β, γ) = RXX(α)·RYY(β)·RZZ(γ).
    Can(f64, f64, f64),
}

impl QuilGate {
    /// Get the Quil name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            QuilGate::XY(_) => "XY",
            QuilGate::PSwap(_) => "PSWAP",
            QuilGate::CPhase00(_) => "CPHASE00",
            QuilGate::CPhase01(_) => "CPHASE01",
            QuilGate::CPhase10(_) => "CPHASE10",
            QuilGate::Can(_, _, _) => "CAN",
        }
    }

    /// All gates in this family act on two qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        2
    }

    /// Get the concrete parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            QuilGate::XY(theta)
            | QuilGate::PSwap(theta)
            | QuilGate::CPhase00(theta)
            | QuilGate::CPhase01(theta)
            | QuilGate::CPhase10(theta) => vec![*theta],
            QuilGate::Can(alpha, beta, gamma) => vec![*alpha, *beta, *gamma],
        }
    }

    /// The unitary matrix of this gate.
    pub fn matrix(&self) -> TwoQubitMatrix {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);

        match *self {
            QuilGate::XY(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let is = Complex64::new(0.0, (theta / 2.0).sin());
                [
                    [one, zero, zero, zero],
                    [zero, c, is, zero],
                    [zero, is, c, zero],
                    [zero, zero, zero, one],
                ]
            }
            QuilGate::PSwap(theta) => {
                let p = Complex64::from_polar(1.0, theta);
                [
                    [one, zero, zero, zero],
                    [zero, zero, p, zero],
                    [zero, p, zero, zero],
                    [zero, zero, zero, one],
                ]
            }
            QuilGate::CPhase00(theta) => phase_on(0, theta),
            QuilGate::CPhase01(theta) => phase_on(1, theta),
            QuilGate::CPhase10(theta) => phase_on(2, theta),
            QuilGate::Can(alpha, beta, gamma) => {
                matmul(matmul(rxx(alpha), ryy(beta)), rzz(gamma))
            }
        }
    }
}

/// Diagonal matrix phasing a single basis state.
fn phase_on(index: usize, theta: f64) -> TwoQubitMatrix {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let mut m = [[zero; 4]; 4];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = if i == index {
            Complex64::from_polar(1.0, theta)
        } else {
            one
        };
    }
    m
}

fn rxx(theta: f64) -> TwoQubitMatrix {
    let zero = Complex64::new(0.0, 0.0);
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let nis = Complex64::new(0.0, -(theta / 2.0).sin());
    [
        [c, zero, zero, nis],
        [zero, c, nis, zero],
        [zero, nis, c, zero],
        [nis, zero, zero, c],
    ]
}

fn ryy(theta: f64) -> TwoQubitMatrix {
    let zero = Complex64::new(0.0, 0.0);
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let is = Complex64::new(0.0, (theta / 2.0).sin());
    let nis = -is;
    [
        [c, zero, zero, is],
        [zero, c, nis, zero],
        [zero, nis, c, zero],
        [is, zero, zero, c],
    ]
}

fn rzz(theta: f64) -> TwoQubitMatrix {
    let zero = Complex64::new(0.0, 0.0);
    let neg = Complex64::from_polar(1.0, -theta / 2.0);
    let pos = Complex64::from_polar(1.0, theta / 2.0);
    [
        [neg, zero, zero, zero],
        [zero, pos, zero, zero],
        [zero, zero, pos, zero],
        [zero, zero, zero, neg],
    ]
}

fn matmul(a: TwoQubitMatrix, b: TwoQubitMatrix) -> TwoQubitMatrix {
    let zero = Complex64::new(0.0, 0.0);
    let mut out = [[zero; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            let mut acc = zero;
            for (k, b_row) in b.iter().enumerate() {
                acc += a[i][k] * b_row[j];
            }
            out[i][j] = acc;
        }
    }
    out
}

/// A quantum gate, standard or from the Quil two-qubit family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A standard gate.
    Standard(StandardGate),
    /// A Quil two-qubit family gate.
    Quil(QuilGate),
}

impl Gate {
    /// Get the Quil name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Quil(g) => g.name(),
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Quil(g) => g.num_qubits(),
        }
    }

    /// Get the concrete parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::Standard(g) => g.params(),
            Gate::Quil(g) => g.params(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<QuilGate> for Gate {
    fn from(gate: QuilGate) -> Self {
        Gate::Quil(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Cnot.num_qubits(), 2);
        assert_eq!(StandardGate::Rx(PI).params(), vec![PI]);
        assert_eq!(StandardGate::H.name(), "H");
        assert_eq!(StandardGate::CPhase(0.5).name(), "CPHASE");
    }

    #[test]
    fn test_quil_gate_arity() {
        assert_eq!(QuilGate::XY(PI).params().len(), 1);
        assert_eq!(QuilGate::Can(0.1, 0.2, 0.3).params().len(), 3);
        assert_eq!(QuilGate::PSwap(0.0).num_qubits(), 2);
    }

    #[test]
    fn test_xy_pi_is_iswap() {
        // iSWAP: |01⟩ → i|10⟩, |10⟩ → i|01⟩.
        let m = QuilGate::XY(PI).matrix();
        let i = Complex64::new(0.0, 1.0);
        assert!(approx_eq(m[0][0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(m[1][1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(m[1][2], i));
        assert!(approx_eq(m[2][1], i));
        assert!(approx_eq(m[3][3], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_cphase00_phases_only_00() {
        let m = QuilGate::CPhase00(PI / 2.0).matrix();
        assert!(approx_eq(m[0][0], Complex64::from_polar(1.0, PI / 2.0)));
        for i in 1..4 {
            assert!(approx_eq(m[i][i], Complex64::new(1.0, 0.0)));
        }
    }

    #[test]
    fn test_pswap_zero_is_swap() {
        let m = QuilGate::PSwap(0.0).matrix();
        assert!(approx_eq(m[1][2], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(m[2][1], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(m[1][1], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_can_is_unitary() {
        let m = QuilGate::Can(0.3, 0.7, 1.1).matrix();
        // U·U† = I
        for i in 0..4 {
            for j in 0..4 {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..4 {
                    acc += m[i][k] * m[j][k].conj();
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq(acc, Complex64::new(expected, 0.0)));
            }
        }
    }
}
