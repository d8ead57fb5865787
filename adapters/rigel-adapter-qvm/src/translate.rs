//! Translation of Quil stdgates to the native gate set.
//!
//! The native set is {RX, RZ, CZ, CPHASE, XY}. Everything else in the
//! recognized gate set rewrites into it through fixed decompositions;
//! non-gate instructions pass through untouched.

use std::f64::consts::PI;

use rigel_quil::{Program, QuilError, QuilInstruction, QuilResult};

/// Gates the target executes directly.
pub const NATIVE_GATES: &[&str] = &["RX", "RZ", "CZ", "CPHASE", "XY"];

/// Rewrite a program into the native gate set.
pub fn to_native(program: &Program) -> QuilResult<Program> {
    let mut native = Program::new();
    for instruction in program.instructions() {
        match instruction {
            QuilInstruction::Gate {
                name,
                params,
                qubits,
            } => expand(name, params, qubits, &mut native)?,
            other => native.push(other.clone()),
        }
    }
    Ok(native)
}

/// Check whether a program only uses native gates.
pub fn is_native(program: &Program) -> bool {
    program.instructions().iter().all(|inst| match inst {
        QuilInstruction::Gate { name, .. } => NATIVE_GATES.contains(&name.as_str()),
        _ => true,
    })
}

fn expand(name: &str, params: &[f64], qubits: &[u32], out: &mut Program) -> QuilResult<()> {
    let expect = |num_params: usize, num_qubits: usize| -> QuilResult<()> {
        if params.len() != num_params {
            return Err(QuilError::WrongParameterCount {
                gate: name.to_string(),
                expected: num_params,
                got: params.len(),
            });
        }
        if qubits.len() != num_qubits {
            return Err(QuilError::WrongQubitCount {
                gate: name.to_string(),
                expected: num_qubits,
                got: qubits.len(),
            });
        }
        Ok(())
    };

    match name {
        // Native gates pass through.
        "RX" | "RZ" => {
            expect(1, 1)?;
            push(out, name, params, qubits);
        }
        "CZ" => {
            expect(0, 2)?;
            push(out, name, params, qubits);
        }
        "CPHASE" | "XY" => {
            expect(1, 2)?;
            push(out, name, params, qubits);
        }

        // Identity vanishes.
        "I" => expect(0, 1)?,

        "X" => {
            expect(0, 1)?;
            rx(out, PI, qubits[0]);
        }
        "Y" => {
            expect(0, 1)?;
            rz(out, PI, qubits[0]);
            rx(out, PI, qubits[0]);
        }
        "Z" => {
            expect(0, 1)?;
            rz(out, PI, qubits[0]);
        }
        "S" => {
            expect(0, 1)?;
            rz(out, PI / 2.0, qubits[0]);
        }
        "SDAGGER" => {
            expect(0, 1)?;
            rz(out, -PI / 2.0, qubits[0]);
        }
        "T" => {
            expect(0, 1)?;
            rz(out, PI / 4.0, qubits[0]);
        }
        "TDAGGER" => {
            expect(0, 1)?;
            rz(out, -PI / 4.0, qubits[0]);
        }
        "PHASE" => {
            expect(1, 1)?;
            rz(out, params[0], qubits[0]);
        }

        // The sequence quilc emits for H.
        "H" => {
            expect(0, 1)?;
            rz(out, PI, qubits[0]);
            rx(out, PI / 2.0, qubits[0]);
            rz(out, PI / 2.0, qubits[0]);
            rx(out, -PI / 2.0, qubits[0]);
        }

        // RY(θ) = RZ(π/2)·RX(θ)·RZ(-π/2), first applied last written.
        "RY" => {
            expect(1, 1)?;
            rz(out, -PI / 2.0, qubits[0]);
            rx(out, params[0], qubits[0]);
            rz(out, PI / 2.0, qubits[0]);
        }

        // CNOT a b = (I⊗H)·CZ·(I⊗H).
        "CNOT" => {
            expect(0, 2)?;
            expand("H", &[], &[qubits[1]], out)?;
            push(out, "CZ", &[], qubits);
            expand("H", &[], &[qubits[1]], out)?;
        }

        "SWAP" => {
            expect(0, 2)?;
            expand("CNOT", &[], &[qubits[0], qubits[1]], out)?;
            expand("CNOT", &[], &[qubits[1], qubits[0]], out)?;
            expand("CNOT", &[], &[qubits[0], qubits[1]], out)?;
        }

        "ISWAP" => {
            expect(0, 2)?;
            push(out, "XY", &[PI], qubits);
        }

        // Basis-state phases conjugate CPHASE with X on the qubits that
        // must read 0.
        "CPHASE00" => {
            expect(1, 2)?;
            expand("X", &[], &[qubits[0]], out)?;
            expand("X", &[], &[qubits[1]], out)?;
            push(out, "CPHASE", params, qubits);
            expand("X", &[], &[qubits[0]], out)?;
            expand("X", &[], &[qubits[1]], out)?;
        }
        "CPHASE01" => {
            expect(1, 2)?;
            expand("X", &[], &[qubits[0]], out)?;
            push(out, "CPHASE", params, qubits);
            expand("X", &[], &[qubits[0]], out)?;
        }
        "CPHASE10" => {
            expect(1, 2)?;
            expand("X", &[], &[qubits[1]], out)?;
            push(out, "CPHASE", params, qubits);
            expand("X", &[], &[qubits[1]], out)?;
        }

        // PSWAP(θ) = SWAP · (phase on |01⟩ and |10⟩).
        "PSWAP" => {
            expect(1, 2)?;
            expand("CPHASE01", params, qubits, out)?;
            expand("CPHASE10", params, qubits, out)?;
            expand("SWAP", &[], qubits, out)?;
        }

        "RZZ" => {
            expect(1, 2)?;
            expand("CNOT", &[], qubits, out)?;
            rz(out, params[0], qubits[1]);
            expand("CNOT", &[], qubits, out)?;
        }
        "RXX" => {
            expect(1, 2)?;
            expand("H", &[], &[qubits[0]], out)?;
            expand("H", &[], &[qubits[1]], out)?;
            expand("RZZ", params, qubits, out)?;
            expand("H", &[], &[qubits[0]], out)?;
            expand("H", &[], &[qubits[1]], out)?;
        }
        "RYY" => {
            expect(1, 2)?;
            rx(out, PI / 2.0, qubits[0]);
            rx(out, PI / 2.0, qubits[1]);
            expand("RZZ", params, qubits, out)?;
            rx(out, -PI / 2.0, qubits[0]);
            rx(out, -PI / 2.0, qubits[1]);
        }

        // CAN(α, β, γ) = RXX(α)·RYY(β)·RZZ(γ); the factors commute.
        "CAN" => {
            expect(3, 2)?;
            expand("RXX", &params[0..1], qubits, out)?;
            expand("RYY", &params[1..2], qubits, out)?;
            expand("RZZ", &params[2..3], qubits, out)?;
        }

        _ => return Err(QuilError::UnknownGate(name.to_string())),
    }

    Ok(())
}

fn push(out: &mut Program, name: &str, params: &[f64], qubits: &[u32]) {
    out.push(QuilInstruction::Gate {
        name: name.to_string(),
        params: params.to_vec(),
        qubits: qubits.to_vec(),
    });
}

fn rx(out: &mut Program, theta: f64, qubit: u32) {
    push(out, "RX", &[theta], &[qubit]);
}

fn rz(out: &mut Program, theta: f64, qubit: u32) {
    push(out, "RZ", &[theta], &[qubit]);
}
