//! Quil emitter for serializing circuits.

use rigel_ir::{Circuit, Instruction, InstructionKind};

use crate::error::{QuilError, QuilResult};
use crate::program::format_angle;

/// Emit a circuit as Quil source code.
///
/// Circuit metadata is rendered first (`PRAGMA INITIAL_REWIRING`, a leading
/// `RESET` for active reset), then register declarations, then instructions
/// in program order. Barriers have no Quil representation and must be
/// stripped before emission.
pub fn emit(circuit: &Circuit) -> QuilResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QuilResult<String> {
        if let Some(directive) = circuit.rewiring() {
            self.writeln(&format!("PRAGMA INITIAL_REWIRING \"{directive}\""));
        }
        if circuit.active_reset() {
            self.writeln("RESET");
        }

        for creg in circuit.cregs() {
            self.writeln(&format!("DECLARE {} BIT[{}]", creg.name, creg.size));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(circuit, instruction)?;
        }

        Ok(self.output.clone())
    }

    fn emit_instruction(&mut self, circuit: &Circuit, instruction: &Instruction) -> QuilResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let params = gate.params();
                let qubits = instruction
                    .qubits
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");

                if params.is_empty() {
                    self.writeln(&format!("{} {qubits}", gate.name()));
                } else {
                    let rendered: Vec<_> = params.iter().map(|p| format_angle(*p)).collect();
                    self.writeln(&format!("{}({}) {qubits}", gate.name(), rendered.join(",")));
                }
            }

            InstructionKind::Measure => {
                let qubit = instruction.qubits[0];
                let clbit = instruction.clbits[0];
                let creg = circuit
                    .creg(clbit.creg)
                    .ok_or(QuilError::UndeclaredRegister(clbit.creg.0))?;
                self.writeln(&format!("MEASURE {qubit} {}[{}]", creg.name, clbit.offset));
            }

            InstructionKind::Reset => {
                self.writeln(&format!("RESET {}", instruction.qubits[0]));
            }

            InstructionKind::Barrier => {
                return Err(QuilError::Unrepresentable("barrier".into()));
            }
        }

        Ok(())
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}
