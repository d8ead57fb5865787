//! Quil program representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::f64::consts::PI;

/// Reference to a classical memory cell, e.g. `ro[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRef {
    /// Name of the memory region.
    pub name: String,
    /// Index within the region.
    pub index: u32,
}

impl MemoryRef {
    /// Create a new memory reference.
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for MemoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

/// One Quil instruction.
///
/// Gate applications are kept generic (name, parameters, qubit indices): a
/// program is a wire format, and which gates are meaningful is decided by
/// the consumer (translator or executor), not by the program type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuilInstruction {
    /// `DECLARE name BIT[size]`: classical memory declaration.
    Declare {
        /// Region name.
        name: String,
        /// Number of bits.
        size: u32,
    },
    /// `PRAGMA name args... "data"`: compiler directive.
    Pragma {
        /// Pragma name.
        name: String,
        /// Bare arguments.
        args: Vec<String>,
        /// Optional trailing string payload.
        data: Option<String>,
    },
    /// `RESET`: reset all qubits to |0⟩.
    Reset,
    /// `RESET q`: reset a single qubit to |0⟩.
    ResetQubit {
        /// The qubit to reset.
        qubit: u32,
    },
    /// A gate application, e.g. `RX(pi/2) 0`.
    Gate {
        /// Gate name.
        name: String,
        /// Concrete parameters, in radians for rotations.
        params: Vec<f64>,
        /// Qubit operands.
        qubits: Vec<u32>,
    },
    /// `MEASURE q target`: measure a qubit into classical memory.
    Measure {
        /// The measured qubit.
        qubit: u32,
        /// Destination memory cell.
        target: MemoryRef,
    },
}

impl fmt::Display for QuilInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuilInstruction::Declare { name, size } => {
                write!(f, "DECLARE {name} BIT[{size}]")
            }
            QuilInstruction::Pragma { name, args, data } => {
                write!(f, "PRAGMA {name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                if let Some(data) = data {
                    write!(f, " \"{data}\"")?;
                }
                Ok(())
            }
            QuilInstruction::Reset => write!(f, "RESET"),
            QuilInstruction::ResetQubit { qubit } => write!(f, "RESET {qubit}"),
            QuilInstruction::Gate {
                name,
                params,
                qubits,
            } => {
                write!(f, "{name}")?;
                if !params.is_empty() {
                    let rendered: Vec<_> = params.iter().map(|p| format_angle(*p)).collect();
                    write!(f, "({})", rendered.join(","))?;
                }
                for q in qubits {
                    write!(f, " {q}")?;
                }
                Ok(())
            }
            QuilInstruction::Measure { qubit, target } => {
                write!(f, "MEASURE {qubit} {target}")
            }
        }
    }
}

/// An ordered Quil instruction sequence.
///
/// `Display` renders the program as source text, one instruction per line;
/// parsing that text yields an equal program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<QuilInstruction>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a program from instructions.
    pub fn from_instructions(instructions: Vec<QuilInstruction>) -> Self {
        Self { instructions }
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: QuilInstruction) {
        self.instructions.push(instruction);
    }

    /// Insert an instruction at the front.
    pub fn prepend(&mut self, instruction: QuilInstruction) {
        self.instructions.insert(0, instruction);
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[QuilInstruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The highest qubit index referenced, if any qubit is referenced.
    pub fn max_qubit(&self) -> Option<u32> {
        self.instructions
            .iter()
            .flat_map(|inst| match inst {
                QuilInstruction::Gate { qubits, .. } => qubits.clone(),
                QuilInstruction::Measure { qubit, .. }
                | QuilInstruction::ResetQubit { qubit } => {
                    vec![*qubit]
                }
                _ => vec![],
            })
            .max()
    }

    /// Size of a declared memory region, if declared.
    pub fn declared_size(&self, name: &str) -> Option<u32> {
        self.instructions.iter().find_map(|inst| match inst {
            QuilInstruction::Declare { name: n, size } if n == name => Some(*size),
            _ => None,
        })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.instructions {
            writeln!(f, "{inst}")?;
        }
        Ok(())
    }
}

impl FromIterator<QuilInstruction> for Program {
    fn from_iter<T: IntoIterator<Item = QuilInstruction>>(iter: T) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

/// Render an angle, preferring exact multiples of pi over decimals.
pub(crate) fn format_angle(theta: f64) -> String {
    const NAMED: &[(f64, &str)] = &[
        (PI, "pi"),
        (-PI, "-pi"),
        (PI / 2.0, "pi/2"),
        (-PI / 2.0, "-pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI / 4.0, "-pi/4"),
        (2.0 * PI, "2*pi"),
    ];
    for (value, text) in NAMED {
        if theta == *value {
            return (*text).to_string();
        }
    }
    format!("{theta}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_declare() {
        let inst = QuilInstruction::Declare {
            name: "ro".into(),
            size: 2,
        };
        assert_eq!(inst.to_string(), "DECLARE ro BIT[2]");
    }

    #[test]
    fn test_display_gate_with_params() {
        let inst = QuilInstruction::Gate {
            name: "RX".into(),
            params: vec![PI / 2.0],
            qubits: vec![0],
        };
        assert_eq!(inst.to_string(), "RX(pi/2) 0");
    }

    #[test]
    fn test_display_gate_decimal_param() {
        let inst = QuilInstruction::Gate {
            name: "RZ".into(),
            params: vec![0.25],
            qubits: vec![1],
        };
        assert_eq!(inst.to_string(), "RZ(0.25) 1");
    }

    #[test]
    fn test_display_measure() {
        let inst = QuilInstruction::Measure {
            qubit: 1,
            target: MemoryRef::new("ro", 1),
        };
        assert_eq!(inst.to_string(), "MEASURE 1 ro[1]");
    }

    #[test]
    fn test_display_pragma() {
        let inst = QuilInstruction::Pragma {
            name: "INITIAL_REWIRING".into(),
            args: vec![],
            data: Some("NAIVE".into()),
        };
        assert_eq!(inst.to_string(), "PRAGMA INITIAL_REWIRING \"NAIVE\"");
    }

    #[test]
    fn test_program_display() {
        let mut program = Program::new();
        program.push(QuilInstruction::Declare {
            name: "ro".into(),
            size: 1,
        });
        program.push(QuilInstruction::Gate {
            name: "H".into(),
            params: vec![],
            qubits: vec![0],
        });
        program.push(QuilInstruction::Measure {
            qubit: 0,
            target: MemoryRef::new("ro", 0),
        });
        assert_eq!(
            program.to_string(),
            "DECLARE ro BIT[1]\nH 0\nMEASURE 0 ro[0]\n"
        );
    }

    #[test]
    fn test_max_qubit() {
        let program: Program = [
            QuilInstruction::Gate {
                name: "CZ".into(),
                params: vec![],
                qubits: vec![0, 3],
            },
            QuilInstruction::Measure {
                qubit: 1,
                target: MemoryRef::new("ro", 0),
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(program.max_qubit(), Some(3));
        assert_eq!(Program::new().max_qubit(), None);
    }

    #[test]
    fn test_prepend() {
        let mut program = Program::new();
        program.push(QuilInstruction::Reset);
        program.prepend(QuilInstruction::Declare {
            name: "ro".into(),
            size: 1,
        });
        assert!(matches!(
            program.instructions()[0],
            QuilInstruction::Declare { .. }
        ));
    }
}
