//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index is outside the circuit.
    #[error("Qubit {qubit} is out of range for a circuit with {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        num_qubits: u32,
    },

    /// Classical register index is invalid.
    #[error("Classical register index {index} is out of range ({num_cregs} registers)")]
    RegisterOutOfRange {
        /// The offending register index.
        index: usize,
        /// Number of registers in the circuit.
        num_cregs: usize,
    },

    /// Bit offset is outside its register.
    #[error("Offset {offset} is out of range for register '{register}' of size {size}")]
    OffsetOutOfRange {
        /// Name of the register.
        register: String,
        /// The offending offset.
        offset: u32,
        /// Size of the register.
        size: u32,
    },

    /// Duplicate qubit in a multi-qubit operation.
    #[error("Duplicate qubit {qubit} in operation '{gate_name}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// A register with this name already exists.
    #[error("Classical register '{0}' already declared")]
    DuplicateRegister(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
