//! Error types for the QVM adapter.

use thiserror::Error;

use rigel_provider::ProviderError;

/// Errors raised by the local QVM while linking or executing a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QvmError {
    /// A gate the executor does not implement.
    #[error("Unknown gate '{0}' reached the executor")]
    UnknownGate(String),

    /// Wrong number of parameters for a gate.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        /// Name of the gate.
        gate: String,
        /// Expected parameter count.
        expected: usize,
        /// Actual parameter count.
        got: usize,
    },

    /// Wrong number of qubit operands for a gate.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        /// Name of the gate.
        gate: String,
        /// Expected qubit count.
        expected: usize,
        /// Actual qubit count.
        got: usize,
    },

    /// Measurement into a region the program never declared.
    #[error("Program measures into undeclared memory region '{0}'")]
    UndeclaredMemory(String),

    /// Measurement past the end of a declared region.
    #[error("Memory index {index} out of range for region '{region}' of size {size}")]
    MemoryIndexOutOfRange {
        /// Region name.
        region: String,
        /// Offending index.
        index: u32,
        /// Declared size.
        size: u32,
    },

    /// The program addresses more qubits than the QVM simulates.
    #[error("Program uses qubit {qubit} but this QVM exposes {num_qubits} qubits")]
    TooManyQubits {
        /// Offending qubit index.
        qubit: u32,
        /// Number of qubits the QVM exposes.
        num_qubits: u32,
    },
}

impl From<QvmError> for ProviderError {
    fn from(err: QvmError) -> Self {
        ProviderError::Execution(err.to_string())
    }
}
