//! Error types for the Quil text layer.

use thiserror::Error;

/// Errors that can occur while lexing, parsing or emitting Quil.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuilError {
    /// Lexer error (invalid token).
    #[error("Invalid token at line {line}")]
    Lexer {
        /// 1-based source line.
        line: usize,
    },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// 1-based source line.
        line: usize,
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Gate applied to no qubits.
    #[error("Gate '{gate}' at line {line} has no qubit operands")]
    MissingQubits {
        /// Name of the gate.
        gate: String,
        /// 1-based source line.
        line: usize,
    },

    /// Measurement without a target memory reference.
    #[error("MEASURE at line {line} has no target; measure into a declared register")]
    MeasureWithoutTarget {
        /// 1-based source line.
        line: usize,
    },

    /// Gate is not in the recognized gate set.
    #[error("Unknown gate: {0}")]
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

    /// Instruction cannot be expressed in Quil.
    #[error("Instruction '{0}' has no Quil representation")]
    Unrepresentable(String),

    /// Measurement references a register the circuit does not declare.
    #[error("Measurement references undeclared register index {0}")]
    UndeclaredRegister(usize),
}

/// Result type for Quil operations.
pub type QuilResult<T> = Result<T, QuilError>;
