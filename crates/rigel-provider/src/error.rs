//! Error taxonomy for the job pipeline.

use thiserror::Error;

/// Errors that can occur while building or running a job.
///
/// Nothing here is recoverable by the pipeline itself: construction errors
/// mean no job value is produced, execution errors surface on the first
/// result query, and unsupported operations are permanent capability
/// absences rather than transient failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The circuit cannot run on this backend (multiple readout registers,
    /// or more qubits than the backend exposes).
    #[error("Unsupported circuit: {0}")]
    UnsupportedCircuit(String),

    /// The circuit violated an IR-level invariant while being prepared.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(#[from] rigel_ir::IrError),

    /// The compiler rejected the program (parse or translation failure).
    #[error("Compilation failed: {0}")]
    Compilation(#[from] rigel_quil::QuilError),

    /// A user-supplied hook failed. The underlying error is carried
    /// unmodified.
    #[error("Hook failed: {0}")]
    Hook(anyhow::Error),

    /// Execution failed during the first result computation.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// The operation is not part of this job type's execution model.
    #[error("{0}")]
    UnsupportedOperation(String),
}

/// Result type for pipeline operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
