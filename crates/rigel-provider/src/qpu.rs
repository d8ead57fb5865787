//! The wire contract between the pipeline and a quantum computer.

use serde::{Deserialize, Serialize};

use rigel_quil::Program;

use crate::error::ProviderResult;

/// A compiler/executor pair for one quantum processor.
///
/// This trait is the entire contract the pipeline depends on. Transport,
/// retries, authentication and time limits are the implementor's concern.
///
/// # Contract
///
/// - `compile()` MUST accept Quil source text and return a program
///   restricted to the processor's native operation set. It MUST fail when
///   the source references more qubits than the processor exposes.
/// - `link()` MUST be cheap relative to compilation; it is called once per
///   circuit per job, immediately before the run.
/// - `run()` blocks until per-shot readout memory is available. It is only
///   ever triggered from a job's first result computation.
pub trait QuantumComputer: Send + Sync {
    /// Get the name of this quantum computer.
    fn name(&self) -> &str;

    /// Number of qubits the processor exposes.
    fn num_qubits(&self) -> u32;

    /// Compile Quil source to the processor's native program form.
    fn compile(&self, source: &str) -> ProviderResult<Program>;

    /// Produce the loadable form of a native program.
    fn link(&self, program: &Program) -> ProviderResult<Executable>;

    /// Execute for the requested shot count, blocking until the raw
    /// per-shot readout memory is returned.
    fn run(&self, executable: &Executable, shots: u32) -> ProviderResult<ReadoutMemory>;
}

/// The loadable form of a compiled program.
///
/// Transient: produced immediately before a run and not retained beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executable {
    program: Program,
}

impl Executable {
    /// Seal a program into its loadable form.
    pub fn new(program: Program) -> Self {
        Self { program }
    }

    /// The sealed program.
    pub fn program(&self) -> &Program {
        &self.program
    }
}

/// Raw per-shot contents of the readout register.
///
/// One row per shot; each row holds the register's bits by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadoutMemory {
    rows: Vec<Vec<u8>>,
}

impl ReadoutMemory {
    /// Create readout memory from per-shot rows.
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// The per-shot rows.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Number of shots recorded.
    pub fn num_shots(&self) -> usize {
        self.rows.len()
    }
}
