//! Backend façade: the caller-facing entry point of the pipeline.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use rigel_ir::Circuit;
use rigel_quil::Program;

use crate::error::ProviderResult;
use crate::hooks::HookChain;
use crate::job::{Job, JobId};
use crate::prepare::prepare_circuit;
use crate::qpu::QuantumComputer;

/// Default shot count when the caller does not specify one.
pub const DEFAULT_SHOTS: u32 = 1000;

/// Options for one job submission.
///
/// Hook chains accept a single hook or an ordered list; see
/// [`HookChain`]. The nativeness-enforcement flag only has an effect when
/// at least one pre-execution hook is supplied.
#[derive(Clone, Debug, Default)]
pub struct ExecutionOptions {
    shots: Option<u32>,
    before_compile: HookChain<String>,
    before_execute: HookChain<Program>,
    ensure_native: bool,
}

impl ExecutionOptions {
    /// Create options with defaults: 1000 shots, no hooks, no nativeness
    /// enforcement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set the pre-compilation hook chain.
    #[must_use]
    pub fn with_before_compile(mut self, hooks: HookChain<String>) -> Self {
        self.before_compile = hooks;
        self
    }

    /// Append a single pre-compilation hook.
    #[must_use]
    pub fn with_before_compile_hook(
        mut self,
        hook: impl Fn(String) -> anyhow::Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.before_compile.push(hook);
        self
    }

    /// Set the pre-execution hook chain.
    #[must_use]
    pub fn with_before_execute(mut self, hooks: HookChain<Program>) -> Self {
        self.before_execute = hooks;
        self
    }

    /// Append a single pre-execution hook.
    #[must_use]
    pub fn with_before_execute_hook(
        mut self,
        hook: impl Fn(Program) -> anyhow::Result<Program> + Send + Sync + 'static,
    ) -> Self {
        self.before_execute.push(hook);
        self
    }

    /// Require the program to be re-compiled after pre-execution hooks run,
    /// guarding against hooks that introduce non-native instructions.
    #[must_use]
    pub fn with_ensure_native(mut self, ensure_native: bool) -> Self {
        self.ensure_native = ensure_native;
        self
    }

    /// The shot count.
    pub fn shots(&self) -> u32 {
        self.shots.unwrap_or(DEFAULT_SHOTS)
    }

    /// The pre-compilation hook chain.
    pub fn before_compile(&self) -> &HookChain<String> {
        &self.before_compile
    }

    /// The pre-execution hook chain.
    pub fn before_execute(&self) -> &HookChain<Program> {
        &self.before_execute
    }

    /// Whether nativeness enforcement is requested.
    pub fn ensure_native(&self) -> bool {
        self.ensure_native
    }
}

/// A backend targeting one quantum computer.
///
/// `run` prepares each input circuit (barrier stripping, readout
/// normalization) and constructs a [`Job`], which compiles eagerly. The
/// caller's circuits are never mutated.
pub struct Backend {
    qc: Arc<dyn QuantumComputer>,
}

impl Backend {
    /// Create a backend over a quantum computer.
    pub fn new(qc: Arc<dyn QuantumComputer>) -> Self {
        Self { qc }
    }

    /// Name of the underlying quantum computer.
    pub fn name(&self) -> &str {
        self.qc.name()
    }

    /// Number of qubits the underlying quantum computer exposes.
    pub fn num_qubits(&self) -> u32 {
        self.qc.num_qubits()
    }

    /// Submit circuits for execution, returning a job with a fresh
    /// identifier.
    pub fn run(&self, circuits: &[Circuit], options: ExecutionOptions) -> ProviderResult<Job> {
        let prepared = circuits
            .iter()
            .map(prepare_circuit)
            .collect::<ProviderResult<Vec<_>>>()?;
        let id = JobId::new(Uuid::new_v4().to_string());
        info!(
            job = %id,
            backend = self.qc.name(),
            circuits = prepared.len(),
            shots = options.shots(),
            "submitting job"
        );
        Job::new(id, prepared, &options, Arc::clone(&self.qc))
    }

    /// Submit a single circuit for execution.
    pub fn run_one(&self, circuit: &Circuit, options: ExecutionOptions) -> ProviderResult<Job> {
        self.run(std::slice::from_ref(circuit), options)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.qc.name())
            .field("num_qubits", &self.qc.num_qubits())
            .finish()
    }
}
