//! Job lifecycle: compile at construction, execute lazily, cache forever.
//!
//! The job state machine:
//!
//! ```text
//!   construction ──→ Running ──→ Done      (first result() succeeds)
//!        │              │
//!        │              └──────→ Error     (first result() fails)
//!        └──→ Err(...)                     (compilation fails; no Job value)
//! ```
//!
//! There is no `Queued` or `Cancelled` state: compilation runs eagerly
//! inside construction and execution runs synchronously inside the first
//! `result()` call, so nothing is ever waiting or abortable.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rigel_ir::Circuit;
use rigel_quil::{emit, Program};

use crate::backend::ExecutionOptions;
use crate::error::{ProviderError, ProviderResult};
use crate::qpu::QuantumComputer;
use crate::result::{CircuitResult, JobResult};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// The job exists and its result has not been computed yet.
    Running,
    /// The result has been computed and cached.
    Done,
    /// The first result computation failed.
    Error,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Done => write!(f, "Done"),
            JobStatus::Error => write!(f, "Error"),
        }
    }
}

#[derive(Default)]
struct JobState {
    result: Option<JobResult>,
    error: Option<String>,
}

/// A job: one or more prepared circuits compiled against a backend, with a
/// lazily computed, cached result.
///
/// Construction drives every circuit through the compilation stage; a
/// compilation failure means no `Job` value exists at all. The identifier,
/// circuits and compiled programs are immutable after construction. The
/// cached result is the only state mutated afterward, exactly once.
pub struct Job {
    id: JobId,
    backend_name: String,
    shots: u32,
    circuits: Vec<Circuit>,
    programs: Vec<Program>,
    qc: Arc<dyn QuantumComputer>,
    state: Mutex<JobState>,
}

impl Job {
    /// Create a job from prepared circuits, compiling each one.
    ///
    /// Circuits must already be prepared (see [`crate::prepare`]); the
    /// backend façade does this for callers. Compilation runs the
    /// pre-compilation hook chain over each circuit's Quil source, compiles
    /// it to a native program, runs the pre-execution hook chain over the
    /// program, and, when nativeness enforcement is requested and at least
    /// one pre-execution hook ran, compiles a second time to restore
    /// nativeness. The enforcement flag alone never triggers a recompile.
    pub fn new(
        id: JobId,
        circuits: Vec<Circuit>,
        options: &ExecutionOptions,
        qc: Arc<dyn QuantumComputer>,
    ) -> ProviderResult<Self> {
        let backend_name = qc.name().to_string();
        let mut programs = Vec::with_capacity(circuits.len());
        for circuit in &circuits {
            programs.push(compile_circuit(circuit, qc.as_ref(), options)?);
        }
        Ok(Self {
            id,
            backend_name,
            shots: options.shots(),
            circuits,
            programs,
            qc,
            state: Mutex::new(JobState::default()),
        })
    }

    /// The job identifier.
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Name of the backend this job targets.
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Number of shots each circuit will run for.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// The prepared circuits, in submission order.
    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// The compiled programs, in submission order.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Current lifecycle status.
    pub fn status(&self) -> JobStatus {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.result.is_some() {
            JobStatus::Done
        } else if state.error.is_some() {
            JobStatus::Error
        } else {
            JobStatus::Running
        }
    }

    /// Get the job result, executing on first call and returning the cached
    /// result thereafter.
    ///
    /// The first call blocks on the backend run and caches the aggregate;
    /// later calls return an equal value (same `date`) without touching the
    /// backend again. The cache guard is a mutex held across the
    /// computation, so concurrent callers cannot trigger a second
    /// execution. A failure is returned to the caller and never cached as a
    /// success.
    pub fn result(&self) -> ProviderResult<JobResult> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(result) = &state.result {
            return Ok(result.clone());
        }
        match self.execute_all() {
            Ok(result) => {
                state.result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn execute_all(&self) -> ProviderResult<JobResult> {
        let mut results = Vec::with_capacity(self.programs.len());
        for (circuit, program) in self.circuits.iter().zip(&self.programs) {
            debug!(
                job = %self.id,
                circuit = circuit.name(),
                shots = self.shots,
                "executing circuit"
            );
            let executable = self.qc.link(program)?;
            let memory = self.qc.run(&executable, self.shots)?;
            results.push(CircuitResult::from_memory(
                circuit.name(),
                self.shots,
                &memory,
            ));
        }
        let success = results.iter().all(|r| r.success);
        Ok(JobResult {
            backend_name: self.backend_name.clone(),
            job_id: self.id.clone(),
            success,
            date: Utc::now(),
            results,
        })
    }

    /// Cancelling is not part of this execution model; always fails.
    pub fn cancel(&self) -> ProviderResult<()> {
        Err(ProviderError::UnsupportedOperation(
            "Cancelling jobs is not supported".to_string(),
        ))
    }

    /// Explicit submission is not part of this execution model; always
    /// fails. Jobs execute through the synchronous request/response
    /// pattern: compilation at construction, execution at the first result
    /// query.
    pub fn submit(&self) -> ProviderResult<()> {
        Err(ProviderError::UnsupportedOperation(
            "'submit' is not supported; jobs follow the synchronous request/response pattern"
                .to_string(),
        ))
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("backend_name", &self.backend_name)
            .field("shots", &self.shots)
            .field("circuits", &self.circuits.len())
            .field("status", &self.status())
            .finish()
    }
}

/// Drive one circuit through the compilation stage.
fn compile_circuit(
    circuit: &Circuit,
    qc: &dyn QuantumComputer,
    options: &ExecutionOptions,
) -> ProviderResult<Program> {
    let source = emit(circuit)?;
    let source = options.before_compile().apply(source)?;

    debug!(circuit = circuit.name(), "compiling to native program");
    let mut program = qc.compile(&source)?;

    if !options.before_execute().is_empty() {
        program = options.before_execute().apply(program)?;
        if options.ensure_native() {
            // Hooks may have introduced non-native instructions; compile
            // again. Skipped when no pre-execution hook ran, even with the
            // flag set.
            debug!(
                circuit = circuit.name(),
                "re-compiling after pre-execution hooks"
            );
            program = qc.compile(&program.to_string())?;
        }
    }

    Ok(program)
}
