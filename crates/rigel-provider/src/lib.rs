//! Rigel Job Execution Pipeline
//!
//! This crate turns prepared circuits into compiled, executable programs
//! and runs them against a quantum computer, mediating between the circuit
//! object model (`rigel-ir`) and a hardware-facing compile/link/run
//! contract.
//!
//! # Pipeline
//!
//! ```text
//!   prepare ──→ emit Quil ──→ [pre-compile hooks] ──→ compile
//!                                                        │
//!            run ←── link ←── [compile #2]* ←── [pre-execution hooks]
//! ```
//!
//! `*` compile #2 only happens when nativeness enforcement is requested AND
//! at least one pre-execution hook ran.
//!
//! Compilation happens eagerly inside [`Job`] construction; execution is
//! deferred until the first [`Job::result`] call, which computes and caches
//! a [`JobResult`] exactly once. There is no queue and no cancellation:
//! the execution model is synchronous request/response.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rigel_ir::Circuit;
//! use rigel_provider::{Backend, ExecutionOptions};
//! use rigel_adapter_qvm::QvmComputer;
//!
//! let backend = Backend::new(Arc::new(QvmComputer::new(2)));
//! let job = backend.run_one(
//!     &Circuit::bell()?,
//!     ExecutionOptions::new().with_shots(1000),
//! )?;
//! let result = job.result()?;
//! println!("counts: {:?}", result.results[0].counts);
//! # Ok::<(), rigel_provider::ProviderError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod hooks;
pub mod job;
pub mod prepare;
pub mod qpu;
pub mod result;

pub use backend::{Backend, ExecutionOptions, DEFAULT_SHOTS};
pub use config::BackendConfig;
pub use error::{ProviderError, ProviderResult};
pub use hooks::{enable_active_reset, HookChain, HookFn};
pub use job::{Job, JobId, JobStatus};
pub use prepare::{normalize_readout, prepare_circuit, strip_barriers, READOUT_REGISTER};
pub use qpu::{Executable, QuantumComputer, ReadoutMemory};
pub use result::{CircuitResult, Counts, JobResult};
