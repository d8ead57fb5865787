//! Rigel Local Statevector QVM
//!
//! This crate provides a local quantum virtual machine for testing,
//! development and small-scale experiments. It implements the full
//! [`rigel_provider::QuantumComputer`] contract:
//!
//! - **compile**: parse Quil source, reject circuits larger than the QVM,
//!   and rewrite every gate into the native set {RX, RZ, CZ, CPHASE, XY}
//! - **link**: validate memory references and seal the program
//! - **run**: dense statevector simulation, shot by shot, with projective
//!   measurement collapse and per-shot readout memory
//!
//! Statevector simulation is exact but memory-bound: every extra qubit
//! doubles the amplitude vector, so ~20-25 qubits is the practical limit.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rigel_adapter_qvm::QvmComputer;
//! use rigel_ir::Circuit;
//! use rigel_provider::{Backend, ExecutionOptions};
//!
//! let backend = Backend::new(Arc::new(QvmComputer::new(2)));
//! let job = backend.run_one(&Circuit::bell()?, ExecutionOptions::new())?;
//!
//! // Expect ~50% "00" and ~50% "11".
//! let result = job.result()?;
//! println!("{:?}", result.results[0].counts);
//! # Ok::<(), rigel_provider::ProviderError>(())
//! ```

mod error;
mod qvm;
mod statevector;
mod translate;

pub use error::QvmError;
pub use qvm::QvmComputer;
pub use translate::{is_native, to_native, NATIVE_GATES};
