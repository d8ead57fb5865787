//! Rigel Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Rigel. A circuit is an ordered sequence of gate operations
//! over a fixed qubit set, plus a table of classical registers that
//! measurement outcomes are written into.
//!
//! # Core Components
//!
//! - **Qubits and classical bits**: [`QubitId`] for quantum addressing,
//!   [`ClassicalRegister`]/[`CregId`]/[`ClbitRef`] for classical addressing
//!   through a single register-table indirection
//! - **Gates**: [`StandardGate`] for the common gate set and [`QuilGate`]
//!   for the Quil two-qubit parameterized family (XY, PSWAP, CPHASE00/01/10,
//!   CAN), each a plain value record with a matrix definition
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] high-level builder API with circuit-level
//!   metadata (rewiring directive, active reset)
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use rigel_ir::{Circuit, ClbitRef, CregId, QubitId};
//!
//! let mut circuit = Circuit::with_readout("bell_state", 2, 2);
//! let ro = CregId(0);
//!
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cnot(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure(QubitId(0), ClbitRef::new(ro, 0)).unwrap();
//! circuit.measure(QubitId(1), ClbitRef::new(ro, 1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 4);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Identity and Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `SDAGGER`, `T`, `TDAGGER` | 1 | Phase-family Cliffords |
//! | `RX`, `RY`, `RZ`, `PHASE` | 1 | Rotation gates |
//! | `CNOT`, `CZ`, `CPHASE` | 2 | Controlled gates |
//! | `SWAP`, `ISWAP` | 2 | Swap gates |
//! | `XY`, `PSWAP` | 2 | Parametric swap family |
//! | `CPHASE00`, `CPHASE01`, `CPHASE10` | 2 | Basis-state phases |
//! | `CAN` | 2 | Canonical gate CAN(α, β, γ) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{gate_instructions, Circuit};
pub use error::{IrError, IrResult};
pub use gate::{Gate, QuilGate, StandardGate, TwoQubitMatrix};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClassicalRegister, ClbitRef, CregId, QubitId};
