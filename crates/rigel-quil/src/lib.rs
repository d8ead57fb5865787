//! Quil text layer for Rigel
//!
//! This crate handles everything textual about Quil: the [`Program`] type
//! (an ordered instruction sequence whose `Display` impl renders source
//! text), a lexer and line-oriented parser, and an emitter that serializes
//! a [`rigel_ir::Circuit`] to Quil source.
//!
//! The program type is deliberately a wire format: gate applications carry
//! a name, concrete parameters and qubit indices, and which gates are
//! meaningful is decided by the consumer (a translator or executor).
//!
//! # Example
//!
//! ```rust
//! use rigel_ir::Circuit;
//! use rigel_quil::{emit, parse};
//!
//! let circuit = Circuit::bell().unwrap();
//! let source = emit(&circuit).unwrap();
//! assert!(source.starts_with("DECLARE ro BIT[2]"));
//!
//! // Source text round-trips through the parser.
//! let program = parse(&source).unwrap();
//! assert_eq!(parse(&program.to_string()).unwrap(), program);
//! ```

pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod program;

pub use emitter::emit;
pub use error::{QuilError, QuilResult};
pub use parser::parse;
pub use program::{MemoryRef, Program, QuilInstruction};
