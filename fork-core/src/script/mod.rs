//! Script inspection and construction
//!
//! The fork rules never execute scripts; they only need to walk the
//! instructions of an output script and, in tests and tooling, build one.

pub mod instruction;
pub mod script_builder;

pub use instruction::{Instruction, InstructionError, Instructions};
pub use script_builder::{ScriptBuilder, ScriptBuilderError};
