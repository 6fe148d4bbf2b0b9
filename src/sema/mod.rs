//! Semantic analysis: symbols, resolved statements, control flow and register dataflow.

pub mod cfg;
pub mod dataflow;
mod environment;
mod file;
pub mod instruction;
pub mod kind;
pub mod program;
pub mod register;
#[cfg(test)] mod test;

pub use environment::{
	AliasBinding, AliasTarget, Define, Environment, HashReference, Label, numeric_hash_reference, pack_str,
};
pub use file::{AnalyzedFile, RegisterOccurrence, RegisterSummary};
pub use kind::ValueKind;
pub use program::{Access, Program, Resolved, Statement};
pub use register::{Device, DeviceSpec, Register};
