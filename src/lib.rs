//! Semantic analysis for the Stationeers IC10 assembly language.
//!
//! The crate turns IC10 program text into a semantic model (registers, aliases, labels, defines and device hashes),
//! infers the kind of value every register may hold at every line, and runs flow-sensitive register checks over the
//! control flow graph. The [`analysis::Analyzer`] runs the whole pipeline; the result is a list of
//! [`SemanticError`] diagnostics plus the facts editors need for hover and inlay hints.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(missing_docs)]
#![allow(non_upper_case_globals)]

pub mod analysis;
mod change;
#[cfg(feature = "binaries")] pub mod cli;
mod common;
pub mod config;
pub mod devices;
mod error;
pub mod limits;
pub mod parser;
pub mod sema;
pub mod session;
mod source;
pub mod suppress;
pub mod syntax;
#[cfg(test)] mod test;

pub use analysis::{Analysis, Analyzer};
pub use change::Change;
pub use common::{VariantName, run_analysis, run_analysis_on_source};
pub use config::Configuration;
pub use error::{DiagnosticCategory, ErrorCodes, SemanticError};
pub use source::SourceFile;
