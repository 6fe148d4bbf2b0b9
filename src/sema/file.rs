//! [`AnalyzedFile`].

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;
use serde::Serialize;

use super::cfg::ControlFlowGraph;
use super::environment::{Environment, HashReference};
use super::kind::ValueKind;
use super::program::{Access, Program};
use super::register::Register;
use crate::SourceFile;
use crate::syntax::SyntaxTree;

/// One mention of a register in an operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterOccurrence {
	/// Where the register is named.
	pub span:     SourceSpan,
	/// The register as written, after alias resolution.
	pub register: Register,
	/// The alias the register was named through.
	pub alias:    Option<SharedStr>,
	/// Line of the instruction.
	pub line:     usize,
	/// Whether the instruction reads or writes the register.
	pub access:   Access,
	/// Kind before a read, or after a write. `None` if the register is unassigned here.
	pub kind:     Option<ValueKind>,
}

/// Whole-program facts about one register.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterSummary {
	/// The register.
	#[serde(serialize_with = "serialize_display")]
	pub register:    Register,
	/// Every alias bound to the register somewhere in the program.
	pub aliases:     Vec<SharedStr>,
	/// Number of instructions assigning the register.
	pub assignments: usize,
	/// Number of instructions reading the register.
	pub reads:       usize,
	/// Line number and text of every assigning instruction.
	pub history:     Vec<(usize, SharedStr)>,
}

fn serialize_display<S: serde::Serializer>(register: &Register, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.collect_str(register)
}

/// The analyzed model of one program: syntax, symbols, statements, control flow and the register facts derived from
/// them.
#[derive(Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AnalyzedFile {
	/// Underlying source code and file name.
	pub source:      Arc<SourceFile>,
	/// Parsed lines.
	pub tree:        SyntaxTree,
	/// Symbol table.
	pub environment: Environment,
	/// Resolved statements.
	pub program:     Program,
	/// Control flow graph of the statements.
	pub cfg:         ControlFlowGraph,
	/// Register mentions in source order.
	pub occurrences: Vec<RegisterOccurrence>,
	/// Per-register facts for every register the program touches, in slot order.
	pub summaries:   Vec<RegisterSummary>,
}

impl AnalyzedFile {
	/// Assembles the file model and derives the register summaries.
	#[must_use]
	pub fn new(
		tree: SyntaxTree,
		environment: Environment,
		program: Program,
		cfg: ControlFlowGraph,
		mut occurrences: Vec<RegisterOccurrence>,
	) -> Self {
		occurrences.sort_by_key(|occurrence| occurrence.span.offset());
		let summaries = summarize(&program, &environment);
		Self { source: tree.source.clone(), tree, environment, program, cfg, occurrences, summaries }
	}

	fn source_span_contains(this: SourceSpan, offset: usize) -> bool {
		this.offset() <= offset && this.offset() + this.len() > offset
	}

	/// Returns the register occurrence at the given offset, if any.
	#[must_use]
	pub fn occurrence_at(&self, offset: usize) -> Option<&RegisterOccurrence> {
		self.occurrences.iter().find(|occurrence| Self::source_span_contains(occurrence.span, offset))
	}

	/// Returns the hash written at the given offset, if any.
	#[must_use]
	pub fn hash_at(&self, offset: usize) -> Option<&HashReference> {
		self.program.hashes.iter().find(|hash| Self::source_span_contains(hash.span, offset))
	}

	/// All hashes written in the program, in source order.
	#[must_use]
	pub fn hashes(&self) -> Vec<&HashReference> {
		let mut hashes = self.program.hashes.iter().collect::<Vec<_>>();
		hashes.sort_by_key(|hash| hash.span.offset());
		hashes.dedup_by_key(|hash| hash.span);
		hashes
	}

	/// The summary of a register.
	#[must_use]
	pub fn summary_of(&self, register: Register) -> Option<&RegisterSummary> {
		self.summaries.iter().find(|summary| summary.register == register)
	}

	/// Returns the definition spans of a label, define or alias. Aliases may have several.
	#[must_use]
	pub fn definition_spans_of(&self, identifier: &str) -> Vec<SourceSpan> {
		if let Some(bindings) = self.environment.aliases.get(identifier) {
			return bindings.iter().map(|binding| binding.span).collect();
		}
		self.environment.first_definition(identifier).into_iter().collect()
	}

	/// The identifier at an offset: a label declaration, or an operand word naming a symbol.
	#[must_use]
	pub fn identifier_at(&self, offset: usize) -> Option<SharedStr> {
		let line = self.tree.lines.iter().find(|line| {
			line.span.offset() <= offset && offset <= line.span.offset() + line.span.len()
		})?;
		if let Some(label) = &line.label
			&& Self::source_span_contains(label.span, offset)
		{
			return Some(label.value.clone());
		}
		line.instruction.as_ref()?.operands.iter().find_map(|operand| match &operand.value {
			crate::syntax::OperandValue::Identifier(name) if Self::source_span_contains(operand.span, offset) =>
				Some(name.clone()),
			_ => None,
		})
	}
}

fn summarize(program: &Program, environment: &Environment) -> Vec<RegisterSummary> {
	Register::all_slots()
		.filter_map(|register| {
			let mut summary = RegisterSummary {
				register,
				aliases: environment.aliases_of(register),
				assignments: 0,
				reads: 0,
				history: Vec::new(),
			};
			for statement in &program.statements {
				let accesses = statement.accesses.iter().filter(|access| access.register == register);
				let (mut reads, mut writes) = (false, false);
				for access in accesses {
					match access.access {
						Access::Read => reads = true,
						Access::Write => writes = true,
					}
				}
				summary.reads += usize::from(reads);
				if writes {
					summary.assignments += 1;
					summary.history.push((statement.line, program.source.span_text(statement.span).into()));
				}
			}
			(summary.assignments > 0 || summary.reads > 0 || !summary.aliases.is_empty()).then_some(summary)
		})
		.collect()
}
