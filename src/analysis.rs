//! The analysis pipeline: parse, build symbols, lower, build control flow, run dataflow, then filter and append size
//! diagnostics.

use std::sync::Arc;

use crate::SourceFile;
use crate::config::Configuration;
use crate::devices::HashResolver;
use crate::error::SemanticError;
use crate::sema::cfg::ControlFlowGraph;
use crate::sema::{AnalyzedFile, Environment, Program, dataflow};
use crate::session::{CancellationToken, Cancelled};
use crate::suppress::Suppressions;

/// Result of one analysis pass.
#[derive(Clone, Debug)]
pub struct Analysis {
	/// The analyzed program model.
	pub file:         AnalyzedFile,
	/// Emitted diagnostics, ordered by position.
	pub diagnostics:  Vec<SemanticError>,
	/// The suppression directives of the program.
	pub suppressions: Suppressions,
}

impl Analysis {
	/// Whether any emitted diagnostic has error severity.
	#[must_use]
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(SemanticError::is_error)
	}
}

/// Runs analysis passes with a fixed hash resolver and configuration. The resolver is shared read-only across passes.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
	/// Device hash lookup.
	pub resolver: HashResolver,
	/// Ceilings and switches.
	pub config:   Configuration,
}

impl Analyzer {
	/// An analyzer with the built-in device table.
	#[must_use]
	pub fn new(config: Configuration) -> Self {
		Self { resolver: HashResolver::default(), config }
	}

	/// Analyzes one program from scratch.
	///
	/// # Errors
	/// [`Cancelled`] if the token is cancelled before the pass finishes; nothing of the pass is kept.
	pub fn analyze(&self, source: &Arc<SourceFile>, token: &CancellationToken) -> Result<Analysis, Cancelled> {
		let (tree, mut diagnostics) = crate::parser::parse(source);
		token.check()?;

		let (environment, mut errors) = Environment::build(&tree, &self.resolver);
		diagnostics.append(&mut errors);
		let (program, mut errors) = Program::lower(&tree, &environment, &self.resolver);
		diagnostics.append(&mut errors);
		token.check()?;

		let cfg = ControlFlowGraph::build(&program, &environment);
		let mut facts = dataflow::analyze(&program, &cfg, &environment, token)?;
		diagnostics.append(&mut facts.diagnostics);

		let suppressions = Suppressions::collect(&tree, &environment);
		let mut diagnostics = suppressions.apply(diagnostics, &tree);
		diagnostics.extend(crate::limits::check(source, &self.config));
		if !self.config.diagnostics_enabled {
			diagnostics.clear();
		}
		diagnostics.sort_by_key(|diagnostic| diagnostic.location().offset());
		token.check()?;

		log::debug!("analyzed {}: {} diagnostics", source.file_name(), diagnostics.len());
		let file = AnalyzedFile::new(tree, environment, program, cfg, facts.occurrences);
		Ok(Analysis { file, diagnostics, suppressions })
	}
}
