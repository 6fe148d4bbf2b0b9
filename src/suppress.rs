//! In-source suppression directives.
//!
//! A comment of the form `# ignore r1, temp` exempts the named registers from dataflow diagnostics on the directive's
//! line and every line after it. A bare `# ignore` exempts the whole file. Names are matched by register identity, so
//! naming an alias covers every register the alias is bound to, and naming a register covers all of its aliases.

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;

use crate::error::{DiagnosticCategory, SemanticError};
use crate::sema::{Environment, Register};
use crate::syntax::SyntaxTree;

/// One `# ignore` comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
	/// Line of the comment.
	pub line:  usize,
	/// Span of the whole comment, including `#`.
	pub span:  SourceSpan,
	/// Names as written, in order.
	pub names: Vec<SharedStr>,
}

/// The suppression state of one program.
#[derive(Clone, Debug, Default)]
pub struct Suppressions {
	/// All directives in source order.
	pub directives: Vec<Directive>,
	whole_file:     bool,
	/// Registers with the first line their suppression applies to.
	registers:      Vec<(Register, usize)>,
}

/// Parses the text of a comment, without `#`, as an ignore directive and returns the names it lists.
#[must_use]
pub fn parse_directive(comment: &str) -> Option<Vec<SharedStr>> {
	let comment = comment.trim_start();
	let keyword = comment.get(.. 6)?;
	if !keyword.eq_ignore_ascii_case("ignore") {
		return None;
	}
	let rest = &comment[6 ..];
	if !(rest.is_empty() || rest.starts_with(|chr: char| chr.is_whitespace() || chr == ':')) {
		return None;
	}
	let rest = rest.trim_start().strip_prefix(':').unwrap_or(rest);
	Some(
		rest.split(|chr: char| chr == ',' || chr.is_whitespace())
			.filter(|name| !name.is_empty())
			.map(SharedStr::from)
			.collect(),
	)
}

impl Suppressions {
	/// Collects the directives of a program and resolves their names against its aliases.
	#[must_use]
	pub fn collect(tree: &SyntaxTree, environment: &Environment) -> Self {
		let mut suppressions = Self::default();
		for line in &tree.lines {
			let Some(comment) = &line.comment else { continue };
			let Some(names) = parse_directive(&comment.value) else { continue };
			if names.is_empty() {
				suppressions.whole_file = true;
			}
			for name in &names {
				let registers = match Register::parse(name) {
					Some(register) => vec![register],
					None => environment.registers_of_alias(name).collect(),
				};
				if registers.is_empty() {
					log::debug!("ignore directive on line {} names unknown register `{name}`", line.number + 1);
				}
				suppressions.registers.extend(registers.into_iter().map(|register| (register, line.number)));
			}
			suppressions.directives.push(Directive { line: line.number, span: comment.span, names });
		}
		suppressions
	}

	/// Whether a diagnostic is exempted. Only dataflow hazards can be suppressed; unused-register reports belong to no
	/// single line, so any directive naming the register silences them.
	#[must_use]
	pub fn suppresses(&self, diagnostic: &SemanticError, line: usize) -> bool {
		if diagnostic.category() != DiagnosticCategory::DataflowHazard {
			return false;
		}
		if self.whole_file {
			return true;
		}
		let Some(key) = diagnostic.suppression_key() else {
			return false;
		};
		let anywhere = matches!(diagnostic, SemanticError::UnusedRegister { .. });
		self.registers.iter().any(|(register, from_line)| *register == key && (anywhere || *from_line <= line))
	}

	/// Removes suppressed diagnostics.
	#[must_use]
	pub fn apply(&self, diagnostics: Vec<SemanticError>, tree: &SyntaxTree) -> Vec<SemanticError> {
		let before = diagnostics.len();
		let remaining = diagnostics
			.into_iter()
			.filter(|diagnostic| {
				let line = tree.source.line_of_offset(diagnostic.location().offset());
				!self.suppresses(diagnostic, line)
			})
			.collect::<Vec<_>>();
		log::trace!("suppressed {} diagnostics", before - remaining.len());
		remaining
	}
}

/// An edit that adds a name to the suppression directive of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppressionEdit {
	/// The comment to replace, or `None` to insert a new line at the very start of the program.
	pub replace:  Option<SourceSpan>,
	/// Replacement comment text, or the inserted line including its line break.
	pub new_text: String,
}

/// Builds the edit that adds `name` to the first ignore directive, or inserts a new directive at the top. Returns
/// `None` if the first directive already names it.
#[must_use]
pub fn add_to_directive(suppressions: &Suppressions, name: &str) -> Option<SuppressionEdit> {
	let Some(directive) = suppressions.directives.first() else {
		return Some(SuppressionEdit { replace: None, new_text: format!("# ignore {name}\n") });
	};
	if directive.names.iter().any(|existing| existing.as_str() == name) {
		return None;
	}
	let names = directive.names.iter().map(SharedStr::as_str).chain(std::iter::once(name)).collect::<Vec<_>>();
	Some(SuppressionEdit { replace: Some(directive.span), new_text: format!("# ignore {}", names.join(", ")) })
}
