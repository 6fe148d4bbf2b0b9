//! Error and warning reporting.

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use ic10sema_derive::{ErrorCodes, VariantName};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::SourceFile;
use crate::sema::kind::ValueKind;
use crate::sema::register::Register;

#[allow(clippy::module_name_repetitions)]
/// Lists every diagnostic code an error type can produce.
pub trait ErrorCodes {
	/// All distinct codes, in declaration order.
	fn all_codes() -> &'static [&'static str];
}

/// The coarse classes diagnostics fall into. Suppression directives only ever act on
/// [`DiagnosticCategory::DataflowHazard`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DiagnosticCategory {
	/// Malformed declarations and statements; the offending construct is skipped.
	ParseAdjacent,
	/// Names and hashes that do not resolve.
	Resolution,
	/// Operands whose value kind does not fit what the instruction expects.
	KindAdvisory,
	/// Uninitialized reads, dead assignments and unused registers.
	DataflowHazard,
	/// Program size ceilings.
	SizeLimit,
}

/// All diagnostics that analysis can report to the user.
#[derive(Error, Debug, Clone, Diagnostic, ErrorCodes, VariantName)]
#[allow(clippy::module_name_repetitions, missing_docs)]
pub enum SemanticError {
	//#region Parse-adjacent: malformed statements and declarations
	#[error("{message}")]
	#[diagnostic(code(ic10::syntax::invalid_token), severity(Error))]
	SyntaxError {
		message:  SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Here")]
		location: SourceSpan,
	},

	#[error("`{operation}` is not a valid instruction")]
	#[diagnostic(
		code(ic10::syntax::invalid_instruction),
		severity(Error),
		help("{}", suggestion.as_ref().map_or_else(|| "Check the spelling of the instruction".to_owned(), |suggestion| format!("Did you mean `{suggestion}`?")))
	)]
	InvalidInstruction {
		operation:  SharedStr,
		suggestion: Option<SharedStr>,
		#[source_code]
		src:        Arc<SourceFile>,
		#[label("Unknown instruction")]
		location:   SourceSpan,
	},

	#[error("`{operation}` takes {expected} operand{}, but {actual} were given", if *.expected == 1 { "" } else { "s" })]
	#[diagnostic(code(ic10::syntax::operand_count), severity(Error), help("The signature is `{signature}`"))]
	OperandCount {
		operation: SharedStr,
		expected:  usize,
		actual:    usize,
		signature: SharedStr,
		#[source_code]
		src:       Arc<SourceFile>,
		#[label("In this instruction")]
		location:  SourceSpan,
	},

	#[error("Operand {} of `{operation}` must be {expected}", .index + 1)]
	#[diagnostic(code(ic10::syntax::invalid_operand), severity(Error))]
	InvalidOperand {
		operation: SharedStr,
		index:     usize,
		expected:  SharedStr,
		#[source_code]
		src:       Arc<SourceFile>,
		#[label("This operand")]
		location:  SourceSpan,
	},

	#[error("`{name}` is already defined")]
	#[diagnostic(code(ic10::symbol::duplicate_definition), severity(Error))]
	DuplicateDefinition {
		name:             SharedStr,
		#[source_code]
		src:              Arc<SourceFile>,
		#[label("Defined again here")]
		location:         SourceSpan,
		#[label("First defined here")]
		first_definition: SourceSpan,
	},

	#[error("Alias `{name}` must name a register or a device")]
	#[diagnostic(
		code(ic10::symbol::invalid_alias),
		severity(Error),
		help("Aliases bind directly to registers (`r0`..`r15`, `sp`, `ra`) or devices (`d0`..`d5`, `db`); they cannot refer to other aliases")
	)]
	InvalidAlias {
		name:     SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Not a register or device")]
		location: SourceSpan,
	},

	#[error("Define `{name}` must have a constant value")]
	#[diagnostic(
		code(ic10::symbol::invalid_define),
		severity(Error),
		help("Defines accept numbers, `HASH(\"...\")`, `STR(\"...\")` and other defines")
	)]
	InvalidDefine {
		name:     SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Not a constant")]
		location: SourceSpan,
	},
	//#endregion

	//#region Resolution
	#[error("Unknown identifier `{name}`")]
	#[diagnostic(code(ic10::resolution::unknown_identifier), severity(Error))]
	UnknownIdentifier {
		name:     SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Not an alias, define, label or keyword")]
		location: SourceSpan,
	},

	#[error("Label `{name}` is never defined")]
	#[diagnostic(code(ic10::resolution::undefined_label), severity(Error))]
	UndefinedLabel {
		name:     SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Jump target")]
		location: SourceSpan,
	},

	#[error("\"{name}\" is not a known device name")]
	#[diagnostic(
		code(ic10::resolution::unresolved_device_hash),
		severity(Advice),
		help("{}", suggestion.as_ref().map_or_else(|| "The hash is still computed, but no device carries it".to_owned(), |(canonical, display)| format!("Did you mean \"{canonical}\" ({display})?")))
	)]
	UnresolvedDeviceHash {
		name:       SharedStr,
		suggestion: Option<(SharedStr, SharedStr)>,
		#[source_code]
		src:        Arc<SourceFile>,
		#[label("Hashes to an unknown device")]
		location:   SourceSpan,
	},
	//#endregion

	//#region Kind advisories
	#[error("`{name}` holds a {actual} value, but `{operation}` expects {expected} here")]
	#[diagnostic(code(ic10::kind::mismatch), severity(Warning))]
	KindMismatch {
		name:      SharedStr,
		operation: SharedStr,
		expected:  SharedStr,
		actual:    ValueKind,
		#[source_code]
		src:       Arc<SourceFile>,
		#[label("Holds a {actual} value")]
		location:  SourceSpan,
	},

	#[error("`{operation}` jumps to an absolute line number")]
	#[diagnostic(
		code(ic10::kind::absolute_jump),
		severity(Warning),
		help("Line numbers shift whenever the program is edited; jump to a label instead")
	)]
	AbsoluteJump {
		operation: SharedStr,
		#[source_code]
		src:       Arc<SourceFile>,
		#[label("Absolute line number")]
		location:  SourceSpan,
	},

	#[error("`{found}` should be spelled `{expected}`")]
	#[diagnostic(code(ic10::kind::keyword_case), severity(Warning))]
	KeywordCase {
		found:    SharedStr,
		expected: SharedStr,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Keywords are case sensitive")]
		location: SourceSpan,
	},
	//#endregion

	//#region Dataflow hazards
	#[error("`{name}` is read before it is ever assigned")]
	#[diagnostic(
		code(ic10::dataflow::read_before_assign),
		severity(Error),
		help("No path from the start of the program assigns {register} before this point")
	)]
	ReadBeforeAssign {
		name:     SharedStr,
		register: Register,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Read here")]
		location: SourceSpan,
	},

	#[error("The value assigned to `{name}` is never read")]
	#[diagnostic(
		code(ic10::dataflow::never_read),
		severity(Warning),
		help("Every path from here reaches the end of the program or another assignment to {register} first")
	)]
	NeverRead {
		name:     SharedStr,
		register: Register,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Assigned here")]
		location: SourceSpan,
	},

	#[error("`{name}` is never used")]
	#[diagnostic(
		code(ic10::dataflow::unused_register),
		severity(Warning),
		help("{register} is neither assigned nor read anywhere in the program")
	)]
	UnusedRegister {
		name:     SharedStr,
		register: Register,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Declared here")]
		location: SourceSpan,
	},
	//#endregion

	//#region Size limits
	#[error("Program has {lines} lines, more than the maximum of {max}")]
	#[diagnostic(code(ic10::limit::lines), severity(Warning))]
	LineLimit {
		lines:    usize,
		max:      usize,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("These lines do not fit")]
		location: SourceSpan,
	},

	#[error("Line {} is {columns} characters long, more than the maximum of {max}", .line + 1)]
	#[diagnostic(code(ic10::limit::columns), severity(Warning))]
	ColumnLimit {
		line:     usize,
		columns:  usize,
		max:      usize,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Past the column limit")]
		location: SourceSpan,
	},

	#[error("Program is {bytes} bytes long, more than the maximum of {max}")]
	#[diagnostic(
		code(ic10::limit::bytes),
		severity(Warning),
		help("Line breaks are stored as two bytes each")
	)]
	ByteLimit {
		bytes:    usize,
		max:      usize,
		#[source_code]
		src:      Arc<SourceFile>,
		#[label("Past the byte limit")]
		location: SourceSpan,
	},
	//#endregion
}

impl SemanticError {
	/// The category this diagnostic belongs to.
	#[must_use]
	pub const fn category(&self) -> DiagnosticCategory {
		match self {
			Self::SyntaxError { .. }
			| Self::InvalidInstruction { .. }
			| Self::OperandCount { .. }
			| Self::InvalidOperand { .. }
			| Self::DuplicateDefinition { .. }
			| Self::InvalidAlias { .. }
			| Self::InvalidDefine { .. } => DiagnosticCategory::ParseAdjacent,
			Self::UnknownIdentifier { .. } | Self::UndefinedLabel { .. } | Self::UnresolvedDeviceHash { .. } =>
				DiagnosticCategory::Resolution,
			Self::KindMismatch { .. } | Self::AbsoluteJump { .. } | Self::KeywordCase { .. } =>
				DiagnosticCategory::KindAdvisory,
			Self::ReadBeforeAssign { .. } | Self::NeverRead { .. } | Self::UnusedRegister { .. } =>
				DiagnosticCategory::DataflowHazard,
			Self::LineLimit { .. } | Self::ColumnLimit { .. } | Self::ByteLimit { .. } => DiagnosticCategory::SizeLimit,
		}
	}

	/// The canonical register a suppression directive has to name to silence this diagnostic.
	#[must_use]
	pub const fn suppression_key(&self) -> Option<Register> {
		match self {
			Self::ReadBeforeAssign { register, .. }
			| Self::NeverRead { register, .. }
			| Self::UnusedRegister { register, .. } => Some(*register),
			_ => None,
		}
	}

	/// The primary location of this diagnostic.
	#[must_use]
	pub const fn location(&self) -> SourceSpan {
		match self {
			Self::SyntaxError { location, .. }
			| Self::InvalidInstruction { location, .. }
			| Self::OperandCount { location, .. }
			| Self::InvalidOperand { location, .. }
			| Self::DuplicateDefinition { location, .. }
			| Self::InvalidAlias { location, .. }
			| Self::InvalidDefine { location, .. }
			| Self::UnknownIdentifier { location, .. }
			| Self::UndefinedLabel { location, .. }
			| Self::UnresolvedDeviceHash { location, .. }
			| Self::KindMismatch { location, .. }
			| Self::AbsoluteJump { location, .. }
			| Self::KeywordCase { location, .. }
			| Self::ReadBeforeAssign { location, .. }
			| Self::NeverRead { location, .. }
			| Self::UnusedRegister { location, .. }
			| Self::LineLimit { location, .. }
			| Self::ColumnLimit { location, .. }
			| Self::ByteLimit { location, .. } => *location,
		}
	}

	/// Whether this diagnostic has error severity.
	#[must_use]
	pub fn is_error(&self) -> bool {
		self.severity().is_none_or(|severity| severity == miette::Severity::Error)
	}

	/// The diagnostic code as a string, for example `ic10::dataflow::never_read`.
	#[must_use]
	pub fn code_name(&self) -> SharedStr {
		self.code().map(|code| code.to_string().into()).unwrap_or_default()
	}
}
