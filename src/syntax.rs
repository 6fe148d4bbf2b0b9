//! The syntax tree consumed by semantic analysis.
//!
//! IC10 is strictly line-based: every source line is one program slot, so the tree is a flat list of lines, each
//! carrying at most one label, one instruction and one comment. Line numbers double as jump targets.

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;

use crate::SourceFile;
use crate::sema::register::{DeviceSpec, Register};

/// A value with the source range it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
	/// The value.
	pub value: T,
	/// Where the value was written.
	pub span:  SourceSpan,
}

impl<T> Spanned<T> {
	/// Pairs a value with its span.
	pub const fn new(value: T, span: SourceSpan) -> Self {
		Self { value, span }
	}
}

/// A parsed program.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
	/// The text the tree was parsed from; diagnostics point into it.
	pub source: Arc<SourceFile>,
	/// One entry per source line, in order.
	pub lines:  Vec<Line>,
}

impl SyntaxTree {
	/// Iterates all instructions with their line numbers.
	pub fn instructions(&self) -> impl Iterator<Item = (usize, &Instruction)> {
		self.lines.iter().filter_map(|line| line.instruction.as_ref().map(|instruction| (line.number, instruction)))
	}
}

/// One source line.
#[derive(Clone, Debug)]
pub struct Line {
	/// Zero-based line number, which is also the program counter value of this line.
	pub number:      usize,
	/// The whole line, excluding the line break.
	pub span:        SourceSpan,
	/// Label declared on this line, without the colon.
	pub label:       Option<Spanned<SharedStr>>,
	/// Instruction on this line.
	pub instruction: Option<Instruction>,
	/// Comment text after `#`.
	pub comment:     Option<Spanned<SharedStr>>,
}

/// An instruction with its operands.
#[derive(Clone, Debug)]
pub struct Instruction {
	/// The operation name as written.
	pub operation: Spanned<SharedStr>,
	/// Operands in order.
	pub operands:  Vec<Operand>,
	/// Everything from the operation to the last operand.
	pub span:      SourceSpan,
}

/// One instruction operand.
#[derive(Clone, Debug, PartialEq)]
pub struct Operand {
	/// What the operand is.
	pub value: OperandValue,
	/// Where the operand was written.
	pub span:  SourceSpan,
}

/// Operand forms the front-end distinguishes. Names stay unresolved; the symbol environment decides what they mean.
#[derive(Clone, Debug, PartialEq)]
pub enum OperandValue {
	/// A register such as `r3`, `sp` or `rr1`.
	Register(Register),
	/// A device such as `d0`, `db`, `dr2` or `d1:3`.
	Device(DeviceSpec),
	/// A numeric literal.
	Number(f64),
	/// `HASH("name")`, holding the name.
	Hash(SharedStr),
	/// `STR("text")`, holding the packed value of the text.
	Str(SharedStr),
	/// An alias, define, label, keyword or enum constant.
	Identifier(SharedStr),
	/// A token the front-end could not understand; a syntax error was already reported for it.
	Invalid,
}
