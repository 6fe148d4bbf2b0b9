//! [`Environment`]: the symbol table of one program.

use std::collections::HashMap;
use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;

use super::instruction::CONSTANTS;
use super::kind::ValueKind;
use super::register::{DeviceSpec, Register};
use crate::SourceFile;
use crate::devices::{DeviceInfo, HashResolver, Resolution, compute_crc32};
use crate::error::SemanticError;
use crate::syntax::{OperandValue, SyntaxTree};

/// What an alias binds to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AliasTarget {
	/// A register; this is the only kind of alias that takes part in dataflow analysis.
	Register(Register),
	/// A device slot.
	Device(DeviceSpec),
}

/// One `alias` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasBinding {
	/// Line of the `alias` statement. The binding is visible on all later lines.
	pub line:   usize,
	/// The register or device.
	pub target: AliasTarget,
	/// Span of the alias name in the declaration.
	pub span:   SourceSpan,
}

/// A label declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
	/// Line the label points to.
	pub line: usize,
	/// Span of the label name.
	pub span: SourceSpan,
}

/// A `define` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Define {
	/// Line of the `define` statement.
	pub line:      usize,
	/// Constant value.
	pub value:     f64,
	/// Number, or device id if the value is a known device hash.
	pub kind:      ValueKind,
	/// Span of the define name.
	pub span:      SourceSpan,
	/// For `HASH("...")` values, the hashed name and the span of the call.
	pub hash_name: Option<(SharedStr, SourceSpan)>,
}

/// A device hash written in the program, either as a `HASH("...")` call or as a numeric constant that is a known
/// prefab hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashReference {
	/// Where the hash is written.
	pub span:       SourceSpan,
	/// The hash value.
	pub value:      i32,
	/// The hashed name, for `HASH` calls.
	pub name:       Option<SharedStr>,
	/// How the name or value resolved.
	pub resolution: Resolution,
}

impl HashReference {
	/// The device this hash refers to, if resolution succeeded.
	#[must_use]
	pub const fn device(&self) -> Option<&DeviceInfo> {
		self.resolution.device()
	}
}

/// Symbol table of one program: aliases, labels and defines, plus the hashes written in define values.
#[derive(Clone, Debug, Default)]
pub struct Environment {
	/// Alias bindings per name, in declaration order.
	pub aliases: HashMap<SharedStr, Vec<AliasBinding>>,
	/// Labels, visible on every line.
	pub labels:  HashMap<SharedStr, Label>,
	/// Defines, visible on every line.
	pub defines: HashMap<SharedStr, Define>,
	/// Hashes written as define values.
	pub hashes:  Vec<HashReference>,
}

impl Environment {
	/// Builds the symbol table from a syntax tree. Labels and defines are collected before aliases so that every later
	/// pass can resolve names regardless of declaration order. Malformed declarations are reported and left out.
	#[must_use]
	pub fn build(tree: &SyntaxTree, resolver: &HashResolver) -> (Self, Vec<SemanticError>) {
		let mut environment = Self::default();
		let mut errors = Vec::new();
		let src = &tree.source;

		for line in &tree.lines {
			if let Some(label) = &line.label {
				if let Some(existing) = environment.labels.get(&label.value) {
					errors.push(duplicate(&label.value, label.span, existing.span, src));
				} else {
					environment.labels.insert(label.value.clone(), Label { line: line.number, span: label.span });
				}
			}
		}

		for (line, instruction) in tree.instructions() {
			if instruction.operation.value.as_str() != "define" || instruction.operands.len() != 2 {
				continue;
			}
			let [name, value] = [&instruction.operands[0], &instruction.operands[1]];
			let OperandValue::Identifier(define_name) = &name.value else {
				errors.push(SemanticError::InvalidDefine {
					name:     src.span_text(name.span).into(),
					src:      src.clone(),
					location: name.span,
				});
				continue;
			};
			if let Some(first) = environment.first_definition(define_name) {
				errors.push(duplicate(define_name, name.span, first, src));
				continue;
			}

			let mut hash_name = None;
			let constant = match &value.value {
				OperandValue::Number(number) => Some((*number, resolver.resolve_numeric(*number).is_some())),
				OperandValue::Hash(hashed) => {
					hash_name = Some((hashed.clone(), value.span));
					let resolution = resolver.resolve_name(hashed);
					let exact = matches!(resolution, Resolution::Exact(_));
					environment.hashes.push(HashReference {
						span: value.span,
						value: compute_crc32(hashed),
						name: Some(hashed.clone()),
						resolution,
					});
					Some((f64::from(compute_crc32(hashed)), exact))
				},
				OperandValue::Str(text) => Some((pack_str(text), false)),
				OperandValue::Identifier(other) => environment
					.defines
					.get(other)
					.map(|define| (define.value, define.kind == ValueKind::DeviceId))
					.or_else(|| CONSTANTS.get(other.as_str()).map(|constant| (*constant, false))),
				_ => None,
			};

			match constant {
				Some((constant, is_device)) => {
					if let Some(reference) = numeric_hash_reference(resolver, constant, value.span)
						&& hash_name.is_none()
					{
						environment.hashes.push(reference);
					}
					environment.defines.insert(define_name.clone(), Define {
						line,
						value: constant,
						kind: if is_device { ValueKind::DeviceId } else { ValueKind::Number },
						span: name.span,
						hash_name,
					});
				},
				None => errors.push(SemanticError::InvalidDefine {
					name:     define_name.clone(),
					src:      src.clone(),
					location: value.span,
				}),
			}
		}

		for (line, instruction) in tree.instructions() {
			if instruction.operation.value.as_str() != "alias" || instruction.operands.len() != 2 {
				continue;
			}
			let [name, target] = [&instruction.operands[0], &instruction.operands[1]];
			let OperandValue::Identifier(alias_name) = &name.value else {
				errors.push(SemanticError::InvalidAlias {
					name:     src.span_text(name.span).into(),
					src:      src.clone(),
					location: name.span,
				});
				continue;
			};
			let clashing_label = environment.labels.get(alias_name).map(|label| label.span);
			if let Some(first) = clashing_label.or_else(|| environment.defines.get(alias_name).map(|define| define.span)) {
				errors.push(duplicate(alias_name, name.span, first, src));
				continue;
			}
			let target = match target.value {
				OperandValue::Register(register) => AliasTarget::Register(register),
				OperandValue::Device(device) => AliasTarget::Device(device),
				// Already reported as a syntax error.
				OperandValue::Invalid => continue,
				_ => {
					errors.push(SemanticError::InvalidAlias {
						name:     alias_name.clone(),
						src:      src.clone(),
						location: target.span,
					});
					continue;
				},
			};
			let binding = AliasBinding { line, target, span: name.span };
			environment.aliases.entry(alias_name.clone()).or_default().push(binding);
		}

		log::debug!(
			"environment: {} aliases, {} labels, {} defines",
			environment.aliases.len(),
			environment.labels.len(),
			environment.defines.len()
		);
		(environment, errors)
	}

	/// The binding of an alias that is active on the given line: the latest declaration on an earlier line.
	#[must_use]
	pub fn resolve_alias(&self, name: &str, line: usize) -> Option<&AliasBinding> {
		self.aliases.get(name)?.iter().rev().find(|binding| binding.line < line)
	}

	/// Every register an alias is bound to anywhere in the program.
	pub fn registers_of_alias(&self, name: &str) -> impl Iterator<Item = Register> + '_ {
		self.aliases.get(name).into_iter().flatten().filter_map(|binding| match binding.target {
			AliasTarget::Register(register) => Some(register),
			AliasTarget::Device(_) => None,
		})
	}

	/// All alias names that are bound to the register at some point, sorted.
	#[must_use]
	pub fn aliases_of(&self, register: Register) -> Vec<SharedStr> {
		let mut names = self
			.aliases
			.iter()
			.filter(|(_, bindings)| bindings.iter().any(|binding| binding.target == AliasTarget::Register(register)))
			.map(|(name, _)| name.clone())
			.collect::<Vec<_>>();
		names.sort();
		names
	}

	/// The first declaration span of a label, define or alias.
	#[must_use]
	pub fn first_definition(&self, name: &str) -> Option<SourceSpan> {
		self.labels
			.get(name)
			.map(|label| label.span)
			.or_else(|| self.defines.get(name).map(|define| define.span))
			.or_else(|| self.aliases.get(name).and_then(|bindings| bindings.first()).map(|binding| binding.span))
	}
}

/// Records a numeric constant that happens to be a known device hash.
#[allow(clippy::cast_possible_truncation)]
pub fn numeric_hash_reference(resolver: &HashResolver, value: f64, span: SourceSpan) -> Option<HashReference> {
	resolver.resolve_numeric(value).map(|device| HashReference {
		span,
		value: value as i32,
		name: None,
		resolution: Resolution::Exact(device),
	})
}

/// Packs up to six ASCII characters into a number the way `STR("...")` does.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pack_str(text: &str) -> f64 {
	text.bytes().take(6).fold(0_u64, |packed, byte| (packed << 8) | u64::from(byte)) as f64
}

fn duplicate(name: &str, location: SourceSpan, first_definition: SourceSpan, src: &Arc<SourceFile>) -> SemanticError {
	SemanticError::DuplicateDefinition { name: name.into(), src: src.clone(), location, first_definition }
}
