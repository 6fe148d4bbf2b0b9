//! Lowering of the syntax tree into resolved statements.

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;

use super::environment::{AliasTarget, Environment, HashReference, numeric_hash_reference, pack_str};
use super::instruction::{
	BatchMode, COLORS, CONSTANTS, DEVICE_LIKE_LOGIC_TYPES, Family, Flow, INSTRUCTIONS, InstructionInfo, LOGIC_TYPES,
	Param, ReagentMode, SLOT_LOGIC_TYPES, suggest_instruction,
};
use super::kind::ValueKind;
use super::register::{Device, DeviceSpec, Register};
use crate::SourceFile;
use crate::devices::{HashResolver, Resolution, compute_crc32};
use crate::error::SemanticError;
use crate::parser::Parse;
use crate::syntax::{Instruction, Operand, OperandValue, SyntaxTree};

/// An operand after name resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
	/// A register, possibly named through an alias.
	Register {
		/// The register.
		register: Register,
		/// The alias the register was written as.
		alias:    Option<SharedStr>,
	},
	/// A device, possibly named through an alias.
	Device {
		/// The device.
		device: DeviceSpec,
		/// The alias the device was written as.
		alias:  Option<SharedStr>,
	},
	/// A compile-time constant: a number, define, hash or named constant.
	Constant {
		/// The value.
		value: f64,
		/// The kind the value carries.
		kind:  ValueKind,
	},
	/// A keyword such as a logic type or batch mode.
	Keyword {
		/// Canonical spelling of the keyword.
		name: SharedStr,
		/// [`ValueKind::LogicType`] for logic types, [`ValueKind::Number`] for modes.
		kind: ValueKind,
	},
	/// A label, resolved to its line.
	Label(usize),
	/// The name introduced by a declaration.
	Name,
	/// Unusable operand; a diagnostic was already produced.
	Invalid,
}

impl Resolved {
	/// The kind of a constant or keyword operand. Registers depend on the program point and return `None`.
	#[must_use]
	pub const fn static_kind(&self) -> Option<ValueKind> {
		match self {
			Self::Constant { kind, .. } | Self::Keyword { kind, .. } => Some(*kind),
			Self::Label(_) => Some(ValueKind::Number),
			Self::Register { .. } | Self::Device { .. } | Self::Name | Self::Invalid => None,
		}
	}
}

/// One operand of a lowered statement.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOperand {
	/// The signature slot this operand fills.
	pub param: Param,
	/// What the operand resolved to.
	pub value: Resolved,
	/// Where the operand was written.
	pub span:  SourceSpan,
}

/// Direction of a register access.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Access {
	/// The register value is used.
	Read,
	/// The register is assigned.
	Write,
}

/// A direct access to one register slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterAccess {
	/// The directly addressed register.
	pub register: Register,
	/// Read or write.
	pub access:   Access,
	/// Where the register is named.
	pub span:     SourceSpan,
	/// The alias used to name it, if any.
	pub alias:    Option<SharedStr>,
	/// The access is implied by the instruction, like the `ra` write of `jal`, and not written in the source.
	pub implicit: bool,
}

impl RegisterAccess {
	/// How this register is named at this access, such as `temp` or `r3`.
	#[must_use]
	pub fn display_name(&self) -> SharedStr {
		self.alias.clone().unwrap_or_else(|| self.register.to_string().into())
	}
}

/// Where a jump or branch goes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum JumpTarget {
	/// A statically known line.
	Line(usize),
	/// A statically known line outside the program; execution stops.
	OutOfRange,
	/// A register value, known only at runtime.
	Computed,
}

/// One instruction after operand resolution.
#[derive(Clone, Debug)]
pub struct Statement {
	/// Line of the instruction.
	pub line:       usize,
	/// Operation name.
	pub operation:  SharedStr,
	/// Static instruction description.
	pub info:       InstructionInfo,
	/// Resolved operands in signature order.
	pub operands:   Vec<ResolvedOperand>,
	/// Span of the whole instruction.
	pub span:       SourceSpan,
	/// Direct register accesses, reads before writes.
	pub accesses:   Vec<RegisterAccess>,
	/// The instruction reads a register through an indirect reference, which may be any general register.
	pub reads_any:  bool,
	/// The instruction writes a register through an indirect reference, which may be any general register.
	pub writes_any: bool,
	/// Jump or branch target.
	pub target:     Option<JumpTarget>,
}

impl Statement {
	/// Direct reads of this statement.
	pub fn reads(&self) -> impl Iterator<Item = &RegisterAccess> {
		self.accesses.iter().filter(|access| access.access == Access::Read)
	}

	/// Direct writes of this statement.
	pub fn writes(&self) -> impl Iterator<Item = &RegisterAccess> {
		self.accesses.iter().filter(|access| access.access == Access::Write)
	}

	/// The operand filling a signature slot, for slots that appear once.
	#[must_use]
	pub fn operand(&self, param: Param) -> Option<&ResolvedOperand> {
		self.operands.iter().find(|operand| operand.param == param)
	}
}

/// A lowered program: resolved statements plus the facts gathered while resolving.
#[derive(Clone, Debug)]
pub struct Program {
	/// The program text.
	pub source:       Arc<SourceFile>,
	/// Number of lines, which bounds every jump target.
	pub line_count:   usize,
	/// Statements ordered by line; lines without a valid instruction have none.
	pub statements:   Vec<Statement>,
	/// Every hash written in the program.
	pub hashes:       Vec<HashReference>,
	/// Lines right after a linking jump or branch, where `j ra` may return to.
	pub return_sites: Vec<usize>,
}

impl Program {
	/// Lowers a syntax tree against its environment.
	#[must_use]
	pub fn lower(tree: &SyntaxTree, environment: &Environment, resolver: &HashResolver) -> (Self, Vec<SemanticError>) {
		let mut lowering = Lowering {
			environment,
			resolver,
			src: tree.source.clone(),
			errors: Vec::new(),
			hashes: environment.hashes.clone(),
			reported_hashes: Vec::new(),
		};
		let statements = tree
			.instructions()
			.filter_map(|(line, instruction)| lowering.lower_instruction(line, instruction))
			.collect::<Vec<_>>();
		let line_count = tree.lines.len();
		let return_sites = statements
			.iter()
			.filter(|statement| statement.info.flow.is_link() && statement.line + 1 < line_count)
			.map(|statement| statement.line + 1)
			.collect();

		let Lowering { errors, hashes, .. } = lowering;
		(Self { source: tree.source.clone(), line_count, statements, hashes, return_sites }, errors)
	}

	/// The statement on a line, if that line has a valid instruction.
	#[must_use]
	pub fn statement_at(&self, line: usize) -> Option<&Statement> {
		self.statements.binary_search_by_key(&line, |statement| statement.line).ok().map(|index| &self.statements[index])
	}
}

struct Lowering<'a> {
	environment:     &'a Environment,
	resolver:        &'a HashResolver,
	src:             Arc<SourceFile>,
	errors:          Vec<SemanticError>,
	hashes:          Vec<HashReference>,
	reported_hashes: Vec<SourceSpan>,
}

impl Lowering<'_> {
	fn lower_instruction(&mut self, line: usize, instruction: &Instruction) -> Option<Statement> {
		let operation = &instruction.operation;
		let Some(info) = INSTRUCTIONS.get(operation.value.as_str()).copied() else {
			self.errors.push(SemanticError::InvalidInstruction {
				operation:  operation.value.clone(),
				suggestion: suggest_instruction(&operation.value).map(SharedStr::from_static),
				src:        self.src.clone(),
				location:   operation.span,
			});
			return None;
		};
		if info.params.len() != instruction.operands.len() {
			self.errors.push(SemanticError::OperandCount {
				operation: operation.value.clone(),
				expected:  info.params.len(),
				actual:    instruction.operands.len(),
				signature: info.signature(&operation.value).into(),
				src:       self.src.clone(),
				location:  instruction.span,
			});
			return None;
		}

		let mut statement = Statement {
			line,
			operation: operation.value.clone(),
			info,
			operands: Vec::with_capacity(info.params.len()),
			span: instruction.span,
			accesses: Vec::new(),
			reads_any: false,
			writes_any: false,
			target: None,
		};
		if info.family == Family::Declaration {
			statement.operands = info
				.params
				.iter()
				.zip(&instruction.operands)
				.map(|(param, operand)| ResolvedOperand { param: *param, value: Resolved::Name, span: operand.span })
				.collect();
			return Some(statement);
		}

		let mut writes = Vec::new();
		for (index, (param, operand)) in info.params.iter().zip(&instruction.operands).enumerate() {
			let value = self.resolve(&statement.operation, index, *param, operand, line);
			match &value {
				Resolved::Register { register, alias } => {
					let direct = register.indirection_base().unwrap_or(*register);
					let access = |access| RegisterAccess {
						register: direct,
						access,
						span: operand.span,
						alias: alias.clone().filter(|_| direct == *register),
						implicit: false,
					};
					if let Register::Indirect { depth, .. } = register {
						statement.accesses.push(access(Access::Read));
						// Every level past the first reads a register chosen at runtime.
						if *depth > 1 || *param == Param::ReadWrite || !param.is_written() {
							statement.reads_any = true;
						}
						if param.is_written() {
							statement.writes_any = true;
						}
					} else {
						if *param == Param::ReadWrite || !param.is_written() {
							statement.accesses.push(access(Access::Read));
						}
						if param.is_written() {
							writes.push(access(Access::Write));
						}
					}
				},
				Resolved::Device { device, .. } =>
					if let Some(base) = device.indirection_base() {
						statement.accesses.push(RegisterAccess {
							register: base,
							access:   Access::Read,
							span:     operand.span,
							alias:    None,
							implicit: false,
						});
						if matches!(device.device, Device::Indirect { depth, .. } if depth > 1) {
							statement.reads_any = true;
						}
					},
				_ => {},
			}
			statement.operands.push(ResolvedOperand { param: *param, value, span: operand.span });
		}
		if info.flow.is_link() {
			writes.push(RegisterAccess {
				register: Register::ReturnAddress,
				access:   Access::Write,
				span:     operation.span,
				alias:    None,
				implicit: true,
			});
		}
		statement.accesses.append(&mut writes);
		let target = info.target_index().map(|index| self.jump_target(&statement, index, instruction));
		statement.target = target;

		Some(statement)
	}

	#[allow(
		clippy::cast_precision_loss,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss,
		clippy::float_cmp
	)]
	fn jump_target(&mut self, statement: &Statement, index: usize, instruction: &Instruction) -> JumpTarget {
		let relative =
			matches!(statement.info.flow, Flow::Branch { relative: true, .. } | Flow::Jump { relative: true, .. });
		let operand = &statement.operands[index];
		let offset = match operand.value {
			Resolved::Label(line) => line as f64,
			Resolved::Constant { value, .. } => {
				if !relative && matches!(instruction.operands[index].value, OperandValue::Number(_)) {
					self.errors.push(SemanticError::AbsoluteJump {
						operation: statement.operation.clone(),
						src:       self.src.clone(),
						location:  operand.span,
					});
				}
				value
			},
			_ => return JumpTarget::Computed,
		};
		let base = if relative { statement.line as f64 } else { 0.0 };
		let target = base + offset;
		if target.fract() == 0.0 && target >= 0.0 && target < usize::MAX as f64 {
			JumpTarget::Line(target as usize)
		} else {
			JumpTarget::OutOfRange
		}
	}

	fn invalid_operand(&mut self, operation: &SharedStr, index: usize, param: Param, span: SourceSpan) -> Resolved {
		self.errors.push(SemanticError::InvalidOperand {
			operation: operation.clone(),
			index,
			expected: SharedStr::from_static(param.description()),
			src: self.src.clone(),
			location: span,
		});
		Resolved::Invalid
	}

	/// Resolves one operand and checks that its form fits the signature slot.
	fn resolve(&mut self, operation: &SharedStr, index: usize, param: Param, operand: &Operand, line: usize) -> Resolved {
		let span = operand.span;
		let resolved = match &operand.value {
			OperandValue::Invalid => return Resolved::Invalid,
			OperandValue::Register(register) => Resolved::Register { register: *register, alias: None },
			OperandValue::Device(device) => Resolved::Device { device: *device, alias: None },
			OperandValue::Number(value) => {
				let kind = if param != Param::Target
					&& let Some(reference) = numeric_hash_reference(self.resolver, *value, span)
				{
					self.hashes.push(reference);
					ValueKind::DeviceId
				} else {
					ValueKind::Number
				};
				Resolved::Constant { value: *value, kind }
			},
			OperandValue::Hash(name) => self.resolve_hash(name, param, span),
			OperandValue::Str(text) => Resolved::Constant { value: pack_str(text), kind: ValueKind::Number },
			OperandValue::Identifier(name) => match self.resolve_identifier(name, param, span, line) {
				Some(resolved) => resolved,
				None => return Resolved::Invalid,
			},
		};

		let fits = match resolved {
			Resolved::Device { .. } => param == Param::Device,
			_ if param == Param::Device => false,
			Resolved::Register { .. } => true,
			_ if param.is_written() => false,
			Resolved::Keyword { kind: ValueKind::LogicType, .. } =>
				!matches!(param, Param::BatchMode | Param::ReagentMode),
			_ => true,
		};
		if fits { resolved } else { self.invalid_operand(operation, index, param, span) }
	}

	fn resolve_hash(&mut self, name: &SharedStr, param: Param, span: SourceSpan) -> Resolved {
		let value = compute_crc32(name);
		let resolution = self.resolver.resolve_name(name);
		let kind = match (&resolution, param) {
			(_, Param::NameHash) => ValueKind::Number,
			(Resolution::Exact(_), _) => ValueKind::DeviceId,
			_ => ValueKind::Unknown,
		};
		if matches!(param, Param::TypeHash | Param::DeviceId) && !matches!(resolution, Resolution::Exact(_)) {
			self.unresolved_hash(name, &resolution, span);
		}
		self.hashes.push(HashReference { span, value, name: Some(name.clone()), resolution });
		Resolved::Constant { value: f64::from(value), kind }
	}

	fn unresolved_hash(&mut self, name: &SharedStr, resolution: &Resolution, span: SourceSpan) {
		// A define is reported once, at its value, no matter how often it is used.
		if self.reported_hashes.contains(&span) {
			return;
		}
		self.reported_hashes.push(span);
		self.errors.push(SemanticError::UnresolvedDeviceHash {
			name:       name.clone(),
			suggestion: resolution.device().map(|device| (device.canonical.clone(), device.display.clone())),
			src:        self.src.clone(),
			location:   span,
		});
	}

	fn resolve_identifier(&mut self, name: &SharedStr, param: Param, span: SourceSpan, line: usize) -> Option<Resolved> {
		if let Some(binding) = self.environment.resolve_alias(name, line) {
			return Some(match binding.target {
				AliasTarget::Register(register) => Resolved::Register { register, alias: Some(name.clone()) },
				AliasTarget::Device(device) => Resolved::Device { device, alias: Some(name.clone()) },
			});
		}
		if let Some(define) = self.environment.defines.get(name) {
			if let Some((hashed, hash_span)) = &define.hash_name
				&& param == Param::TypeHash
				&& define.kind != ValueKind::DeviceId
			{
				let resolution = self.resolver.resolve_name(hashed);
				self.unresolved_hash(hashed, &resolution, *hash_span);
			}
			return Some(Resolved::Constant { value: define.value, kind: define.kind });
		}
		if let Some(label) = self.environment.labels.get(name) {
			return Some(Resolved::Label(label.line));
		}
		if param != Param::Target
			&& let Some(keyword) = self.resolve_keyword(name, param, span)
		{
			return Some(keyword);
		}
		if let Some(constant) = CONSTANTS.get(name.as_str()) {
			return Some(Resolved::Constant { value: *constant, kind: ValueKind::Number });
		}

		self.errors.push(if param == Param::Target {
			SemanticError::UndefinedLabel { name: name.clone(), src: self.src.clone(), location: span }
		} else {
			SemanticError::UnknownIdentifier { name: name.clone(), src: self.src.clone(), location: span }
		});
		None
	}

	/// Logic types, modes and dotted enum constants. Keywords matching only case-insensitively are accepted with a
	/// warning.
	fn resolve_keyword(&mut self, name: &SharedStr, param: Param, span: SourceSpan) -> Option<Resolved> {
		let logic = |name: &str| Resolved::Keyword { name: name.into(), kind: ValueKind::LogicType };
		let number = |name: &str| Resolved::Keyword { name: name.into(), kind: ValueKind::Number };

		if let Some((enumeration, member)) = name.split_once('.') {
			return match enumeration {
				"LogicType" if LOGIC_TYPES.contains(member) => Some(logic(member)),
				"LogicSlotType" if SLOT_LOGIC_TYPES.contains(member) => Some(logic(member)),
				"LogicBatchMethod" | "BatchMode" if BatchMode::is_valid(member) => Some(number(member)),
				"LogicReagentMode" | "ReagentMode" if ReagentMode::is_valid(member) => Some(number(member)),
				"Color" if COLORS.contains_key(member) => Some(number(member)),
				_ => None,
			};
		}

		let (exact, canonical) = match param {
			Param::BatchMode => (
				BatchMode::is_valid(name),
				BatchMode::parse_ignore_case(name).map(|mode| crate::VariantName::variant_name(&mode)),
			),
			Param::ReagentMode => (
				ReagentMode::is_valid(name),
				ReagentMode::parse_ignore_case(name).map(|mode| crate::VariantName::variant_name(&mode)),
			),
			Param::SlotLogicType => (
				SLOT_LOGIC_TYPES.contains(name.as_str()),
				SLOT_LOGIC_TYPES.iter().find(|keyword| keyword.eq_ignore_ascii_case(name)).copied(),
			),
			_ => (
				LOGIC_TYPES.contains(name.as_str()),
				LOGIC_TYPES.iter().find(|keyword| keyword.eq_ignore_ascii_case(name)).copied(),
			),
		};
		let canonical = canonical?;
		if !exact {
			self.errors.push(SemanticError::KeywordCase {
				found:    name.clone(),
				expected: SharedStr::from_static(canonical),
				src:      self.src.clone(),
				location: span,
			});
		}
		Some(match param {
			Param::BatchMode | Param::ReagentMode => number(canonical),
			_ => logic(canonical),
		})
	}
}

/// Whether a keyword operand names a logic type whose value identifies a device.
#[must_use]
pub fn is_device_like(operand: &Resolved) -> bool {
	matches!(operand, Resolved::Keyword { name, kind: ValueKind::LogicType } if DEVICE_LIKE_LOGIC_TYPES.contains(name.as_str()))
}
