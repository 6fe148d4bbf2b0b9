//! Register dataflow analyses: maybe-assigned registers, liveness and value kinds, each computed as an iterative fixed
//! point over the [`ControlFlowGraph`].

use std::collections::HashMap;
use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};

use super::cfg::ControlFlowGraph;
use super::environment::{AliasTarget, Environment};
use super::file::RegisterOccurrence;
use super::instruction::{Family, Param};
use super::kind::{KindState, ValueKind, accepted_kinds, describe_kinds};
use super::program::{Access, Program, Resolved, Statement, is_device_like};
use super::register::{GENERAL_REGISTER_COUNT, Register};
use crate::error::SemanticError;
use crate::session::{CancellationToken, Cancelled};
use crate::{Change, SourceFile};

/// A set of directly addressable registers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct RegisterSet(u32);

impl RegisterSet {
	/// No register.
	pub const EMPTY: Self = Self(0);

	/// All general-purpose registers.
	#[must_use]
	pub const fn general() -> Self {
		Self((1 << GENERAL_REGISTER_COUNT) - 1)
	}

	/// Whether the set contains a directly addressed register. Indirect registers are never contained.
	#[must_use]
	pub fn contains(self, register: Register) -> bool {
		register.slot().is_some_and(|slot| self.0 & (1 << slot) != 0)
	}

	/// Adds a register.
	pub fn insert(&mut self, register: Register) {
		if let Some(slot) = register.slot() {
			self.0 |= 1 << slot;
		}
	}

	/// Removes a register.
	pub fn remove(&mut self, register: Register) {
		if let Some(slot) = register.slot() {
			self.0 &= !(1 << slot);
		}
	}

	/// Adds all registers of another set and reports whether this set grew.
	pub fn union_with(&mut self, other: Self) -> Change {
		let before = self.0;
		self.0 |= other.0;
		Change::from_bool(before != self.0)
	}

	/// Registers in this set, in slot order.
	pub fn iter(self) -> impl Iterator<Item = Register> {
		Register::all_slots().filter(move |register| self.contains(*register))
	}
}

/// Everything the dataflow analyses found.
#[derive(Clone, Debug, Default)]
pub struct DataflowFacts {
	/// Hazards and kind advisories.
	pub diagnostics: Vec<SemanticError>,
	/// Every register mention with its kind at that point.
	pub occurrences: Vec<RegisterOccurrence>,
	/// Fixed-point iteration counts of the assignment, liveness and kind analyses.
	pub iterations:  [usize; 3],
}

/// Runs all register analyses.
///
/// # Errors
/// If the token is cancelled between or during the analyses.
pub fn analyze(
	program: &Program,
	cfg: &ControlFlowGraph,
	environment: &Environment,
	token: &CancellationToken,
) -> Result<DataflowFacts, Cancelled> {
	let analysis = Dataflow::new(program, cfg);
	let mut facts = DataflowFacts::default();

	let assigned = analysis.assigned(token, &mut facts.iterations[0])?;
	analysis.read_before_assign(&assigned, &mut facts.diagnostics);
	token.check()?;

	let live = analysis.liveness(token, &mut facts.iterations[1])?;
	analysis.never_read(&live, &mut facts.diagnostics);
	token.check()?;

	let kinds = analysis.kinds(token, &mut facts.iterations[2])?;
	analysis.kind_walk(&kinds, &mut facts);
	token.check()?;

	unused_registers(program, environment, &mut facts.diagnostics);
	log::debug!(
		"dataflow on {} converged after {:?} iterations with {} diagnostics",
		program.source.file_name(),
		facts.iterations,
		facts.diagnostics.len()
	);
	Ok(facts)
}

struct Dataflow<'a> {
	cfg:    &'a ControlFlowGraph,
	src:    Arc<SourceFile>,
	/// Statements of every block, in line order.
	blocks: Vec<Vec<&'a Statement>>,
}

impl<'a> Dataflow<'a> {
	fn new(program: &'a Program, cfg: &'a ControlFlowGraph) -> Self {
		let blocks = cfg
			.blocks
			.iter()
			.map(|block| block.lines().filter_map(|line| program.statement_at(line)).collect())
			.collect();
		Self { cfg, src: program.source.clone(), blocks }
	}

	/// Upper bound on iterations. Every productive iteration adds at least one register fact to one block.
	fn iteration_bound(&self) -> usize {
		self.cfg.blocks.len() * super::register::REGISTER_SLOT_COUNT + 1
	}

	fn fixed_point(
		&self,
		analysis: &str,
		token: &CancellationToken,
		iterations: &mut usize,
		mut iterate_once: impl FnMut() -> Change,
	) -> Result<(), Cancelled> {
		let bound = self.iteration_bound();
		loop {
			token.check()?;
			*iterations += 1;
			if iterate_once() == Change::Unmodified {
				return Ok(());
			}
			if *iterations > bound {
				log::warn!("{analysis} analysis did not converge within {bound} iterations, stopping early");
				return Ok(());
			}
		}
	}

	//#region Maybe-assigned registers

	/// Registers that may hold a value at the entry of each block: assigned on at least one path from the entry.
	fn assigned(&self, token: &CancellationToken, iterations: &mut usize) -> Result<Vec<RegisterSet>, Cancelled> {
		let mut entry = RegisterSet::EMPTY;
		entry.insert(Register::StackPointer);
		entry.insert(Register::ReturnAddress);
		let mut block_in = vec![RegisterSet::EMPTY; self.cfg.blocks.len()];
		if let Some(first) = block_in.first_mut() {
			*first = entry;
		}
		let gen_sets = self.blocks.iter().map(|statements| assigned_by(statements)).collect::<Vec<_>>();

		self.fixed_point("assignment", token, iterations, || {
			let mut change = Change::Unmodified;
			for (index, block) in self.cfg.blocks.iter().enumerate() {
				let mut out = block_in[index];
				out.union_with(gen_sets[index]);
				for successor in &block.successors {
					change |= block_in[*successor].union_with(out);
				}
			}
			change
		})?;
		Ok(block_in)
	}

	fn read_before_assign(&self, block_in: &[RegisterSet], diagnostics: &mut Vec<SemanticError>) {
		for (index, statements) in self.blocks.iter().enumerate() {
			if !self.cfg.reachable[index] {
				continue;
			}
			let mut assigned = block_in[index];
			for statement in statements {
				for read in statement.reads() {
					if !read.register.is_implicitly_initialized() && !assigned.contains(read.register) {
						diagnostics.push(SemanticError::ReadBeforeAssign {
							name:     read.display_name(),
							register: read.register,
							src:      self.src.clone(),
							location: read.span,
						});
					}
				}
				assigned.union_with(assigned_by(&[*statement]));
			}
		}
	}

	//#endregion
	//#region Liveness

	/// Registers that are live at the exit of each block.
	fn liveness(&self, token: &CancellationToken, iterations: &mut usize) -> Result<Vec<RegisterSet>, Cancelled> {
		let mut block_out = vec![RegisterSet::EMPTY; self.cfg.blocks.len()];
		self.fixed_point("liveness", token, iterations, || {
			let mut change = Change::Unmodified;
			for (index, block) in self.cfg.blocks.iter().enumerate().rev() {
				let live_in = live_before(&self.blocks[index], block_out[index]);
				for predecessor in &block.predecessors {
					change |= block_out[*predecessor].union_with(live_in);
				}
			}
			change
		})?;
		Ok(block_out)
	}

	fn never_read(&self, block_out: &[RegisterSet], diagnostics: &mut Vec<SemanticError>) {
		let mut found = Vec::new();
		for (index, statements) in self.blocks.iter().enumerate() {
			if !self.cfg.reachable[index] {
				continue;
			}
			let mut live = block_out[index];
			for statement in statements.iter().rev() {
				for write in statement.writes() {
					if matches!(write.register, Register::General(_)) && !write.implicit && !live.contains(write.register)
					{
						found.push(SemanticError::NeverRead {
							name:     write.display_name(),
							register: write.register,
							src:      self.src.clone(),
							location: write.span,
						});
					}
				}
				live = live_before(&[*statement], live);
			}
		}
		found.reverse();
		diagnostics.append(&mut found);
	}

	//#endregion
	//#region Value kinds

	/// Register kinds at the entry of each block.
	fn kinds(&self, token: &CancellationToken, iterations: &mut usize) -> Result<Vec<KindState>, Cancelled> {
		let mut block_in = vec![KindState::unassigned(); self.cfg.blocks.len()];
		if let Some(first) = block_in.first_mut() {
			*first = KindState::entry();
		}
		self.fixed_point("kind", token, iterations, || {
			let mut change = Change::Unmodified;
			for (index, block) in self.cfg.blocks.iter().enumerate() {
				let mut state = block_in[index];
				for statement in &self.blocks[index] {
					transfer_kinds(statement, &mut state);
				}
				for successor in &block.successors {
					change |= block_in[*successor].join_from(&state);
				}
			}
			change
		})?;
		Ok(block_in)
	}

	/// Replays the kind transfer with the converged entry states to check operand kinds and record occurrences.
	fn kind_walk(&self, block_in: &[KindState], facts: &mut DataflowFacts) {
		for (index, statements) in self.blocks.iter().enumerate() {
			let reachable = self.cfg.reachable[index];
			let mut state = block_in[index];
			for statement in statements {
				let before = state;
				transfer_kinds(statement, &mut state);
				for operand in &statement.operands {
					let Resolved::Register { register, alias } = &operand.value else {
						continue;
					};
					let writes = operand.param.is_written();
					let kind = if writes { state.get(*register) } else { before.get(*register) };
					facts.occurrences.push(RegisterOccurrence {
						span: operand.span,
						register: *register,
						alias: alias.clone(),
						line: statement.line,
						access: if writes { Access::Write } else { Access::Read },
						kind,
					});

					let (Some(actual), Some(accepted)) =
						(before.get(*register), accepted_kinds(statement.info.family, operand.param))
					else {
						continue;
					};
					if reachable && !accepted.contains(&actual) && (!writes || operand.param == Param::ReadWrite) {
						facts.diagnostics.push(SemanticError::KindMismatch {
							name: alias.clone().unwrap_or_else(|| register.to_string().into()),
							operation: statement.operation.clone(),
							expected: describe_kinds(accepted).into(),
							actual,
							src: self.src.clone(),
							location: operand.span,
						});
					}
				}
			}
		}
	}

	//#endregion
}

/// Registers a sequence of statements may assign, including every general register for indirect writes.
fn assigned_by(statements: &[&Statement]) -> RegisterSet {
	let mut assigned = RegisterSet::EMPTY;
	for statement in statements {
		for write in statement.writes() {
			assigned.insert(write.register);
		}
		if statement.writes_any {
			assigned.union_with(RegisterSet::general());
		}
	}
	assigned
}

/// Live registers before a sequence of statements, given the registers live after it. Indirect reads keep every
/// general register alive, indirect writes kill nothing.
fn live_before(statements: &[&Statement], live_after: RegisterSet) -> RegisterSet {
	let mut live = live_after;
	for statement in statements.iter().rev() {
		for write in statement.writes() {
			live.remove(write.register);
		}
		for read in statement.reads() {
			live.insert(read.register);
		}
		if statement.reads_any {
			live.union_with(RegisterSet::general());
		}
	}
	live
}

/// The kind an operand carries at a program point. Unassigned registers are treated as unknown.
fn operand_kind(state: &KindState, operand: &Resolved) -> ValueKind {
	match operand {
		Resolved::Register { register, .. } => state.get(*register).unwrap_or(ValueKind::Unknown),
		other => other.static_kind().unwrap_or(ValueKind::Unknown),
	}
}

/// Applies the effect of one statement on register kinds.
fn transfer_kinds(statement: &Statement, state: &mut KindState) {
	let value = |index: usize| {
		statement.operands.get(index).map_or(ValueKind::Unknown, |operand| operand_kind(state, &operand.value))
	};
	let produced = match statement.info.family {
		Family::Arithmetic | Family::Comparison => ValueKind::Number,
		Family::Move => value(1),
		Family::Select => value(2).join(value(3)),
		Family::DeviceLoad =>
			if statement.operand(Param::LogicType).is_some_and(|operand| is_device_like(&operand.value))
				|| statement.operand(Param::SlotLogicType).is_some_and(|operand| is_device_like(&operand.value))
			{
				ValueKind::DeviceId
			} else {
				ValueKind::Unknown
			},
		Family::StackRead => ValueKind::Unknown,
		Family::Store | Family::StackWrite | Family::Branch | Family::Jump | Family::Misc | Family::Declaration =>
			ValueKind::Number,
	};

	for operand in &statement.operands {
		if let Resolved::Register { register, .. } = operand.value
			&& operand.param.is_written()
		{
			state.set(register, produced);
		}
	}
	if statement.info.flow.is_link() {
		state.set(Register::ReturnAddress, ValueKind::Number);
	}
}

/// Reports general registers that are bound to an alias but never assigned or read. Indirect accesses may touch any
/// general register, so they count as uses of all of them.
fn unused_registers(program: &Program, environment: &Environment, diagnostics: &mut Vec<SemanticError>) {
	if program.statements.iter().any(|statement| statement.reads_any || statement.writes_any) {
		return;
	}
	let mut used = RegisterSet::EMPTY;
	for access in program.statements.iter().flat_map(|statement| &statement.accesses) {
		used.insert(access.register);
	}

	let mut first_bindings: HashMap<Register, (usize, SharedStr, miette::SourceSpan)> = HashMap::new();
	for (name, bindings) in &environment.aliases {
		for binding in bindings {
			let AliasTarget::Register(register @ Register::General(_)) = binding.target else {
				continue;
			};
			let entry = first_bindings.entry(register).or_insert_with(|| (binding.line, name.clone(), binding.span));
			if (binding.line, binding.span.offset()) < (entry.0, entry.2.offset()) {
				*entry = (binding.line, name.clone(), binding.span);
			}
		}
	}

	let mut unused = first_bindings.into_iter().filter(|(register, _)| !used.contains(*register)).collect::<Vec<_>>();
	unused.sort_by_key(|(_, (line, ..))| *line);
	diagnostics.extend(unused.into_iter().map(|(register, (_, name, location))| SemanticError::UnusedRegister {
		name,
		register,
		src: program.source.clone(),
		location,
	}));
}
