//! Control flow graph over program lines.

use std::collections::VecDeque;

use super::environment::Environment;
use super::instruction::Flow;
use super::program::{JumpTarget, Program};

/// A maximal run of lines with one entry and one exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicBlock {
	/// First line of the block.
	pub start:        usize,
	/// One past the last line of the block.
	pub end:          usize,
	/// Blocks control may continue with after this block.
	pub successors:   Vec<usize>,
	/// Blocks control may come from.
	pub predecessors: Vec<usize>,
}

impl BasicBlock {
	/// Lines of this block in execution order.
	pub fn lines(&self) -> std::ops::Range<usize> {
		self.start .. self.end
	}
}

/// Control flow graph of a lowered program. Every line belongs to exactly one block; lines without a valid instruction
/// are no-ops.
#[derive(Clone, Debug, Default)]
pub struct ControlFlowGraph {
	/// Blocks ordered by their first line. Block 0 is the program entry.
	pub blocks:    Vec<BasicBlock>,
	/// Whether each block can be reached from the program entry.
	pub reachable: Vec<bool>,
	line_blocks:   Vec<usize>,
}

impl ControlFlowGraph {
	/// Builds the graph. Computed jump targets get an edge to every label and to every return site, which covers all
	/// places a register can sensibly hold a line number of.
	#[must_use]
	pub fn build(program: &Program, environment: &Environment) -> Self {
		let line_count = program.line_count;
		if line_count == 0 {
			return Self::default();
		}

		let mut leaders = vec![false; line_count];
		leaders[0] = true;
		let mut label_lines = environment.labels.values().map(|label| label.line).collect::<Vec<_>>();
		label_lines.sort_unstable();
		for line in &label_lines {
			leaders[*line] = true;
		}
		for statement in &program.statements {
			if statement.info.flow.ends_block() && statement.line + 1 < line_count {
				leaders[statement.line + 1] = true;
			}
			if let Some(JumpTarget::Line(target)) = statement.target
				&& target < line_count
			{
				leaders[target] = true;
			}
		}

		let mut blocks: Vec<BasicBlock> = Vec::new();
		let mut line_blocks = vec![0; line_count];
		for (line, is_leader) in leaders.iter().enumerate() {
			if *is_leader {
				if let Some(previous) = blocks.last_mut() {
					previous.end = line;
				}
				blocks.push(BasicBlock { start: line, end: line_count, successors: Vec::new(), predecessors: Vec::new() });
			}
			line_blocks[line] = blocks.len() - 1;
		}

		let computed_targets = label_lines
			.iter()
			.chain(&program.return_sites)
			.map(|line| line_blocks[*line])
			.collect::<Vec<_>>();
		for index in 0 .. blocks.len() {
			let last_line = blocks[index].end - 1;
			let fall_through = (blocks[index].end < line_count).then(|| line_blocks[blocks[index].end]);
			let mut successors = Vec::new();
			let add_target = |target: JumpTarget, successors: &mut Vec<usize>| match target {
				JumpTarget::Line(line) if line < line_count => successors.push(line_blocks[line]),
				JumpTarget::Line(_) | JumpTarget::OutOfRange => {},
				JumpTarget::Computed => successors.extend_from_slice(&computed_targets),
			};
			match program.statement_at(last_line) {
				Some(statement) => match (statement.info.flow, statement.target) {
					(Flow::Sequential, _) => successors.extend(fall_through),
					(Flow::Branch { .. }, target) => {
						successors.extend(fall_through);
						if let Some(target) = target {
							add_target(target, &mut successors);
						}
					},
					(Flow::Jump { .. }, Some(target)) => add_target(target, &mut successors),
					(Flow::Jump { .. }, None) | (Flow::Halt, _) => {},
				},
				None => successors.extend(fall_through),
			}
			successors.sort_unstable();
			successors.dedup();
			blocks[index].successors = successors;
		}
		for index in 0 .. blocks.len() {
			for successor in blocks[index].successors.clone() {
				blocks[successor].predecessors.push(index);
			}
		}

		let reachable = reachable_blocks(&blocks);
		log::trace!(
			"control flow graph: {} blocks, {} reachable",
			blocks.len(),
			reachable.iter().filter(|reachable| **reachable).count()
		);
		Self { blocks, reachable, line_blocks }
	}

	/// The block containing a line.
	#[must_use]
	pub fn block_of_line(&self, line: usize) -> Option<usize> {
		self.line_blocks.get(line).copied()
	}

	/// Whether a line can be executed at all.
	#[must_use]
	pub fn is_line_reachable(&self, line: usize) -> bool {
		self.block_of_line(line).is_some_and(|block| self.reachable[block])
	}
}

fn reachable_blocks(blocks: &[BasicBlock]) -> Vec<bool> {
	let mut reachable = vec![false; blocks.len()];
	let mut queue = VecDeque::new();
	if !blocks.is_empty() {
		reachable[0] = true;
		queue.push_back(0);
	}
	while let Some(block) = queue.pop_front() {
		for &successor in &blocks[block].successors {
			if !reachable[successor] {
				reachable[successor] = true;
				queue.push_back(successor);
			}
		}
	}
	reachable
}
