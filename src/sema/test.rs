//! Semantics module unit tests.

use std::sync::Arc;

use miette::SourceSpan;

use super::dataflow::{self, DataflowFacts};
use super::{Register, ValueKind};
use crate::error::DiagnosticCategory;
use crate::session::CancellationToken;
use crate::{Analysis, Analyzer, SemanticError, SourceFile, VariantName};

fn analyze(text: &str) -> Analysis {
	let source = Arc::new(SourceFile::new(text, "test.ic10"));
	Analyzer::default().analyze(&source, &CancellationToken::new()).unwrap()
}

fn line_of(analysis: &Analysis, diagnostic: &SemanticError) -> usize {
	analysis.file.source.line_of_offset(diagnostic.location().offset())
}

/// Dataflow diagnostics as (variant, register name, line).
fn hazards(analysis: &Analysis) -> Vec<(&'static str, String, usize)> {
	analysis
		.diagnostics
		.iter()
		.filter(|diagnostic| diagnostic.category() == DiagnosticCategory::DataflowHazard)
		.map(|diagnostic| {
			let name = match diagnostic {
				SemanticError::ReadBeforeAssign { name, .. }
				| SemanticError::NeverRead { name, .. }
				| SemanticError::UnusedRegister { name, .. } => name.to_string(),
				_ => String::new(),
			};
			(diagnostic.variant_name(), name, line_of(analysis, diagnostic))
		})
		.collect()
}

fn variants(analysis: &Analysis) -> Vec<&'static str> {
	analysis.diagnostics.iter().map(VariantName::variant_name).collect()
}

#[test]
fn only_source_operands_are_read_before_assign() {
	let analysis = analyze("add r0 r1 r2");
	let reads = hazards(&analysis)
		.into_iter()
		.filter(|(variant, ..)| *variant == "ReadBeforeAssign")
		.map(|(_, name, _)| name)
		.collect::<Vec<_>>();
	assert_eq!(reads, ["r1", "r2"]);
	assert!(hazards(&analysis).contains(&("NeverRead", "r0".to_owned(), 0)));
	assert!(analysis.has_errors());
}

#[test]
fn alias_follows_latest_binding() {
	let analysis = analyze("alias x r1\nalias x r2\nmove x 1\nadd r0 r1 0\ns db Setting r0");
	assert_eq!(hazards(&analysis), [("NeverRead", "x".to_owned(), 2), ("ReadBeforeAssign", "r1".to_owned(), 3)]);
	assert_eq!(analysis.diagnostics.len(), 2);
}

#[test]
fn alias_and_register_name_share_facts() {
	let text = "move r3 5\nalias temp r3\nadd r4 temp 1\ns db Setting r4";
	let analysis = analyze(text);
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

	let occurrence = analysis.file.occurrence_at(text.find("temp 1").unwrap()).unwrap();
	assert_eq!(occurrence.register, Register::General(3));
	assert_eq!(occurrence.alias.as_deref(), Some("temp"));
	assert_eq!(occurrence.kind, Some(ValueKind::Number));

	let summary = analysis.file.summary_of(Register::General(3)).unwrap();
	assert_eq!(summary.aliases.len(), 1);
	assert_eq!(summary.aliases[0].as_str(), "temp");
	assert_eq!(summary.assignments, 1);
	assert_eq!(summary.reads, 1);
	assert_eq!(summary.history.len(), 1);
	assert_eq!(summary.history[0].0, 0);
	assert_eq!(summary.history[0].1.as_str(), "move r3 5");
}

#[test]
fn forward_labels_and_unreachable_code() {
	let analysis = analyze("j start\nadd r0 r0 1\nstart:\nmove r0 1\ns db Setting r0\nj start");
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
	let cfg = &analysis.file.cfg;
	assert!(cfg.is_line_reachable(0));
	assert!(!cfg.is_line_reachable(1));
	assert!(cfg.is_line_reachable(3));
}

#[test]
fn loops_converge() {
	let analysis = analyze("move r0 0\nloop:\nadd r0 r0 1\nyield\nj loop");
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

	// Assigned on the back edge counts as possibly assigned.
	let analysis = analyze("loop:\nadd r1 r0 1\nmove r0 r1\nyield\nj loop");
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn registers_assigned_only_in_a_later_loop_are_read_before_assign() {
	let analysis = analyze("add r1 r0 1\ns db Setting r1\nloop:\nmove r0 5\nyield\nj loop");
	assert_eq!(hazards(&analysis), [("ReadBeforeAssign", "r0".to_owned(), 0), ("NeverRead", "r0".to_owned(), 3)]);
}

#[test]
fn indirect_access_is_conservative() {
	let analysis = analyze("alias spare r9\nmove r0 1\nmove rr0 5\nadd r2 r1 0\ns db Setting r2");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);

	// Writing through `rrr0` reads `r[r0]` first.
	let analysis = analyze("move r1 3\nmove r0 1\nmove rrr0 5\ns db Setting r3");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);
	let analysis = analyze("move r1 3\nmove r0 1\ns db Setting rrr0");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn suppression_applies_from_its_line() {
	let analysis = analyze("move r0 r1\n# ignore r2\nmove r0 r2\ns db Setting r0");
	assert_eq!(hazards(&analysis), [("NeverRead", "r0".to_owned(), 0), ("ReadBeforeAssign", "r1".to_owned(), 0)]);
	assert_eq!(analysis.suppressions.directives.len(), 1);
	assert_eq!(analysis.suppressions.directives[0].line, 1);

	let analysis = analyze("alias temp r5\n# ignore temp\nadd r0 temp 1\ns db Setting r0");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);

	let analysis = analyze("add r0 r1 r2\n# ignore");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn unused_registers() {
	let analysis = analyze("alias unused r7\nalias pump d0\nyield");
	assert_eq!(hazards(&analysis), [("UnusedRegister", "unused".to_owned(), 0)]);
	assert!(!analysis.has_errors());

	let analysis = analyze("alias unused r7\nalias pump d0\nyield\n# ignore unused");
	assert!(hazards(&analysis).is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn device_ids_are_not_numbers() {
	let text = "l r0 d0 ReferenceId\nadd r1 r0 1\ns db Setting r1";
	let analysis = analyze(text);
	assert_eq!(variants(&analysis), ["KindMismatch"]);
	let SemanticError::KindMismatch { name, actual, .. } = &analysis.diagnostics[0] else { unreachable!() };
	assert_eq!(name.as_str(), "r0");
	assert_eq!(*actual, ValueKind::DeviceId);
	assert_eq!(line_of(&analysis, &analysis.diagnostics[0]), 1);

	let occurrence = analysis.file.occurrence_at(text.find("r0 1").unwrap()).unwrap();
	assert_eq!(occurrence.kind, Some(ValueKind::DeviceId));
}

#[test]
fn logic_types_travel_through_registers() {
	let analysis = analyze("move r0 Temperature\nl r1 d0 r0\nadd r2 r0 r1\ns db Setting r2");
	assert_eq!(variants(&analysis), ["KindMismatch"]);
	let SemanticError::KindMismatch { name, actual, .. } = &analysis.diagnostics[0] else { unreachable!() };
	assert_eq!(name.as_str(), "r0");
	assert_eq!(*actual, ValueKind::LogicType);
	assert_eq!(line_of(&analysis, &analysis.diagnostics[0]), 2);

	let analysis = analyze("move r0 5\nl r1 d0 r0\ns db Setting r1");
	assert_eq!(variants(&analysis), ["KindMismatch"]);
	assert_eq!(line_of(&analysis, &analysis.diagnostics[0]), 1);
}

#[test]
fn differing_kinds_join_to_unknown() {
	let text = "move r0 1\nmove r1 HASH(\"StructureVolumePump\")\nselect r2 r0 r0 r1\nadd r3 r2 1\ns db Setting r3";
	let analysis = analyze(text);
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

	let read = analysis.file.occurrence_at(text.rfind("r2").unwrap()).unwrap();
	assert_eq!(read.line, 3);
	assert_eq!(read.kind, Some(ValueKind::Unknown));
	let device = analysis.file.occurrence_at(text.rfind("r1").unwrap()).unwrap();
	assert_eq!(device.kind, Some(ValueKind::DeviceId));

	let hash = analysis.file.hash_at(text.find("HASH").unwrap()).unwrap();
	assert_eq!(hash.device().unwrap().canonical.as_str(), "StructureVolumePump");
	assert_eq!(analysis.file.hashes().len(), 1);
}

#[test]
fn unresolved_hashes() {
	let analysis = analyze("lb r0 HASH(\"StructureVolumPump\") On Sum\ns db Setting r0");
	assert_eq!(variants(&analysis), ["UnresolvedDeviceHash"]);
	let SemanticError::UnresolvedDeviceHash { suggestion, .. } = &analysis.diagnostics[0] else { unreachable!() };
	let (canonical, display) = suggestion.as_ref().unwrap();
	assert_eq!(canonical.as_str(), "StructureVolumePump");
	assert_eq!(display.as_str(), "Volume Pump");

	// Reported once, at the define.
	let text = "define pump HASH(\"NoSuchDevice\")\nlb r0 pump On Sum\nsb pump On r0";
	let analysis = analyze(text);
	assert_eq!(variants(&analysis), ["UnresolvedDeviceHash"]);
	assert_eq!(analysis.diagnostics[0].location().offset(), text.find("HASH").unwrap());
}

#[test]
fn resolution_diagnostics() {
	let analysis = analyze(
		"ad r0 1 2\nmove r0 foo\ndefine a 1\ndefine a 2\nl r1 d0 temperature\nadd r2 r1 r0 r3\nmove r4 r99\nj nowhere",
	);
	let variants = variants(&analysis);
	for expected in [
		"InvalidInstruction",
		"UnknownIdentifier",
		"DuplicateDefinition",
		"KeywordCase",
		"OperandCount",
		"SyntaxError",
		"UndefinedLabel",
	] {
		assert!(variants.contains(&expected), "{expected} missing from {variants:?}");
	}
	assert!(analysis.has_errors());
}

#[test]
fn aliases_never_bind_to_aliases() {
	let analysis = analyze("alias a r0\nalias b a\ndefine c d0\nmove a 1\ns db Setting a");
	let invalid = variants(&analysis);
	assert_eq!(invalid.iter().filter(|variant| **variant == "InvalidAlias").count(), 1);
	assert_eq!(invalid.iter().filter(|variant| **variant == "InvalidDefine").count(), 1);

	let environment = &analysis.file.environment;
	assert!(environment.resolve_alias("b", 4).is_none());
	assert!(environment.defines.get("c").is_none());
	assert!(matches!(
		environment.resolve_alias("a", 4).map(|binding| binding.target),
		Some(super::AliasTarget::Register(Register::General(0)))
	));
}

#[test]
fn control_flow_graph() {
	let analysis = analyze("move r0 0\nloop:\nadd r0 r0 1\nblt r0 10 loop\ns db Setting r0");
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
	let blocks = &analysis.file.cfg.blocks;
	assert_eq!(blocks.iter().map(|block| (block.start, block.end)).collect::<Vec<_>>(), [(0, 1), (1, 4), (4, 5)]);
	assert_eq!(blocks[0].successors, [1]);
	assert_eq!(blocks[1].successors, [1, 2]);
	assert!(blocks[2].successors.is_empty());
	assert_eq!(blocks[1].predecessors, [0, 1]);
	assert!(analysis.file.cfg.reachable.iter().all(|reachable| *reachable));
}

#[test]
fn computed_jumps_reach_labels_and_return_sites() {
	let analysis = analyze("jal func\nj end\nfunc:\nmove r0 1\nj ra\nend:\nyield");
	let cfg = &analysis.file.cfg;
	assert_eq!(cfg.blocks.len(), 4);
	assert_eq!(analysis.file.program.return_sites, [1]);
	assert_eq!(cfg.blocks[0].successors, [2]);
	assert_eq!(cfg.blocks[cfg.block_of_line(4).unwrap()].successors, [1, 2, 3]);
	assert!(cfg.reachable.iter().all(|reachable| *reachable));
}

#[test]
fn relative_jumps() {
	let analysis = analyze("yield\njr -1");
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
	assert_eq!(analysis.file.cfg.blocks.len(), 1);
	assert_eq!(analysis.file.cfg.blocks[0].successors, [0]);

	let analysis = analyze("yield\nj 0");
	assert_eq!(variants(&analysis), ["AbsoluteJump"]);
}

#[test]
fn definition_lookup() {
	let text = "define limit 10\nalias counter r0\nstart:\nmove counter limit\nblt counter limit start";
	let analysis = analyze(text);
	let file = &analysis.file;

	let use_of_limit = text.find("move counter limit").unwrap() + "move counter ".len();
	assert_eq!(file.identifier_at(use_of_limit).as_deref(), Some("limit"));
	assert_eq!(file.definition_spans_of("limit"), [SourceSpan::from((text.find("limit").unwrap(), 5))]);
	assert_eq!(file.definition_spans_of("counter"), [SourceSpan::from((text.find("counter").unwrap(), 7))]);

	let label = text.find("start:").unwrap();
	assert_eq!(file.identifier_at(label + 1).as_deref(), Some("start"));
	assert_eq!(file.definition_spans_of("start"), [SourceSpan::from((label, 5))]);
	assert_eq!(file.identifier_at(text.rfind("start").unwrap()).as_deref(), Some("start"));
	assert!(file.definition_spans_of("nothing").is_empty());
}

#[test]
fn analysis_is_deterministic() {
	let text = "alias a r0\nalias b r1\nl a d0 Temperature\nadd b a r2\ns db Setting b\nj 0";
	let summary = |analysis: &Analysis| {
		analysis
			.diagnostics
			.iter()
			.map(|diagnostic| (diagnostic.code_name(), diagnostic.location()))
			.collect::<Vec<_>>()
	};
	let first = analyze(text);
	let second = analyze(text);
	assert_eq!(summary(&first), summary(&second));
	assert_eq!(first.file.occurrences, second.file.occurrences);
	assert_eq!(first.file.summaries, second.file.summaries);
}

#[test]
fn fixed_point_is_stable() {
	let analysis = analyze("move r0 0\nloop:\nadd r0 r0 1\nblt r0 10 loop\nmove r1 3\nj r1\ns db Setting r0");
	let file = &analysis.file;
	let token = CancellationToken::new();
	let first = dataflow::analyze(&file.program, &file.cfg, &file.environment, &token).unwrap();
	let second = dataflow::analyze(&file.program, &file.cfg, &file.environment, &token).unwrap();

	let summary = |facts: &DataflowFacts| {
		facts
			.diagnostics
			.iter()
			.map(|diagnostic| (diagnostic.variant_name(), diagnostic.location().offset()))
			.collect::<Vec<_>>()
	};
	assert_eq!(first.occurrences, second.occurrences);
	assert_eq!(summary(&first), summary(&second));
	assert_eq!(first.iterations, second.iterations);
	assert!(!first.occurrences.is_empty());
}
