#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

use std::sync::Arc;

use crate::config::{Configuration, ConfigurationUpdate};
use crate::error::DiagnosticCategory;
use crate::session::{CancellationToken, Cancelled, Workspace};
use crate::suppress::{SuppressionEdit, Suppressions, add_to_directive, parse_directive};
use crate::{Analysis, Analyzer, ErrorCodes, SemanticError, SourceFile, VariantName, run_analysis};

#[test]
fn solar_tracker() {
	let analysis = run_analysis("tests/programs/solar.ic10", Configuration::default()).unwrap();
	assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
	assert_eq!(analysis.file.hashes().len(), 1);
	assert_eq!(analysis.file.hashes()[0].device().unwrap().display.as_str(), "Solar Panel");
}

#[test]
fn hazards() {
	let analysis = run_analysis("tests/programs/hazards.ic10", Configuration::default()).unwrap();
	let variants = analysis.diagnostics.iter().map(VariantName::variant_name).collect::<Vec<_>>();
	assert_eq!(variants, ["UnusedRegister", "NeverRead", "ReadBeforeAssign"]);
	assert!(analysis.has_errors());
}

#[test]
fn missing_file() {
	assert!(run_analysis("tests/programs/does-not-exist.ic10", Configuration::default()).is_err());
}

fn check_with(text: &str, config: Configuration) -> Analysis {
	let source = Arc::new(SourceFile::new(text, "limits.ic10"));
	Analyzer::new(config).analyze(&source, &CancellationToken::new()).unwrap()
}

fn size_diagnostics(analysis: &Analysis) -> Vec<&SemanticError> {
	analysis.diagnostics.iter().filter(|diagnostic| diagnostic.category() == DiagnosticCategory::SizeLimit).collect()
}

#[test]
fn byte_limit_counts_line_breaks_twice() {
	let config = Configuration { max_bytes: 10, ..Configuration::default() };
	assert_eq!(crate::limits::stored_size("abcd\nefgh"), 10);
	assert!(size_diagnostics(&check_with("abcd\nefgh", config)).is_empty());

	let analysis = check_with("abcd\nefghi", config);
	let limits = size_diagnostics(&analysis);
	assert_eq!(limits.len(), 1);
	assert!(matches!(limits[0], SemanticError::ByteLimit { bytes: 11, max: 10, .. }));
}

#[test]
fn line_and_column_limits() {
	let config = Configuration { max_lines: 2, max_columns: 5, ..Configuration::default() };
	assert!(size_diagnostics(&check_with("yield\nyield\n", config)).is_empty());

	let analysis = check_with("yield\nyield\nyield", config);
	let limits = size_diagnostics(&analysis);
	assert_eq!(limits.len(), 1);
	assert!(matches!(limits[0], SemanticError::LineLimit { lines: 3, max: 2, .. }));
	assert_eq!(limits[0].location().offset(), 12);

	let analysis = check_with("yield\nsleep 1", config);
	let limits = size_diagnostics(&analysis);
	assert_eq!(limits.len(), 1);
	assert!(matches!(limits[0], SemanticError::ColumnLimit { line: 1, columns: 7, max: 5, .. }));
}

#[test]
fn disabled_diagnostics() {
	let config = Configuration { diagnostics_enabled: false, ..Configuration::default() };
	let analysis = check_with("add r0 r1 r2", config);
	assert!(analysis.diagnostics.is_empty());
	assert!(!analysis.file.occurrences.is_empty());
}

#[test]
fn configuration_updates() {
	let mut config = Configuration::default();
	let update = ConfigurationUpdate { max_lines: Some(64), diagnostics_enabled: Some(false), ..Default::default() };
	update.apply(&mut config);
	assert_eq!(config, Configuration {
		max_lines: 64,
		max_columns: 90,
		max_bytes: 4096,
		diagnostics_enabled: false
	});
}

#[test]
fn cancelled_analysis() {
	let token = CancellationToken::new();
	token.cancel();
	let source = Arc::new(SourceFile::new("yield", "cancelled.ic10"));
	assert_eq!(Analyzer::default().analyze(&source, &token).unwrap_err(), Cancelled);
}

#[test]
fn newer_passes_supersede_older_ones() {
	let workspace = Workspace::<&str, usize>::new();
	let first = workspace.begin("a.ic10", 1);
	let second = workspace.begin("a.ic10", 2);
	let other = workspace.begin("b.ic10", 1);
	assert!(first.token.is_cancelled());
	assert!(!second.token.is_cancelled());
	assert!(!other.token.is_cancelled());

	assert!(!workspace.is_current(&first));
	assert!(workspace.is_current(&second));
	assert_eq!(workspace.commit(&second, 2).as_deref(), Some(&2));
	assert_eq!(workspace.commit(&first, 1), None);
	assert_eq!(workspace.latest(&"a.ic10").as_deref(), Some(&2));
	assert_eq!(workspace.commit(&other, 10).as_deref(), Some(&10));

	let third = workspace.begin("a.ic10", 3);
	assert!(!workspace.is_current(&second));
	assert!(workspace.is_current(&third));

	workspace.remove(&"a.ic10");
	assert!(!workspace.is_current(&third));
	assert_eq!(workspace.latest(&"a.ic10"), None);
	assert_eq!(workspace.latest(&"b.ic10").as_deref(), Some(&10));
}

#[test]
fn directives() {
	let names = |comment| parse_directive(comment).map(|names| names.iter().map(ToString::to_string).collect::<Vec<_>>());
	assert_eq!(names(" ignore r1, temp"), Some(vec!["r1".to_owned(), "temp".to_owned()]));
	assert_eq!(names("IGNORE: r2"), Some(vec!["r2".to_owned()]));
	assert_eq!(names(" ignore"), Some(Vec::new()));
	assert_eq!(names(" ignored r1"), None);
	assert_eq!(names(" loop forever"), None);
}

#[test]
fn suppression_edits() {
	let analysis = check_with("yield", Configuration::default());
	assert_eq!(
		add_to_directive(&analysis.suppressions, "r3"),
		Some(SuppressionEdit { replace: None, new_text: "# ignore r3\n".to_owned() })
	);

	let text = "move r0 1 # ignore r1\nyield";
	let analysis = check_with(text, Configuration::default());
	let edit = add_to_directive(&analysis.suppressions, "r0").unwrap();
	assert_eq!(edit.replace, Some((text.find('#').unwrap(), "# ignore r1".len()).into()));
	assert_eq!(edit.new_text, "# ignore r1, r0");
	assert_eq!(add_to_directive(&analysis.suppressions, "r1"), None);
	assert_eq!(Suppressions::default().directives.len(), 0);
}

#[test]
fn error_codes_are_unique() {
	let codes = SemanticError::all_codes();
	assert!(codes.iter().all(|code| code.starts_with("ic10::")));
	let mut sorted = codes.to_vec();
	sorted.sort_unstable();
	sorted.dedup();
	assert_eq!(sorted.len(), codes.len());
}

#[cfg(feature = "binaries")]
#[test]
fn error_code_arguments() {
	use crate::cli::ErrorCodeSpec;

	assert!("ic10::dataflow::never_read".parse::<ErrorCodeSpec>().is_ok());
	assert_eq!(
		"dataflow::never_read".parse::<ErrorCodeSpec>(),
		"ic10::dataflow::never_read".parse::<ErrorCodeSpec>()
	);
	assert!("never_read".parse::<ErrorCodeSpec>().is_err());
}

#[cfg(feature = "binaries")]
#[test]
fn silenced_diagnostics_still_count_for_the_exit_status() {
	use crate::cli::{ErrorCodeSpec, ErrorOptions};

	let analysis = check_with("add r0 r1 1\ns db Setting r0", Configuration::default());
	let [read] = analysis.diagnostics.as_slice() else {
		panic!("expected one diagnostic, got {:?}", analysis.diagnostics);
	};
	assert!(read.is_error());

	let quiet = ErrorOptions { no_diagnostics: true, ..ErrorOptions::default() };
	assert!(!quiet.is_reported(read));
	assert!(!quiet.is_ignored(read));

	let ignoring = ErrorOptions {
		ignore: vec!["dataflow::read_before_assign".parse::<ErrorCodeSpec>().unwrap()],
		..ErrorOptions::default()
	};
	assert!(!ignoring.is_reported(read));
	assert!(ignoring.is_ignored(read));
}
