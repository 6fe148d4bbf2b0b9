//! Interface logic for converting ic10sema data to LSP data and vice-versa.
//!
//! ic10sema spans are byte offsets into the program text; LSP positions are lines and UTF-16 code unit columns.

use ic10sema::SemanticError;
use miette::{Diagnostic, SourceSpan};
use serde_json::json;
use tower_lsp::lsp_types::*;

/// Convert the byte offset in the given source code to an LSP position. Returns `None` if the offset is past the end
/// of the text, splits a character, or does not fit a 32-bit position.
pub fn source_offset_to_lsp_position(offset: usize, text: &str) -> Option<Position> {
	let before = text.get(.. offset)?;
	let line = before.bytes().filter(|byte| *byte == b'\n').count();
	let line_start = before.rfind('\n').map_or(0, |index| index + 1);
	let character = before[line_start ..].encode_utf16().count();
	Some(Position::new(u32::try_from(line).ok()?, u32::try_from(character).ok()?))
}

/// Convert an LSP position to a byte offset. Positions past the end of a line are clamped to the line end.
pub fn lsp_position_to_source_offset(position: Position, text: &str) -> usize {
	let line_start = text.split_inclusive('\n').take(position.line as usize).map(str::len).sum::<usize>();
	let line = text[line_start ..].split('\n').next().unwrap_or_default();
	let mut units = 0;
	let mut bytes = 0;
	for chr in line.chars() {
		if units >= position.character as usize {
			break;
		}
		units += chr.len_utf16();
		bytes += chr.len_utf8();
	}
	line_start + bytes
}

/// The LSP range of a source span.
pub fn span_to_lsp_range(span: SourceSpan, text: &str) -> Option<Range> {
	Some(Range::new(
		source_offset_to_lsp_position(span.offset(), text)?,
		source_offset_to_lsp_position(span.offset() + span.len(), text)?,
	))
}

/// Note that since every miette-based diagnostic can contain multiple labeled spans, it can map to multiple LSP
/// diagnostics, one for each span. Dataflow diagnostics carry the register they are about in their `data`, for the
/// suppression code action.
pub fn semantic_error_to_lsp_diagnostics(error: &SemanticError, text: &str) -> Vec<tower_lsp::lsp_types::Diagnostic> {
	let message = match error.help() {
		Some(help) => format!("{error}\n{help}"),
		None => error.to_string(),
	};
	let data = error.suppression_key().map(|register| json!({ "register": register.to_string() }));
	error
		.labels()
		.into_iter()
		.flatten()
		.filter_map(|label| {
			Some(tower_lsp::lsp_types::Diagnostic {
				range: span_to_lsp_range(*label.inner(), text)?,
				severity: Some(miette_severity_to_lsp_severity(error.severity().unwrap_or(miette::Severity::Error))),
				code: Some(NumberOrString::String(error.code_name().to_string())),
				code_description: None,
				source: Some("ic10sema".into()),
				message: message.clone(),
				related_information: None,
				tags: matches!(error, SemanticError::NeverRead { .. } | SemanticError::UnusedRegister { .. })
					.then(|| vec![DiagnosticTag::UNNECESSARY]),
				data: data.clone(),
			})
		})
		.collect()
}

pub const fn miette_severity_to_lsp_severity(severity: miette::Severity) -> DiagnosticSeverity {
	match severity {
		miette::Severity::Advice => DiagnosticSeverity::INFORMATION,
		miette::Severity::Warning => DiagnosticSeverity::WARNING,
		miette::Severity::Error => DiagnosticSeverity::ERROR,
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn positions_round_trip_through_multibyte_text() {
		let text = "move r0 1 # °C\nadd r1 r0 1\n";
		let offset = text.find("add").unwrap();
		let position = source_offset_to_lsp_position(offset, text).unwrap();
		assert_eq!(position, Position::new(1, 0));
		assert_eq!(lsp_position_to_source_offset(position, text), offset);

		let end_of_comment = text.find('\n').unwrap();
		let position = source_offset_to_lsp_position(end_of_comment, text).unwrap();
		assert_eq!(position, Position::new(0, 14));
		assert_eq!(lsp_position_to_source_offset(position, text), end_of_comment);
	}

	#[test]
	fn positions_past_the_end_are_rejected_or_clamped() {
		let text = "yield";
		assert_eq!(source_offset_to_lsp_position(6, text), None);
		assert_eq!(lsp_position_to_source_offset(Position::new(0, 40), text), 5);
	}
}
