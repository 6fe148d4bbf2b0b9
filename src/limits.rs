//! Program size ceilings: line count, line width and stored byte size.

use std::sync::Arc;

use crate::SourceFile;
use crate::config::Configuration;
use crate::error::SemanticError;

/// Checks the program text against the configured ceilings. Each ceiling yields at most one diagnostic, except the
/// column ceiling which reports every line that is too wide.
#[must_use]
pub fn check(source: &Arc<SourceFile>, config: &Configuration) -> Vec<SemanticError> {
	let text = source.text.as_str();
	let mut diagnostics = Vec::new();

	let mut lines = Vec::new();
	let mut offset = 0;
	for line in text.split('\n') {
		lines.push((offset, line));
		offset += line.len() + 1;
	}
	// A trailing line break does not start another program line.
	if lines.len() > 1 && lines.last().is_some_and(|(_, line)| line.is_empty()) {
		lines.pop();
	}

	if lines.len() > config.max_lines {
		let start = lines[config.max_lines].0;
		diagnostics.push(SemanticError::LineLimit {
			lines:    lines.len(),
			max:      config.max_lines,
			src:      source.clone(),
			location: (start, text.len() - start).into(),
		});
	}

	for (number, (offset, line)) in lines.iter().enumerate() {
		let columns = line.chars().count();
		if columns > config.max_columns {
			let overflow = line.char_indices().nth(config.max_columns).map_or(line.len(), |(index, _)| index);
			diagnostics.push(SemanticError::ColumnLimit {
				line: number,
				columns,
				max: config.max_columns,
				src: source.clone(),
				location: (offset + overflow, line.len() - overflow).into(),
			});
		}
	}

	let bytes = stored_size(text);
	if bytes > config.max_bytes {
		let mut size = 0;
		let first_over = text
			.char_indices()
			.find(|(_, chr)| {
				size += stored_char_size(*chr);
				size > config.max_bytes
			})
			.map_or(text.len(), |(index, _)| index);
		diagnostics.push(SemanticError::ByteLimit {
			bytes,
			max: config.max_bytes,
			src: source.clone(),
			location: (first_over, text.len() - first_over).into(),
		});
	}

	diagnostics
}

/// Size of the program as the game stores it: UTF-8 with CR LF line breaks.
#[must_use]
pub fn stored_size(text: &str) -> usize {
	text.chars().map(stored_char_size).sum()
}

fn stored_char_size(chr: char) -> usize {
	if chr == '\n' { 2 } else { chr.len_utf8() }
}
