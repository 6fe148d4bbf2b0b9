//! Source code infrastructure for diagnostic reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::{MietteError, MietteSpanContents, SourceCode, SourceSpan, SpanContents};

/// The source text of one IC10 program, shared by every diagnostic produced for it.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
	/// The text content of the program. Carriage returns are stripped on construction.
	pub text: SharedStr,
	/// The name of the program, usually a file path or a document URI.
	pub name: PathBuf,
}

impl SourceFile {
	/// Create a new source file by loading a file's contents.
	///
	/// # Errors
	/// If reading the file fails (doesn't exist, permissions wrong, I/O error etc.)
	pub fn from_file(filename: &str) -> Result<Arc<Self>, std::io::Error> {
		let path = PathBuf::from(filename);
		let text = std::fs::read_to_string(&path)?;
		Ok(Arc::new(Self::new_from_path(&text, &path)))
	}

	/// Create a new source file from program text and a (possibly fake) name.
	#[must_use]
	pub fn new(text: &str, name: &str) -> Self {
		Self::new_from_path(text, Path::new(name))
	}

	/// Create a new source file from program text and a file system path.
	#[must_use]
	pub fn new_from_path(text: &str, name: &Path) -> Self {
		Self { text: text.chars().filter(|c| c != &'\r').collect::<String>().into(), name: name.to_owned() }
	}

	/// Returns the name of this source file for display.
	#[must_use]
	pub fn file_name(&self) -> SharedStr {
		self.name.as_os_str().to_string_lossy().to_string().into()
	}

	/// Returns the zero-based line index containing the given byte offset.
	#[must_use]
	pub fn line_of_offset(&self, offset: usize) -> usize {
		self.text.as_bytes().iter().take(offset).filter(|byte| **byte == b'\n').count()
	}

	/// Returns the text covered by the span, or an empty string if the span is out of bounds.
	#[must_use]
	pub fn span_text(&self, span: SourceSpan) -> &str {
		self.text.get(span.offset() .. span.offset() + span.len()).unwrap_or_default()
	}
}

impl SourceCode for SourceFile {
	fn read_span<'a>(
		&'a self,
		span: &SourceSpan,
		context_lines_before: usize,
		context_lines_after: usize,
	) -> Result<Box<dyn SpanContents<'a> + 'a>, MietteError> {
		let result = self.text.as_str().read_span(span, context_lines_before, context_lines_after)?;
		let retval = Box::new(MietteSpanContents::new_named(
			self.file_name().as_str().to_owned(),
			result.data(),
			*result.span(),
			result.line(),
			result.column(),
			result.line_count(),
		));
		Ok(retval)
	}
}
