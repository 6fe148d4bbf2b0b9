//! Lexing.

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};
use miette::SourceSpan;

use crate::SourceFile;
use crate::error::SemanticError;

/// Lexical tokens. IC10 has no punctuation between operands, so anything up to the next white space is one word;
/// quoted strings keep their white space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
	/// A label, operation or operand.
	Word(SharedStr, SourceSpan),
	/// A comment, without the leading `#`.
	Comment(SharedStr, SourceSpan),
	/// A word that could not be lexed, such as one with an unterminated string.
	Invalid(SourceSpan),
	/// End of a line.
	Newline(SourceSpan),
}

impl Token {
	/// The source span of this token.
	#[must_use]
	pub const fn source_span(&self) -> SourceSpan {
		match self {
			Self::Word(_, span) | Self::Comment(_, span) | Self::Invalid(span) | Self::Newline(span) => *span,
		}
	}
}

/// Lex the given program into a list of tokens. Lexing never fails as a whole: malformed words are returned as
/// [`Token::Invalid`] together with a diagnostic.
#[must_use]
pub fn lex(source_code: &Arc<SourceFile>) -> (Vec<Token>, Vec<SemanticError>) {
	let text = source_code.text.as_str();
	let mut chars = text.char_indices().peekable();
	let mut tokens = Vec::new();
	let mut errors = Vec::new();

	while let Some((index, chr)) = chars.next() {
		match chr {
			'\n' => tokens.push(Token::Newline((index, 1).into())),
			'#' => {
				let mut end = text.len();
				while let Some(&(next_index, next)) = chars.peek() {
					if next == '\n' {
						end = next_index;
						break;
					}
					chars.next();
				}
				tokens.push(Token::Comment(text[index + 1 .. end].into(), (index, end - index).into()));
			},
			_ if chr.is_whitespace() => {},
			_ => {
				let mut quote = match chr {
					'"' | '\'' => Some(chr),
					_ => None,
				};
				let mut end = text.len();
				while let Some(&(next_index, next)) = chars.peek() {
					if next == '\n' || (quote.is_none() && (next.is_whitespace() || next == '#')) {
						end = next_index;
						break;
					}
					quote = match (quote, next) {
						(None, '"' | '\'') => Some(next),
						(Some(open), close) if open == close => None,
						(quote, _) => quote,
					};
					chars.next();
				}
				let span: SourceSpan = (index, end - index).into();
				if quote.is_some() {
					errors.push(SemanticError::SyntaxError {
						message:  shared_str!("Unterminated string"),
						src:      source_code.clone(),
						location: span,
					});
					tokens.push(Token::Invalid(span));
				} else {
					tokens.push(Token::Word(text[index .. end].into(), span));
				}
			},
		}
	}

	(tokens, errors)
}
