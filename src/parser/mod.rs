//! Parser infrastructure: turns program text into the line-based [`SyntaxTree`].

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};

use crate::SourceFile;
use crate::error::SemanticError;
use crate::sema::register::{DeviceSpec, Register};
use crate::syntax::{Instruction, Line, Operand, OperandValue, Spanned, SyntaxTree};

pub mod lexer;

pub use lexer::{Token, lex};

/// Anything that can be primitively parsed from a string into an enum variant.
/// This trait is intended to be derived with the macro from ``ic10sema_derive``.
pub trait Parse
where
	Self: Sized,
{
	/// Parse this enum from its exact keyword spelling.
	fn parse(value: &str) -> Option<Self>;

	/// Parse this enum, ignoring ASCII case.
	fn parse_ignore_case(value: &str) -> Option<Self>;

	/// Returns whether this string corresponds with an enum variant; i.e. parsing would succeed.
	fn is_valid(value: &str) -> bool {
		Self::parse(value).is_some()
	}
}

/// Parses a whole program. Syntax errors are collected and the offending operands are kept as
/// [`OperandValue::Invalid`], so the returned tree always covers every line.
#[must_use]
pub fn parse(source_code: &Arc<SourceFile>) -> (SyntaxTree, Vec<SemanticError>) {
	let (tokens, mut errors) = lex(source_code);

	let mut lines = line_skeleton(&source_code.text);
	let mut tokens = tokens.into_iter().peekable();
	for line in &mut lines {
		let mut words = Vec::new();
		while let Some(token) = tokens.next() {
			match token {
				Token::Newline(_) => break,
				Token::Comment(text, span) => line.comment = Some(Spanned::new(text, span)),
				Token::Word(text, span) => words.push(Spanned::new(Some(text), span)),
				Token::Invalid(span) => words.push(Spanned::new(None, span)),
			}
		}
		parse_line(line, words, source_code, &mut errors);
	}
	log::trace!("parsed {} lines of {}", lines.len(), source_code.file_name());

	(SyntaxTree { source: source_code.clone(), lines }, errors)
}

/// One empty [`Line`] per source line, with its span.
fn line_skeleton(text: &str) -> Vec<Line> {
	let mut offset = 0;
	text.split('\n')
		.enumerate()
		.map(|(number, line_text)| {
			let line =
				Line { number, span: (offset, line_text.len()).into(), label: None, instruction: None, comment: None };
			offset += line_text.len() + 1;
			line
		})
		.collect()
}

fn parse_line(
	line: &mut Line,
	words: Vec<Spanned<Option<SharedStr>>>,
	source_code: &Arc<SourceFile>,
	errors: &mut Vec<SemanticError>,
) {
	let mut words = words.into_iter().peekable();

	if let Some(Spanned { value: Some(first), span }) = words.peek()
		&& let Some(label) = first.strip_suffix(':')
	{
		if is_identifier(label) {
			line.label = Some(Spanned::new(label.into(), (span.offset(), label.len()).into()));
		} else {
			errors.push(SemanticError::SyntaxError {
				message:  format!("`{label}` is not a valid label name").into(),
				src:      source_code.clone(),
				location: *span,
			});
		}
		words.next();
	}

	// An unlexable operation makes the whole instruction meaningless; the lexer already reported it.
	let Some(Spanned { value: Some(operation), span: operation_span }) = words.next() else {
		return;
	};

	let mut end = operation_span.offset() + operation_span.len();
	let operands = words
		.map(|Spanned { value, span }| {
			end = span.offset() + span.len();
			let parsed = value.map_or(Ok(OperandValue::Invalid), |text| parse_operand(&text));
			let value = parsed.unwrap_or_else(|message| {
				errors.push(SemanticError::SyntaxError { message, src: source_code.clone(), location: span });
				OperandValue::Invalid
			});
			Operand { value, span }
		})
		.collect::<Vec<_>>();

	let span = (operation_span.offset(), end - operation_span.offset()).into();
	line.instruction = Some(Instruction { operation: Spanned::new(operation, operation_span), operands, span });
}

/// Whether the text is a valid label, alias or define name.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
	let mut chars = text.chars();
	chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|chr| chr.is_ascii_alphanumeric() || chr == '_' || chr == '.')
}

/// Classifies one operand word.
///
/// # Errors
/// The message of a syntax error if the word is not a valid operand.
pub fn parse_operand(text: &str) -> Result<OperandValue, SharedStr> {
	if text.starts_with("HASH(") {
		return call_argument(text, "HASH(").map(|name| OperandValue::Hash(name.into()));
	}
	if text.starts_with("STR(") {
		return call_argument(text, "STR(").map(|name| OperandValue::Str(name.into()));
	}
	if looks_numeric(text) {
		return parse_number(text).map(OperandValue::Number).ok_or_else(|| format!("Invalid number `{text}`").into());
	}
	if let Some(register) = Register::parse(text) {
		return Ok(OperandValue::Register(register));
	}
	if let Some(device) = DeviceSpec::parse(text) {
		return Ok(OperandValue::Device(device));
	}
	if looks_like_register(text) {
		return Err(format!("Register `{text}` does not exist").into());
	}
	if looks_like_device(text) {
		return Err(format!("Device `{text}` does not exist").into());
	}
	if is_identifier(text) {
		return Ok(OperandValue::Identifier(text.into()));
	}
	Err(format!("Unexpected operand `{text}`").into())
}

fn call_argument<'a>(text: &'a str, prefix: &str) -> Result<&'a str, SharedStr> {
	text.strip_prefix(prefix)
		.and_then(|rest| rest.strip_suffix(')'))
		.and_then(|quoted| quoted.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
		.ok_or_else(|| format!("Malformed `{prefix}\"...\")` call").into())
}

fn looks_numeric(text: &str) -> bool {
	let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
	unsigned.starts_with(['$', '%']) || unsigned.starts_with(|chr: char| chr.is_ascii_digit() || chr == '.')
}

/// Parses decimal, `$hexadecimal` and `%binary` literals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn parse_number(text: &str) -> Option<f64> {
	let (negative, unsigned) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text.strip_prefix('+').unwrap_or(text)),
	};
	let magnitude = if let Some(hex) = unsigned.strip_prefix('$') {
		i64::from_str_radix(&hex.replace('_', ""), 16).ok()? as f64
	} else if let Some(binary) = unsigned.strip_prefix('%') {
		i64::from_str_radix(&binary.replace('_', ""), 2).ok()? as f64
	} else if unsigned.starts_with(|chr: char| chr.is_ascii_digit() || chr == '.') {
		unsigned.parse::<f64>().ok()?
	} else {
		return None;
	};
	Some(if negative { -magnitude } else { magnitude })
}

fn looks_like_register(text: &str) -> bool {
	let digits = text.trim_start_matches('r');
	digits.len() < text.len() && !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

fn looks_like_device(text: &str) -> bool {
	let device = text.split_once(':').map_or(text, |(device, _)| device);
	device.strip_prefix('d').is_some_and(|rest| {
		let digits = rest.trim_start_matches('r');
		!digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
	})
}
