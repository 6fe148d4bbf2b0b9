//! Command-line interface related structures.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser};
#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};

use crate::config::Configuration;
use crate::error::{ErrorCodes, SemanticError};

/// Specification of which diagnostics to leave out of the report.
#[derive(Debug, Clone, Eq, PartialEq, Default, Args)]
pub struct ErrorOptions {
	/// Diagnostic codes to silence, with or without the `ic10::` prefix. May be given multiple times.
	#[arg(long, short = 'w')]
	pub ignore:         Vec<ErrorCodeSpec>,
	/// Do not report any diagnostics; only the exit status is meaningful.
	#[arg(long)]
	pub no_diagnostics: bool,
}

impl ErrorOptions {
	/// Whether a diagnostic's code was silenced. Silenced diagnostics neither print nor fail the run.
	#[must_use]
	pub fn is_ignored(&self, diagnostic: &SemanticError) -> bool {
		let code = diagnostic.code_name();
		self.ignore.iter().any(|ignored| ignored.0 == code)
	}

	/// Whether a diagnostic should be printed.
	#[must_use]
	pub fn is_reported(&self, diagnostic: &SemanticError) -> bool {
		!self.no_diagnostics && !self.is_ignored(diagnostic)
	}
}

/// A validated diagnostic code.
#[derive(Debug, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct ErrorCodeSpec(SharedStr);

const error_prefix: &str = "ic10::";

impl FromStr for ErrorCodeSpec {
	type Err = String;

	fn from_str(string_code: &str) -> Result<Self, Self::Err> {
		SemanticError::all_codes()
			.iter()
			.find(|code| {
				**code == string_code
				// If the user provided an error code not starting with ic10:: (very reasonable), just ignore the prefix.
					|| (!string_code.starts_with(error_prefix) && code[error_prefix.len() ..] == *string_code)
			})
			.map(|code| Self(SharedStr::from_static(code)))
			.ok_or_else(|| format!("invalid diagnostic code `{string_code}`"))
	}
}

/// Size ceilings, overriding the defaults.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Args)]
pub struct LimitOptions {
	/// Maximum number of lines.
	#[arg(long, default_value_t = Configuration::default().max_lines)]
	pub max_lines:   usize,
	/// Maximum number of characters per line.
	#[arg(long, default_value_t = Configuration::default().max_columns)]
	pub max_columns: usize,
	/// Maximum program size in bytes, counting line breaks as two bytes.
	#[arg(long, default_value_t = Configuration::default().max_bytes)]
	pub max_bytes:   usize,
}

/// Semantic checker for Stationeers IC10 programs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Ic10semaCli {
	/// IC10 program to check.
	pub input:         PathBuf,
	#[command(flatten)]
	#[allow(missing_docs)]
	pub warning_flags: ErrorOptions,
	#[command(flatten)]
	#[allow(missing_docs)]
	pub limits:        LimitOptions,
}

impl Ic10semaCli {
	/// The analysis configuration these arguments describe.
	#[must_use]
	pub const fn configuration(&self) -> Configuration {
		Configuration {
			max_lines:           self.limits.max_lines,
			max_columns:         self.limits.max_columns,
			max_bytes:           self.limits.max_bytes,
			diagnostics_enabled: true,
		}
	}
}
