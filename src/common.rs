//! Common includes and functions for both library and executables.

use std::sync::Arc;

use crate::SourceFile;
use crate::analysis::{Analysis, Analyzer};
use crate::config::Configuration;
use crate::session::{CancellationToken, Cancelled};

/// Run the analysis on a single file with the given configuration.
///
/// # Errors
/// If the file cannot be read. Diagnostics about the program itself are part of the returned [`Analysis`].
pub fn run_analysis(file_name: &str, config: Configuration) -> miette::Result<Analysis> {
	use miette::{IntoDiagnostic, WrapErr};

	let source_code = SourceFile::from_file(file_name)
		.into_diagnostic()
		.wrap_err_with(|| format!("File \"{file_name}\" could not be read"))?;
	run_analysis_on_source(&source_code, config, &CancellationToken::new()).into_diagnostic()
}

/// Run the analysis on given source code. This method is intended to be used directly when the source code is not a
/// file on disk.
///
/// # Errors
/// If the token is cancelled before the analysis finishes.
pub fn run_analysis_on_source(
	source_code: &Arc<SourceFile>,
	config: Configuration,
	token: &CancellationToken,
) -> Result<Analysis, Cancelled> {
	Analyzer::new(config).analyze(source_code, token)
}

/// Provides a name for enum variants.
pub trait VariantName {
	/// Returns the name of this variant.
	fn variant_name(&self) -> &'static str;
}
