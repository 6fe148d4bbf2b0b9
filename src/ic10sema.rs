//! ic10sema binary.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

use clap::{CommandFactory, FromArgMatches};
use ic10sema::cli::Ic10semaCli;
use ic10sema::run_analysis;

shadow_rs::shadow!(buildinfo);

fn main() -> miette::Result<()> {
	human_panic::setup_panic!();
	miette::set_hook(Box::new(|_| {
		Box::new(
			miette::MietteHandlerOpts::new().unicode(true).context_lines(3).tab_width(4).with_cause_chain().build(),
		)
	}))?;

	let long_version =
		format!("{}, built {}, {}", buildinfo::PKG_VERSION, buildinfo::BUILD_TIME, buildinfo::RUST_VERSION);
	let matches = Ic10semaCli::command().long_version(long_version).get_matches();
	let args = Ic10semaCli::from_arg_matches(&matches).unwrap_or_else(|error| error.exit());

	let analysis = run_analysis(&args.input.to_string_lossy(), args.configuration())?;
	let mut had_error = false;
	for diagnostic in analysis.diagnostics {
		if args.warning_flags.is_ignored(&diagnostic) {
			continue;
		}
		had_error |= diagnostic.is_error();
		if args.warning_flags.is_reported(&diagnostic) {
			eprintln!("{:?}", miette::Report::new(diagnostic));
		}
	}

	if had_error {
		std::process::exit(1);
	}
	Ok(())
}
