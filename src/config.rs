//! Analysis configuration.

use serde::Deserialize;

/// Ceilings and switches that the analysis reads. Missing fields in a deserialized settings object keep their
/// defaults.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
	/// Maximum number of lines the game accepts.
	pub max_lines:           usize,
	/// Maximum characters per line.
	pub max_columns:         usize,
	/// Maximum program size in bytes, counting line breaks as two bytes.
	pub max_bytes:           usize,
	/// When off, analysis still runs but reports nothing.
	pub diagnostics_enabled: bool,
}

impl Default for Configuration {
	fn default() -> Self {
		Self { max_lines: 128, max_columns: 90, max_bytes: 4096, diagnostics_enabled: true }
	}
}

/// A partial configuration change, as sent by an editor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationUpdate {
	/// See [`Configuration::max_lines`].
	pub max_lines:           Option<usize>,
	/// See [`Configuration::max_columns`].
	pub max_columns:         Option<usize>,
	/// See [`Configuration::max_bytes`].
	pub max_bytes:           Option<usize>,
	/// See [`Configuration::diagnostics_enabled`].
	pub diagnostics_enabled: Option<bool>,
}

impl ConfigurationUpdate {
	/// Overwrites the fields this update names.
	pub fn apply(self, configuration: &mut Configuration) {
		if let Some(max_lines) = self.max_lines {
			configuration.max_lines = max_lines;
		}
		if let Some(max_columns) = self.max_columns {
			configuration.max_columns = max_columns;
		}
		if let Some(max_bytes) = self.max_bytes {
			configuration.max_bytes = max_bytes;
		}
		if let Some(diagnostics_enabled) = self.diagnostics_enabled {
			configuration.diagnostics_enabled = diagnostics_enabled;
		}
	}
}
