//! Device and hash resolution.
//!
//! Device hashes appear in programs either as explicit numeric constants or as `HASH("PrefabName")` calls. The
//! resolver maps both to a canonical prefab name and a display name. Name lookups that miss the table exactly fall back
//! to a typo-tolerant match that only answers when one candidate clearly beats all others.

use std::sync::Arc;

#[allow(unused)]
use flexstr::{IntoSharedStr, SharedStr, ToSharedStr, shared_str};

mod table;

#[cfg(test)] mod test;

/// Computes the game's hash of a string: the CRC-32 of its UTF-8 bytes, reinterpreted as a signed integer.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn compute_crc32(input: &str) -> i32 {
	let mut hasher = crc32fast::Hasher::new();
	hasher.update(input.as_bytes());
	hasher.finalize() as i32
}

/// Extracts the argument of a `HASH("...")` call. Single quotes and unquoted arguments are accepted as well.
#[must_use]
pub fn hash_argument(input: &str) -> Option<&str> {
	let content = input.trim().strip_prefix("HASH(")?.strip_suffix(')')?.trim();
	for quote in ['"', '\''] {
		if let Some(inner) = content.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
			return Some(inner);
		}
	}
	if content.is_empty() { None } else { Some(content) }
}

/// Edit distance between two strings, counted in characters.
#[must_use]
pub fn levenshtein(lhs: &str, rhs: &str) -> usize {
	let rhs = rhs.chars().collect::<Vec<_>>();
	let mut previous = (0 ..= rhs.len()).collect::<Vec<_>>();
	let mut current = vec![0; rhs.len() + 1];
	for (i, lhs_char) in lhs.chars().enumerate() {
		current[0] = i + 1;
		for (j, rhs_char) in rhs.iter().enumerate() {
			let cost = usize::from(lhs_char != *rhs_char);
			current[j + 1] = (previous[j + 1] + 1).min(current[j] + 1).min(previous[j] + cost);
		}
		std::mem::swap(&mut previous, &mut current);
	}
	previous[rhs.len()]
}

/// Strips everything but letters and digits and lowercases the rest.
#[must_use]
pub fn normalize_name(name: &str) -> String {
	name.chars().filter(char::is_ascii_alphanumeric).map(|chr| chr.to_ascii_lowercase()).collect()
}

/// One device known to a registry.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DeviceInfo {
	/// Prefab name, the argument of `HASH`.
	pub canonical: SharedStr,
	/// Name shown to players.
	pub display:   SharedStr,
	/// Prefab hash.
	pub hash:      i32,
}

/// A table of known devices.
pub trait DeviceRegistry: Send + Sync + std::fmt::Debug {
	/// Exact, case-sensitive lookup by prefab name.
	fn by_name(&self, name: &str) -> Option<DeviceInfo>;
	/// Exact lookup by prefab hash.
	fn by_hash(&self, hash: i32) -> Option<DeviceInfo>;
	/// All devices of the registry.
	fn devices(&self) -> Vec<DeviceInfo>;
}

/// The device table compiled into the crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinDevices;

impl DeviceRegistry for BuiltinDevices {
	fn by_name(&self, name: &str) -> Option<DeviceInfo> {
		let (canonical, (display, hash)) = table::PREFAB_TO_DEVICE.get_entry(name)?;
		Some(DeviceInfo {
			canonical: SharedStr::from_static(canonical),
			display:   SharedStr::from_static(display),
			hash:      *hash,
		})
	}

	fn by_hash(&self, hash: i32) -> Option<DeviceInfo> {
		table::HASH_TO_PREFAB.get(&hash).and_then(|name| self.by_name(name))
	}

	fn devices(&self) -> Vec<DeviceInfo> {
		table::PREFAB_TO_DEVICE
			.entries()
			.map(|(canonical, (display, hash))| DeviceInfo {
				canonical: SharedStr::from_static(canonical),
				display:   SharedStr::from_static(display),
				hash:      *hash,
			})
			.collect()
	}
}

/// A registry over a caller-supplied list of `(prefab name, display name)` pairs. Hashes are computed.
#[derive(Clone, Debug, Default)]
pub struct CustomDevices {
	devices: Vec<DeviceInfo>,
}

impl CustomDevices {
	/// Builds a registry from prefab and display names.
	pub fn new<'a>(devices: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		Self {
			devices: devices
				.into_iter()
				.map(|(canonical, display)| DeviceInfo {
					canonical: canonical.into(),
					display:   display.into(),
					hash:      compute_crc32(canonical),
				})
				.collect(),
		}
	}
}

impl DeviceRegistry for CustomDevices {
	fn by_name(&self, name: &str) -> Option<DeviceInfo> {
		self.devices.iter().find(|device| device.canonical.as_str() == name).cloned()
	}

	fn by_hash(&self, hash: i32) -> Option<DeviceInfo> {
		self.devices.iter().find(|device| device.hash == hash).cloned()
	}

	fn devices(&self) -> Vec<DeviceInfo> {
		self.devices.clone()
	}
}

/// Acceptance policy for typo-tolerant name matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FuzzyPolicy {
	/// How much closer the best candidate must be than the runner-up.
	pub margin:       usize,
	/// Largest edit distance that is still considered a typo.
	pub max_distance: usize,
}

impl Default for FuzzyPolicy {
	fn default() -> Self {
		Self { margin: 2, max_distance: 3 }
	}
}

/// Outcome of resolving a device name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
	/// The name is a prefab name.
	Exact(DeviceInfo),
	/// The name is a close misspelling of exactly one device.
	Fuzzy {
		/// The matched device.
		device:   DeviceInfo,
		/// Edit distance of the normalized names.
		distance: usize,
	},
	/// No device matches, or several match equally well.
	Unresolved,
}

impl Resolution {
	/// The device this name resolves to, exact or fuzzy.
	#[must_use]
	pub const fn device(&self) -> Option<&DeviceInfo> {
		match self {
			Self::Exact(device) | Self::Fuzzy { device, .. } => Some(device),
			Self::Unresolved => None,
		}
	}
}

/// Resolves device names and hashes against a registry. Cheap to clone; the registry is shared.
#[derive(Clone, Debug)]
pub struct HashResolver {
	registry: Arc<dyn DeviceRegistry>,
	policy:   FuzzyPolicy,
}

impl Default for HashResolver {
	fn default() -> Self {
		Self::new(Arc::new(BuiltinDevices), FuzzyPolicy::default())
	}
}

impl HashResolver {
	/// Creates a resolver over a registry.
	#[must_use]
	pub fn new(registry: Arc<dyn DeviceRegistry>, policy: FuzzyPolicy) -> Self {
		Self { registry, policy }
	}

	/// The fuzzy acceptance policy in use.
	#[must_use]
	pub const fn policy(&self) -> FuzzyPolicy {
		self.policy
	}

	/// Looks up a numeric hash.
	#[must_use]
	pub fn resolve_hash(&self, hash: i32) -> Option<DeviceInfo> {
		self.registry.by_hash(hash)
	}

	/// Looks up a numeric constant as a device hash, if it is an integer in range.
	#[must_use]
	#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
	pub fn resolve_numeric(&self, value: f64) -> Option<DeviceInfo> {
		let integer = value as i32;
		if f64::from(integer) == value { self.resolve_hash(integer) } else { None }
	}

	/// Resolves a device name: exactly first, then by the closest normalized name.
	#[must_use]
	pub fn resolve_name(&self, name: &str) -> Resolution {
		if let Some(device) = self.registry.by_name(name) {
			return Resolution::Exact(device);
		}
		let normalized = normalize_name(name);
		if normalized.is_empty() {
			return Resolution::Unresolved;
		}

		let mut best: Option<(usize, DeviceInfo)> = None;
		let mut runner_up = usize::MAX;
		for device in self.registry.devices() {
			let distance = levenshtein(&normalized, &normalize_name(&device.canonical))
				.min(levenshtein(&normalized, &normalize_name(&device.display)));
			match &best {
				Some((best_distance, _)) if distance >= *best_distance => runner_up = runner_up.min(distance),
				_ => {
					if let Some((previous, _)) = best.replace((distance, device)) {
						runner_up = runner_up.min(previous);
					}
				},
			}
		}

		match best {
			Some((distance, device))
				if distance <= self.policy.max_distance && runner_up.saturating_sub(distance) >= self.policy.margin =>
			{
				log::trace!("resolved {name:?} to {} at distance {distance}", device.canonical);
				Resolution::Fuzzy { device, distance }
			},
			_ => Resolution::Unresolved,
		}
	}
}
