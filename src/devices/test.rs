use std::sync::Arc;

use super::*;

#[test]
fn crc32_matches_game_hashes() {
	assert_eq!(compute_crc32("StructureVolumePump"), -321_403_609);
	assert_eq!(compute_crc32("StructureDaylightSensor"), 1_076_425_094);
}

#[test]
fn builtin_table_is_consistent() {
	for device in BuiltinDevices.devices() {
		assert_eq!(compute_crc32(&device.canonical), device.hash, "{}", device.canonical);
		assert_eq!(BuiltinDevices.by_hash(device.hash).as_ref(), Some(&device));
	}
}

#[test]
fn hash_arguments() {
	assert_eq!(hash_argument("HASH(\"StructureVolumePump\")"), Some("StructureVolumePump"));
	assert_eq!(hash_argument("HASH('Foo')"), Some("Foo"));
	assert_eq!(hash_argument("HASH(Foo)"), Some("Foo"));
	assert_eq!(hash_argument("HASH()"), None);
	assert_eq!(hash_argument("hash(\"Foo\")"), None);
}

#[test]
fn edit_distance() {
	assert_eq!(levenshtein("kitten", "sitting"), 3);
	assert_eq!(levenshtein("", "abc"), 3);
	assert_eq!(levenshtein("pump", "pump"), 0);
	assert_eq!(normalize_name("Solar Panel (Dual)"), "solarpaneldual");
}

#[test]
fn exact_and_numeric_lookup() {
	let resolver = HashResolver::default();
	let pump = resolver.resolve_hash(-321_403_609).unwrap();
	assert_eq!(pump.canonical.as_str(), "StructureVolumePump");
	assert_eq!(pump.display.as_str(), "Volume Pump");
	assert_eq!(resolver.resolve_numeric(-321_403_609.0), Some(pump.clone()));
	assert_eq!(resolver.resolve_numeric(-321_403_609.5), None);
	assert_eq!(resolver.resolve_numeric(12.0), None);
	assert_eq!(resolver.resolve_name("StructureVolumePump"), Resolution::Exact(pump));
}

#[test]
fn fuzzy_lookup() {
	let resolver = HashResolver::default();
	let Resolution::Fuzzy { device, distance } = resolver.resolve_name("StructureVolumPump") else {
		panic!("misspelled pump did not resolve");
	};
	assert_eq!(device.canonical.as_str(), "StructureVolumePump");
	assert_eq!(distance, 1);
	assert_eq!(resolver.resolve_name("Something entirely unrelated"), Resolution::Unresolved);
	assert_eq!(resolver.resolve_name("()"), Resolution::Unresolved);
}

#[test]
fn fuzzy_lookup_refuses_ties() {
	let resolver =
		HashResolver::new(Arc::new(CustomDevices::new([("PumpA", "Pump A"), ("PumpB", "Pump B")])), FuzzyPolicy::default());
	assert_eq!(resolver.resolve_name("PumpC"), Resolution::Unresolved);
	assert!(matches!(resolver.resolve_name("PumpA"), Resolution::Exact(_)));
	assert_eq!(resolver.resolve_hash(compute_crc32("PumpB")).unwrap().display.as_str(), "Pump B");

	let lenient = HashResolver::new(
		Arc::new(CustomDevices::new([("PumpA", "Pump A"), ("Heater", "Heater")])),
		FuzzyPolicy { margin: 1, max_distance: 3 },
	);
	assert_eq!(lenient.resolve_name("PumpC").device().unwrap().canonical.as_str(), "PumpA");
}
