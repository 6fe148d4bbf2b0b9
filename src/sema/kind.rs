//! Value kinds: the abstract classification of what a register may hold.

use std::fmt::Display;

use ic10sema_derive::VariantName;
use serde::Serialize;

use super::instruction::{Family, Param};
use super::register::{REGISTER_SLOT_COUNT, Register};
use crate::VariantName;

/// Abstract classification of a register value at one program point.
///
/// Kinds form a flat lattice: two different kinds join to [`ValueKind::Unknown`], which is compatible with every
/// expected kind. An unassigned register has no kind at all and is represented with `None` in a [`KindState`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, VariantName)]
pub enum ValueKind {
	/// A plain number.
	Number,
	/// A logic type constant such as `Temperature`.
	LogicType,
	/// A device reference id or prefab hash.
	DeviceId,
	/// Runtime-determined.
	Unknown,
}

impl ValueKind {
	/// Least upper bound of two kinds.
	#[must_use]
	pub fn join(self, other: Self) -> Self {
		if self == other { self } else { Self::Unknown }
	}

	/// Joins two possibly unassigned kinds; unassigned is the bottom element.
	#[must_use]
	pub fn join_option(lhs: Option<Self>, rhs: Option<Self>) -> Option<Self> {
		match (lhs, rhs) {
			(Some(lhs), Some(rhs)) => Some(lhs.join(rhs)),
			(kind @ Some(_), None) | (None, kind) => kind,
		}
	}

	/// Lowercase name for user-facing messages.
	#[must_use]
	pub const fn display_name(self) -> &'static str {
		match self {
			Self::Number => "number",
			Self::LogicType => "logic type",
			Self::DeviceId => "device id",
			Self::Unknown => "unknown",
		}
	}
}

impl Display for ValueKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.display_name())
	}
}

/// Kinds of all directly addressable registers at one program point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KindState(pub [Option<ValueKind>; REGISTER_SLOT_COUNT]);

impl KindState {
	/// State at program entry: only the reserved registers hold values.
	#[must_use]
	pub fn entry() -> Self {
		let mut state = Self::unassigned();
		state.set(Register::StackPointer, ValueKind::Number);
		state.set(Register::ReturnAddress, ValueKind::Number);
		state
	}

	/// State where no register is assigned; the bottom of the lattice.
	#[must_use]
	pub const fn unassigned() -> Self {
		Self([None; REGISTER_SLOT_COUNT])
	}

	/// The kind a register holds, if it is assigned.
	#[must_use]
	pub fn get(&self, register: Register) -> Option<ValueKind> {
		match register {
			Register::Indirect { .. } => Some(ValueKind::Unknown),
			_ => register.slot().and_then(|slot| self.0[slot]),
		}
	}

	/// Overwrites the kind of a directly addressed register. Writes to indirect registers clobber every general
	/// register.
	pub fn set(&mut self, register: Register, kind: ValueKind) {
		match register.slot() {
			Some(slot) => self.0[slot] = Some(kind),
			None => {
				let general = Register::all_slots().filter(|register| matches!(register, Register::General(_)));
				for slot in general.filter_map(Register::slot) {
					self.0[slot] = Some(ValueKind::Unknown);
				}
			},
		}
	}

	/// Joins another state into this one and reports whether anything changed.
	pub fn join_from(&mut self, other: &Self) -> crate::Change {
		let mut change = crate::Change::Unmodified;
		for (own, other) in self.0.iter_mut().zip(other.0) {
			let joined = ValueKind::join_option(*own, other);
			change |= crate::Change::from_bool(joined != *own);
			*own = joined;
		}
		change
	}
}

impl Default for KindState {
	fn default() -> Self {
		Self::unassigned()
	}
}

const NUMERIC: &[ValueKind] = &[ValueKind::Number, ValueKind::Unknown];
const COMPARABLE: &[ValueKind] = &[ValueKind::Number, ValueKind::DeviceId, ValueKind::Unknown];
const LOGIC_TYPE_LIKE: &[ValueKind] = &[ValueKind::LogicType, ValueKind::DeviceId, ValueKind::Unknown];

/// The kinds a register operand may hold in a given slot without an advisory, or `None` if any kind is accepted.
#[must_use]
pub const fn accepted_kinds(family: Family, param: Param) -> Option<&'static [ValueKind]> {
	match (family, param) {
		(Family::Arithmetic, Param::Value | Param::ReadWrite) => Some(NUMERIC),
		(Family::Comparison | Family::Branch, Param::Value) | (_, Param::DeviceId | Param::TypeHash | Param::NameHash) =>
			Some(COMPARABLE),
		(_, Param::LogicType | Param::SlotLogicType) => Some(LOGIC_TYPE_LIKE),
		_ => None,
	}
}

/// Human-readable list of accepted kinds for advisories.
#[must_use]
pub fn describe_kinds(kinds: &[ValueKind]) -> String {
	let names =
		kinds.iter().filter(|kind| **kind != ValueKind::Unknown).map(|kind| kind.display_name()).collect::<Vec<_>>();
	match names.as_slice() {
		[] => "any value".to_owned(),
		[single] => format!("a {single}"),
		[init @ .., last] => format!("a {} or {last}", init.join(", ")),
	}
}

/// Variant name of the kind, used as a compact hover label.
#[must_use]
pub fn kind_label(kind: Option<ValueKind>) -> &'static str {
	kind.map_or("Unassigned", |kind| kind.variant_name())
}
