//! Enum specifying whether a change occurred or not.

/// Result of one fixed-point iteration step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
#[repr(u8)]
pub enum Change {
	/// Nothing was updated; the analysis is stable.
	#[default]
	Unmodified,
	/// At least one fact was updated.
	Modified,
}

impl Change {
	/// Returns [`Change::Modified`] if the condition holds.
	#[must_use]
	pub const fn from_bool(modified: bool) -> Self {
		if modified { Self::Modified } else { Self::Unmodified }
	}
}

impl std::ops::BitOrAssign for Change {
	fn bitor_assign(&mut self, rhs: Self) {
		*self = *self | rhs;
	}
}

impl std::ops::BitOr for Change {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		if self == Self::Modified || rhs == Self::Modified { Self::Modified } else { Self::Unmodified }
	}
}
