//! The Register and device structs.
// this is a bug, see <https://github.com/rust-lang/rust-clippy/issues/6902>
#![allow(clippy::use_self)]

use std::fmt::Display;

/// Number of general-purpose registers, `r0` through `r15`.
pub const GENERAL_REGISTER_COUNT: u8 = 16;
/// Number of directly addressable register slots: the general registers plus `sp` and `ra`.
pub const REGISTER_SLOT_COUNT: usize = 18;
/// Number of device pins on an IC housing, `d0` through `d5`.
pub const DEVICE_PIN_COUNT: u8 = 6;
/// Highest network channel index accepted in `d0:N` channel syntax.
pub const MAX_CHANNEL: u8 = 7;

const STACK_POINTER_SLOT: u8 = 16;
const RETURN_ADDRESS_SLOT: u8 = 17;

/// Registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Register {
	/// General-purpose register `r0` to `r15`.
	General(u8),
	/// Stack pointer, `sp` or `r16`.
	StackPointer,
	/// Return address, `ra` or `r17`.
	ReturnAddress,
	/// Register-reference slot such as `rr3`: reads the register whose number is held in the base register, once per
	/// extra `r`.
	Indirect {
		/// Number of indirections, i.e. the number of leading `r` minus one.
		depth: u8,
		/// Slot index of the first register read.
		base:  u8,
	},
}

impl Register {
	/// Parses the canonical lowercase spelling of a register.
	#[must_use]
	pub fn parse(text: &str) -> Option<Self> {
		let digits_start = text.find(|chr: char| chr != 'r')?;
		let (prefix, digits) = text.split_at(digits_start);
		if prefix.is_empty() {
			return match text {
				"sp" => Some(Self::StackPointer),
				"ra" => Some(Self::ReturnAddress),
				_ => None,
			};
		}
		if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) || digits.len() > 2 {
			return None;
		}
		let number = digits.parse::<u8>().ok()?;
		if usize::from(number) >= REGISTER_SLOT_COUNT {
			return None;
		}
		match prefix.len() {
			1 => Self::from_slot(usize::from(number)),
			depth => Some(Self::Indirect { depth: u8::try_from(depth - 1).ok()?, base: number }),
		}
	}

	/// Returns the register living in the given dataflow slot.
	#[must_use]
	pub fn from_slot(slot: usize) -> Option<Self> {
		let slot = u8::try_from(slot).ok()?;
		match slot {
			0 .. GENERAL_REGISTER_COUNT => Some(Self::General(slot)),
			STACK_POINTER_SLOT => Some(Self::StackPointer),
			RETURN_ADDRESS_SLOT => Some(Self::ReturnAddress),
			_ => None,
		}
	}

	/// The dataflow slot of a directly addressed register. Indirect registers have no slot of their own.
	#[must_use]
	pub const fn slot(self) -> Option<usize> {
		match self {
			Self::General(number) => Some(number as usize),
			Self::StackPointer => Some(STACK_POINTER_SLOT as usize),
			Self::ReturnAddress => Some(RETURN_ADDRESS_SLOT as usize),
			Self::Indirect { .. } => None,
		}
	}

	/// Reserved and indirect registers are always considered initialized.
	#[must_use]
	pub const fn is_implicitly_initialized(self) -> bool {
		!matches!(self, Self::General(_))
	}

	/// For indirect registers, the directly addressed register that is read to find the target.
	#[must_use]
	pub fn indirection_base(self) -> Option<Self> {
		match self {
			Self::Indirect { base, .. } => Self::from_slot(usize::from(base)),
			_ => None,
		}
	}

	/// Iterates all directly addressable registers in slot order.
	pub fn all_slots() -> impl Iterator<Item = Self> {
		(0 .. REGISTER_SLOT_COUNT).filter_map(Self::from_slot)
	}
}

impl Display for Register {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		match self {
			Self::General(number) => write!(f, "r{number}"),
			Self::StackPointer => write!(f, "sp"),
			Self::ReturnAddress => write!(f, "ra"),
			Self::Indirect { depth, base } => write!(f, "{}r{base}", "r".repeat(usize::from(*depth))),
		}
	}
}

/// A device slot of the IC housing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Device {
	/// Device pin `d0` to `d5`.
	Pin(u8),
	/// The housing itself, `db`.
	Base,
	/// Device selected by a register value, such as `dr2`.
	Indirect {
		/// Number of register reads, i.e. the number of `r` after the `d`.
		depth: u8,
		/// Slot index of the first register read.
		base:  u8,
	},
}

/// A device operand, optionally addressing a network channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DeviceSpec {
	/// The device slot.
	pub device:  Device,
	/// Channel index for `d0:N` syntax.
	pub channel: Option<u8>,
}

impl DeviceSpec {
	/// Parses a device operand such as `d0`, `db`, `dr3` or `d1:2`.
	#[must_use]
	pub fn parse(text: &str) -> Option<Self> {
		let (device_text, channel) = match text.split_once(':') {
			Some((device_text, channel_text)) => {
				let channel = channel_text.parse::<u8>().ok().filter(|channel| *channel <= MAX_CHANNEL)?;
				(device_text, Some(channel))
			},
			None => (text, None),
		};
		let rest = device_text.strip_prefix('d')?;
		let device = if rest == "b" {
			Device::Base
		} else if let Some(indirect) = rest.strip_prefix('r') {
			// dr3 reads r3, drr3 reads r[r3].
			let register = Register::parse(&format!("r{indirect}"))?;
			match register {
				Register::Indirect { depth, base } => Device::Indirect { depth: depth + 1, base },
				other => Device::Indirect { depth: 1, base: u8::try_from(other.slot()?).ok()? },
			}
		} else {
			let pin = rest.parse::<u8>().ok().filter(|pin| *pin < DEVICE_PIN_COUNT && rest.len() == 1)?;
			Device::Pin(pin)
		};
		Some(Self { device, channel })
	}

	/// The register that is read to select the device, for indirect devices.
	#[must_use]
	pub fn indirection_base(self) -> Option<Register> {
		match self.device {
			Device::Indirect { base, .. } => Register::from_slot(usize::from(base)),
			_ => None,
		}
	}
}

impl Display for DeviceSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		match self.device {
			Device::Pin(pin) => write!(f, "d{pin}")?,
			Device::Base => write!(f, "db")?,
			Device::Indirect { depth, base } => write!(f, "d{}{base}", "r".repeat(usize::from(depth)))?,
		}
		if let Some(channel) = self.channel {
			write!(f, ":{channel}")?;
		}
		Ok(())
	}
}
