//! Static instruction tables: operand signatures, opcode families and control flow behavior of every IC10
//! instruction, plus the keyword sets that operands are checked against.

use std::fmt::{Display, Formatter};

use ic10sema_derive::{Parse, VariantName};
use num_derive::FromPrimitive;
use phf::{phf_map, phf_set};

use crate::VariantName;

/// Opcode families. The family decides which value kind an instruction produces and which kinds its source operands
/// accept.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, VariantName)]
pub enum Family {
	/// Math and bitwise operations; produce a number.
	Arithmetic,
	/// `s*` set-on-condition operations; produce a number.
	Comparison,
	/// `select`: produces one of two operand values.
	Select,
	/// `move`: transports the source kind.
	Move,
	/// Device, network and reagent loads.
	DeviceLoad,
	/// Stack and device memory reads; always runtime-determined.
	StackRead,
	/// Device and network stores.
	Store,
	/// Stack and device memory writes.
	StackWrite,
	/// Conditional branches.
	Branch,
	/// Unconditional jumps.
	Jump,
	/// Instructions without register effects.
	Misc,
	/// `alias` and `define`.
	Declaration,
}

/// Operand slots of an instruction signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Param {
	/// Destination register, written.
	Destination,
	/// Register that is both read and written.
	ReadWrite,
	/// A register or a constant, read.
	Value,
	/// A device slot.
	Device,
	/// Reference id of a device, as register or constant.
	DeviceId,
	/// Prefab hash selecting devices on the network.
	TypeHash,
	/// Name hash selecting devices on the network.
	NameHash,
	/// A logic type keyword, or a register holding one.
	LogicType,
	/// A slot logic type keyword, or a register holding one.
	SlotLogicType,
	/// A batch mode keyword or number.
	BatchMode,
	/// A reagent mode keyword or number.
	ReagentMode,
	/// A jump target: label, line number, offset or register.
	Target,
	/// The name introduced by `alias`.
	AliasName,
	/// The register or device an alias binds to.
	AliasTarget,
	/// The name introduced by `define`.
	DefineName,
	/// The constant a define binds to.
	DefineValue,
}

impl Param {
	/// Placeholder text used in signatures.
	#[must_use]
	pub const fn placeholder(self) -> &'static str {
		match self {
			Self::Destination | Self::ReadWrite => "r?",
			Self::Value => "a(r?|num)",
			Self::Device => "d?",
			Self::DeviceId => "id(r?|num)",
			Self::TypeHash => "deviceHash",
			Self::NameHash => "nameHash",
			Self::LogicType => "logicType",
			Self::SlotLogicType => "logicSlotType",
			Self::BatchMode => "batchMode",
			Self::ReagentMode => "reagentMode",
			Self::Target => "target(r?|num|label)",
			Self::AliasName | Self::DefineName => "name",
			Self::AliasTarget => "r?|d?",
			Self::DefineValue => "num",
		}
	}

	/// What an operand in this slot has to look like, for operand diagnostics.
	#[must_use]
	pub const fn description(self) -> &'static str {
		match self {
			Self::Destination | Self::ReadWrite => "a register",
			Self::Value => "a register or a number",
			Self::Device => "a device",
			Self::DeviceId | Self::TypeHash | Self::NameHash => "a register or a hash",
			Self::LogicType => "a logic type",
			Self::SlotLogicType => "a slot logic type",
			Self::BatchMode => "a batch mode",
			Self::ReagentMode => "a reagent mode",
			Self::Target => "a label, a number or a register",
			Self::AliasName | Self::DefineName => "a name",
			Self::AliasTarget => "a register or a device",
			Self::DefineValue => "a constant",
		}
	}

	/// Whether a register in this slot is written.
	#[must_use]
	pub const fn is_written(self) -> bool {
		matches!(self, Self::Destination | Self::ReadWrite)
	}
}

/// How an instruction transfers control.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Flow {
	/// Continues with the next line.
	Sequential,
	/// Conditionally jumps, otherwise continues with the next line.
	Branch {
		/// The target is an offset from the current line.
		relative: bool,
		/// The return address is stored in `ra`.
		link:     bool,
	},
	/// Always jumps.
	Jump {
		/// The target is an offset from the current line.
		relative: bool,
		/// The return address is stored in `ra`.
		link:     bool,
	},
	/// Stops execution.
	Halt,
}

impl Flow {
	/// Whether this instruction stores the return address in `ra`.
	#[must_use]
	pub const fn is_link(self) -> bool {
		matches!(self, Self::Branch { link: true, .. } | Self::Jump { link: true, .. })
	}

	/// Whether this instruction ends a basic block.
	#[must_use]
	pub const fn ends_block(self) -> bool {
		!matches!(self, Self::Sequential)
	}
}

/// Static description of one instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InstructionInfo {
	/// Opcode family.
	pub family: Family,
	/// Operand signature.
	pub params: &'static [Param],
	/// Control flow behavior.
	pub flow:   Flow,
}

impl InstructionInfo {
	const fn new(family: Family, params: &'static [Param], flow: Flow) -> Self {
		Self { family, params, flow }
	}

	const fn sequential(family: Family, params: &'static [Param]) -> Self {
		Self::new(family, params, Flow::Sequential)
	}

	const fn branch(params: &'static [Param], relative: bool, link: bool) -> Self {
		Self::new(Family::Branch, params, Flow::Branch { relative, link })
	}

	const fn jump(relative: bool, link: bool) -> Self {
		Self::new(Family::Jump, &[Param::Target], Flow::Jump { relative, link })
	}

	/// The index of the jump target operand, if this instruction transfers control.
	#[must_use]
	pub const fn target_index(&self) -> Option<usize> {
		match self.flow {
			Flow::Branch { .. } | Flow::Jump { .. } => Some(self.params.len() - 1),
			Flow::Sequential | Flow::Halt => None,
		}
	}

	/// Human-readable signature such as `add r? a(r?|num) a(r?|num)`.
	#[must_use]
	pub fn signature(&self, operation: &str) -> String {
		std::iter::once(operation).chain(self.params.iter().map(|param| param.placeholder())).collect::<Vec<_>>().join(" ")
	}
}

impl Display for Family {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.variant_name())
	}
}

use Param::{
	AliasName, AliasTarget, BatchMode as Batch, DefineName, DefineValue, Destination, Device, DeviceId, LogicType as Logic,
	NameHash, ReadWrite, ReagentMode as Reagent, SlotLogicType as SlotLogic, Target, TypeHash, Value,
};

const NULLARY_DEST: &[Param] = &[Destination];
const UNARY: &[Param] = &[Destination, Value];
const BINARY: &[Param] = &[Destination, Value, Value];
const TERNARY: &[Param] = &[Destination, Value, Value, Value];

const ARITHMETIC_1: InstructionInfo = InstructionInfo::sequential(Family::Arithmetic, UNARY);
const ARITHMETIC_2: InstructionInfo = InstructionInfo::sequential(Family::Arithmetic, BINARY);
const ARITHMETIC_3: InstructionInfo = InstructionInfo::sequential(Family::Arithmetic, TERNARY);
const COMPARE_1: InstructionInfo = InstructionInfo::sequential(Family::Comparison, UNARY);
const COMPARE_2: InstructionInfo = InstructionInfo::sequential(Family::Comparison, BINARY);
const COMPARE_3: InstructionInfo = InstructionInfo::sequential(Family::Comparison, TERNARY);
const COMPARE_DEVICE: InstructionInfo = InstructionInfo::sequential(Family::Comparison, &[Destination, Device]);

const BRANCH_1: &[Param] = &[Value, Target];
const BRANCH_2: &[Param] = &[Value, Value, Target];
const BRANCH_3: &[Param] = &[Value, Value, Value, Target];
const BRANCH_DEVICE: &[Param] = &[Device, Target];

/// Every instruction the game accepts.
pub static INSTRUCTIONS: phf::Map<&'static str, InstructionInfo> = phf_map! {
	// Arithmetic and bitwise operations.
	"add" => ARITHMETIC_2,
	"sub" => ARITHMETIC_2,
	"mul" => ARITHMETIC_2,
	"div" => ARITHMETIC_2,
	"mod" => ARITHMETIC_2,
	"max" => ARITHMETIC_2,
	"min" => ARITHMETIC_2,
	"atan2" => ARITHMETIC_2,
	"and" => ARITHMETIC_2,
	"or" => ARITHMETIC_2,
	"xor" => ARITHMETIC_2,
	"nor" => ARITHMETIC_2,
	"sll" => ARITHMETIC_2,
	"srl" => ARITHMETIC_2,
	"sla" => ARITHMETIC_2,
	"sra" => ARITHMETIC_2,
	"abs" => ARITHMETIC_1,
	"ceil" => ARITHMETIC_1,
	"floor" => ARITHMETIC_1,
	"round" => ARITHMETIC_1,
	"trunc" => ARITHMETIC_1,
	"sqrt" => ARITHMETIC_1,
	"exp" => ARITHMETIC_1,
	"log" => ARITHMETIC_1,
	"sin" => ARITHMETIC_1,
	"cos" => ARITHMETIC_1,
	"tan" => ARITHMETIC_1,
	"asin" => ARITHMETIC_1,
	"acos" => ARITHMETIC_1,
	"atan" => ARITHMETIC_1,
	"not" => ARITHMETIC_1,
	"lerp" => ARITHMETIC_3,
	"ext" => ARITHMETIC_3,
	"ins" => InstructionInfo::sequential(Family::Arithmetic, &[ReadWrite, Value, Value, Value]),
	"rand" => InstructionInfo::sequential(Family::Arithmetic, NULLARY_DEST),

	// Set-on-condition.
	"seq" => COMPARE_2,
	"sne" => COMPARE_2,
	"slt" => COMPARE_2,
	"sgt" => COMPARE_2,
	"sle" => COMPARE_2,
	"sge" => COMPARE_2,
	"seqz" => COMPARE_1,
	"snez" => COMPARE_1,
	"sltz" => COMPARE_1,
	"sgtz" => COMPARE_1,
	"slez" => COMPARE_1,
	"sgez" => COMPARE_1,
	"snan" => COMPARE_1,
	"snanz" => COMPARE_1,
	"sap" => COMPARE_3,
	"sna" => COMPARE_3,
	"sapz" => COMPARE_2,
	"snaz" => COMPARE_2,
	"sdse" => COMPARE_DEVICE,
	"sdns" => COMPARE_DEVICE,
	"select" => InstructionInfo::sequential(Family::Select, TERNARY),
	"move" => InstructionInfo::sequential(Family::Move, UNARY),

	// Device and network access.
	"l" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, Device, Logic]),
	"ls" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, Device, Value, SlotLogic]),
	"lr" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, Device, Reagent, Value]),
	"ld" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, DeviceId, Logic]),
	"lb" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, TypeHash, Logic, Batch]),
	"lbn" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, TypeHash, NameHash, Logic, Batch]),
	"lbs" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, TypeHash, Value, SlotLogic, Batch]),
	"lbns" =>
		InstructionInfo::sequential(Family::DeviceLoad, &[Destination, TypeHash, NameHash, Value, SlotLogic, Batch]),
	"rmap" => InstructionInfo::sequential(Family::DeviceLoad, &[Destination, Device, Value]),
	"s" => InstructionInfo::sequential(Family::Store, &[Device, Logic, Value]),
	"ss" => InstructionInfo::sequential(Family::Store, &[Device, Value, SlotLogic, Value]),
	"sd" => InstructionInfo::sequential(Family::Store, &[DeviceId, Logic, Value]),
	"sb" => InstructionInfo::sequential(Family::Store, &[TypeHash, Logic, Value]),
	"sbn" => InstructionInfo::sequential(Family::Store, &[TypeHash, NameHash, Logic, Value]),
	"sbs" => InstructionInfo::sequential(Family::Store, &[TypeHash, Value, SlotLogic, Value]),

	// Stack and device memory.
	"push" => InstructionInfo::sequential(Family::StackWrite, &[Value]),
	"pop" => InstructionInfo::sequential(Family::StackRead, NULLARY_DEST),
	"peek" => InstructionInfo::sequential(Family::StackRead, NULLARY_DEST),
	"poke" => InstructionInfo::sequential(Family::StackWrite, &[Value, Value]),
	"get" => InstructionInfo::sequential(Family::StackRead, &[Destination, Device, Value]),
	"getd" => InstructionInfo::sequential(Family::StackRead, &[Destination, DeviceId, Value]),
	"put" => InstructionInfo::sequential(Family::StackWrite, &[Device, Value, Value]),
	"putd" => InstructionInfo::sequential(Family::StackWrite, &[DeviceId, Value, Value]),
	"clr" => InstructionInfo::sequential(Family::StackWrite, &[Device]),
	"clrd" => InstructionInfo::sequential(Family::StackWrite, &[DeviceId]),

	// Branches.
	"beq" => InstructionInfo::branch(BRANCH_2, false, false),
	"beqal" => InstructionInfo::branch(BRANCH_2, false, true),
	"breq" => InstructionInfo::branch(BRANCH_2, true, false),
	"bne" => InstructionInfo::branch(BRANCH_2, false, false),
	"bneal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brne" => InstructionInfo::branch(BRANCH_2, true, false),
	"blt" => InstructionInfo::branch(BRANCH_2, false, false),
	"bltal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brlt" => InstructionInfo::branch(BRANCH_2, true, false),
	"bgt" => InstructionInfo::branch(BRANCH_2, false, false),
	"bgtal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brgt" => InstructionInfo::branch(BRANCH_2, true, false),
	"ble" => InstructionInfo::branch(BRANCH_2, false, false),
	"bleal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brle" => InstructionInfo::branch(BRANCH_2, true, false),
	"bge" => InstructionInfo::branch(BRANCH_2, false, false),
	"bgeal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brge" => InstructionInfo::branch(BRANCH_2, true, false),
	"bap" => InstructionInfo::branch(BRANCH_3, false, false),
	"bapal" => InstructionInfo::branch(BRANCH_3, false, true),
	"brap" => InstructionInfo::branch(BRANCH_3, true, false),
	"bna" => InstructionInfo::branch(BRANCH_3, false, false),
	"bnaal" => InstructionInfo::branch(BRANCH_3, false, true),
	"brna" => InstructionInfo::branch(BRANCH_3, true, false),
	"beqz" => InstructionInfo::branch(BRANCH_1, false, false),
	"beqzal" => InstructionInfo::branch(BRANCH_1, false, true),
	"breqz" => InstructionInfo::branch(BRANCH_1, true, false),
	"bnez" => InstructionInfo::branch(BRANCH_1, false, false),
	"bnezal" => InstructionInfo::branch(BRANCH_1, false, true),
	"brnez" => InstructionInfo::branch(BRANCH_1, true, false),
	"bltz" => InstructionInfo::branch(BRANCH_1, false, false),
	"bltzal" => InstructionInfo::branch(BRANCH_1, false, true),
	"brltz" => InstructionInfo::branch(BRANCH_1, true, false),
	"bgtz" => InstructionInfo::branch(BRANCH_1, false, false),
	"bgtzal" => InstructionInfo::branch(BRANCH_1, false, true),
	"brgtz" => InstructionInfo::branch(BRANCH_1, true, false),
	"blez" => InstructionInfo::branch(BRANCH_1, false, false),
	"blezal" => InstructionInfo::branch(BRANCH_1, false, true),
	"brlez" => InstructionInfo::branch(BRANCH_1, true, false),
	"bgez" => InstructionInfo::branch(BRANCH_1, false, false),
	"bgezal" => InstructionInfo::branch(BRANCH_1, false, true),
	"brgez" => InstructionInfo::branch(BRANCH_1, true, false),
	"bapz" => InstructionInfo::branch(BRANCH_2, false, false),
	"bapzal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brapz" => InstructionInfo::branch(BRANCH_2, true, false),
	"bnaz" => InstructionInfo::branch(BRANCH_2, false, false),
	"bnazal" => InstructionInfo::branch(BRANCH_2, false, true),
	"brnaz" => InstructionInfo::branch(BRANCH_2, true, false),
	"bdse" => InstructionInfo::branch(BRANCH_DEVICE, false, false),
	"bdseal" => InstructionInfo::branch(BRANCH_DEVICE, false, true),
	"brdse" => InstructionInfo::branch(BRANCH_DEVICE, true, false),
	"bdns" => InstructionInfo::branch(BRANCH_DEVICE, false, false),
	"bdnsal" => InstructionInfo::branch(BRANCH_DEVICE, false, true),
	"brdns" => InstructionInfo::branch(BRANCH_DEVICE, true, false),
	"bnan" => InstructionInfo::branch(BRANCH_1, false, false),
	"brnan" => InstructionInfo::branch(BRANCH_1, true, false),

	// Jumps.
	"j" => InstructionInfo::jump(false, false),
	"jal" => InstructionInfo::jump(false, true),
	"jr" => InstructionInfo::jump(true, false),

	// Miscellaneous.
	"yield" => InstructionInfo::sequential(Family::Misc, &[]),
	"sleep" => InstructionInfo::sequential(Family::Misc, &[Value]),
	"hcf" => InstructionInfo::new(Family::Misc, &[], Flow::Halt),
	"alias" => InstructionInfo::sequential(Family::Declaration, &[AliasName, AliasTarget]),
	"define" => InstructionInfo::sequential(Family::Declaration, &[DefineName, DefineValue]),
};

/// Batch modes for network loads.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Parse, VariantName, FromPrimitive)]
#[repr(u8)]
pub enum BatchMode {
	/// Mean over all matching devices.
	Average = 0,
	/// Sum over all matching devices.
	Sum = 1,
	/// Smallest value.
	Minimum = 2,
	/// Largest value.
	Maximum = 3,
}

/// Reagent modes for `lr`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Parse, VariantName, FromPrimitive)]
#[repr(u8)]
pub enum ReagentMode {
	/// Reagent quantity the device holds.
	Contents = 0,
	/// Quantity the current recipe still requires.
	Required = 1,
	/// Quantity the current recipe uses.
	Recipe = 2,
	/// Total quantity of all reagents.
	TotalContents = 3,
}

/// Logic types readable or writable on devices.
pub static LOGIC_TYPES: phf::Set<&'static str> = phf_set! {
	"None", "Power", "Open", "Mode", "Error", "Pressure", "Temperature", "PressureExternal", "PressureInternal",
	"Activate", "Lock", "Charge", "Setting", "Reagents", "RatioOxygen", "RatioCarbonDioxide", "RatioNitrogen",
	"RatioPollutant", "RatioVolatiles", "RatioWater", "Horizontal", "Vertical", "SolarAngle", "Maximum", "Ratio",
	"PowerPotential", "PowerActual", "Quantity", "On", "ImportQuantity", "ImportSlotOccupant", "ExportQuantity",
	"ExportSlotOccupant", "RequiredPower", "HorizontalRatio", "VerticalRatio", "PowerRequired", "Idle", "Color",
	"ElevatorSpeed", "ElevatorLevel", "RecipeHash", "ExportSlotHash", "ImportSlotHash", "PlantHealth1",
	"PlantHealth2", "PlantHealth3", "PlantHealth4", "PlantGrowth1", "PlantGrowth2", "PlantGrowth3", "PlantGrowth4",
	"PlantEfficiency1", "PlantEfficiency2", "PlantEfficiency3", "PlantEfficiency4", "PlantHash1", "PlantHash2",
	"PlantHash3", "PlantHash4", "RequestHash", "CompletionRatio", "ClearMemory", "ExportCount", "ImportCount",
	"PowerGeneration", "TotalMoles", "Volume", "Plant", "Harvest", "Output", "PressureSetting",
	"TemperatureSetting", "TemperatureExternal", "Filtration", "AirRelease", "PositionX", "PositionY", "PositionZ",
	"VelocityMagnitude", "VelocityRelativeX", "VelocityRelativeY", "VelocityRelativeZ", "RatioNitrousOxide",
	"PrefabHash", "ForceWrite", "SignalStrength", "SignalID", "TargetX", "TargetY", "TargetZ", "SettingInput",
	"SettingOutput", "CurrentResearchPodType", "ManualResearchRequiredPod", "MineablesInVicinity",
	"MineablesInQueue", "NextWeatherEventTime", "Combustion", "Fuel", "ReturnFuelCost", "CollectableGoods", "Time",
	"Bpm", "EnvironmentEfficiency", "WorkingGasEfficiency", "PressureInput", "TemperatureInput", "RatioOxygenInput",
	"RatioCarbonDioxideInput", "RatioNitrogenInput", "RatioPollutantInput", "RatioVolatilesInput",
	"RatioWaterInput", "RatioNitrousOxideInput", "TotalMolesInput", "PressureOutput", "TemperatureOutput",
	"RatioOxygenOutput", "RatioCarbonDioxideOutput", "RatioNitrogenOutput", "RatioPollutantOutput",
	"RatioVolatilesOutput", "RatioWaterOutput", "RatioNitrousOxideOutput", "TotalMolesOutput", "CombustionInput",
	"CombustionOutput", "RatioLiquidNitrogen", "RatioLiquidOxygen", "RatioLiquidVolatiles", "RatioSteam",
	"RatioLiquidCarbonDioxide", "RatioLiquidPollutant", "RatioLiquidNitrousOxide", "RatioHydrogen",
	"RatioLiquidHydrogen", "RatioPollutedWater", "Stress", "ReferenceId", "LineNumber", "StackSize", "NameHash",
	"Flush", "SoundAlert", "Index", "Apex", "Density", "Size", "Progress", "Sleep", "MinWattsToContact",
	"WattsReachingContact", "Channel0", "Channel1", "Channel2", "Channel3", "Channel4", "Channel5", "Channel6",
	"Channel7", "Inclination", "Eccentricity", "Orbit", "Velocity", "Rpm", "Extended", "Thrust", "ThrustToWeight",
	"Weight", "Altitude", "Mass", "Throttle", "Reserve",
};

/// Logic types readable on device slots.
pub static SLOT_LOGIC_TYPES: phf::Set<&'static str> = phf_set! {
	"None", "Occupied", "OccupantHash", "Quantity", "Damage", "Efficiency", "Health", "Growth", "Pressure",
	"Temperature", "Charge", "ChargeRatio", "Class", "PressureWaste", "PressureAir", "MaxQuantity", "Mature",
	"PrefabHash", "Seeding", "LineNumber", "Volume", "Open", "On", "Lock", "SortingClass", "FilterType",
	"ReferenceId",
};

/// Logic types whose value identifies a device or prefab.
pub static DEVICE_LIKE_LOGIC_TYPES: phf::Set<&'static str> = phf_set! {
	"ReferenceId", "PrefabHash", "OccupantHash",
};

/// Named numeric constants.
pub static CONSTANTS: phf::Map<&'static str, f64> = phf_map! {
	"nan" => f64::NAN,
	"pinf" => f64::INFINITY,
	"ninf" => f64::NEG_INFINITY,
	"pi" => std::f64::consts::PI,
	"deg2rad" => std::f64::consts::PI / 180.0,
	"rad2deg" => 180.0 / std::f64::consts::PI,
	"epsilon" => f64::EPSILON,
	"rgas" => 8.314_462_618_153_24,
};

/// Colors accepted as `Color.Name` constants.
pub static COLORS: phf::Map<&'static str, u8> = phf_map! {
	"Blue" => 0,
	"Gray" => 1,
	"Green" => 2,
	"Orange" => 3,
	"Red" => 4,
	"Yellow" => 5,
	"White" => 6,
	"Black" => 7,
	"Brown" => 8,
	"Khaki" => 9,
	"Pink" => 10,
	"Purple" => 11,
};

/// Returns the instruction name closest to a misspelled operation, if any is close enough to suggest.
#[must_use]
pub fn suggest_instruction(operation: &str) -> Option<&'static str> {
	let lowercase = operation.to_ascii_lowercase();
	if INSTRUCTIONS.contains_key(lowercase.as_str()) {
		return INSTRUCTIONS.get_key(lowercase.as_str()).copied();
	}
	INSTRUCTIONS
		.keys()
		.map(|candidate| (crate::devices::levenshtein(&lowercase, candidate), *candidate))
		.filter(|(distance, _)| *distance <= 2)
		.min()
		.map(|(_, candidate)| candidate)
}
