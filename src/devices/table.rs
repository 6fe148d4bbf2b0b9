//! Compiled-in device table: prefab names, display names and their hashes.

use phf::phf_map;

/// Canonical prefab name to display name and prefab hash.
pub static PREFAB_TO_DEVICE: phf::Map<&'static str, (&'static str, i32)> = phf_map! {
	"StructureVolumePump" => ("Volume Pump", -321403609),
	"StructureActiveVent" => ("Active Vent", -1129453144),
	"StructurePassiveVent" => ("Passive Vent", 335498166),
	"StructureGasSensor" => ("Gas Sensor", -1252983604),
	"StructureDaylightSensor" => ("Daylight Sensor", 1076425094),
	"StructureSolarPanel" => ("Solar Panel", -2045627372),
	"StructureSolarPanelDual" => ("Solar Panel (Dual)", -539224550),
	"StructureBattery" => ("Station Battery", -400115994),
	"StructureBatteryLarge" => ("Station Battery (Large)", -1388288459),
	"StructureWallLight" => ("Wall Light", -1860064656),
	"StructureWallHeater" => ("Wall Heater", 24258244),
	"StructureWallCooler" => ("Wall Cooler", -739292323),
	"StructureFurnace" => ("Furnace", 1947944864),
	"StructureAdvancedFurnace" => ("Advanced Furnace", 545937711),
	"StructureArcFurnace" => ("Arc Furnace", -247344692),
	"StructureCentrifuge" => ("Centrifuge", 690945935),
	"StructureFiltration" => ("Filtration", -348054045),
	"StructureAirConditioner" => ("Air Conditioner", -2087593337),
	"StructureGrowLight" => ("Grow Light", -1758710260),
	"StructureHydroponicsTray" => ("Hydroponics Tray", 1464854517),
	"StructureLogicMemory" => ("Logic Memory", -851746783),
	"StructureLogicSwitch" => ("Lever", 1220484876),
	"StructureLogicButton" => ("Button", 491845673),
	"StructureConsole" => ("Console", 235638270),
	"StructureConsoleLED5" => ("LED Display (Small)", -815193061),
	"StructureLEDDisplay" => ("LED Display", -39916701),
	"StructureTransformer" => ("Transformer (Large)", -1423212473),
	"StructureTransformerSmall" => ("Transformer (Small)", -890946730),
	"StructureAreaPowerControl" => ("Area Power Control", 1999523701),
	"StructureGasTankStorage" => ("Gas Tank Storage", 1632165346),
	"StructurePipeAnalysizer" => ("Pipe Analyzer", 435685051),
	"StructureTurboVolumePump" => ("Turbo Volume Pump", 1310794736),
	"StructurePressureRegulator" => ("Pressure Regulator", 209854039),
	"StructureBackPressureRegulator" => ("Back Pressure Regulator", -1149857558),
	"StructureDigitalValve" => ("Digital Valve", -1280984102),
	"StructureLiquidVolumePump" => ("Liquid Volume Pump", -454028979),
	"StructureMotionSensor" => ("Motion Sensor", -1713470563),
	"StructureOccupancySensor" => ("Occupancy Sensor", 322782515),
	"StructureCompositeDoor" => ("Composite Door", -793837322),
	"StructureAirlock" => ("Airlock", -2105052344),
	"StructureBlastDoor" => ("Blast Door", 337416191),
	"StructureStirlingEngine" => ("Stirling Engine", -260316435),
	"StructureSolidFuelGenerator" => ("Generator (Solid Fuel)", 813146305),
	"StructureGasGenerator" => ("Gas Fuel Generator", 1165997963),
	"StructureCircuitHousing" => ("IC Housing", -128473777),
	"StructureSorter" => ("Sorter", -1009150565),
	"StructureStacker" => ("Stacker", -2020231820),
	"StructureVendingMachine" => ("Vending Machine", -443130773),
	"StructureAutolathe" => ("Autolathe", 336213101),
	"StructureElectronicsPrinter" => ("Electronics Printer", 1307165496),
	"StructureHydraulicPipeBender" => ("Hydraulic Pipe Bender", -1888248335),
	"StructureRecycler" => ("Recycler", -1633947337),
	"StructureTankSmall" => ("Small Tank", 1013514688),
	"StructureTankBig" => ("Large Tank", -1606848156),
	"StructureEmergencyHeater" => ("Emergency Heater", 723531460),
	"StructureLightLong" => ("Wall Light (Long)", 797794350),
	"StructureSpeaker" => ("Speaker", 1133353257),
	"StructureKlaxon" => ("Klaxon Speaker", -828056979),
	"StructureFlashingLight" => ("Flashing Light", -1535893860),
	"StructureDiode" => ("LED", 1944485013),
	"StructureTraderWaypoint" => ("Trader Waypoint", 1570931620),
	"StructureSatelliteDish" => ("Medium Satellite Dish", 439026183),
	"ItemKitVolumePump" => ("Kit (Volume Pump)", -410032764),
	"ItemKitSolarPanel" => ("Kit (Solar Panel)", -1924492105),
	"ItemIntegratedCircuit10" => ("Integrated Circuit (IC10)", -744098481),
};

/// Prefab hash to canonical prefab name.
pub static HASH_TO_PREFAB: phf::Map<i32, &'static str> = phf_map! {
	-321403609i32 => "StructureVolumePump",
	-1129453144i32 => "StructureActiveVent",
	335498166i32 => "StructurePassiveVent",
	-1252983604i32 => "StructureGasSensor",
	1076425094i32 => "StructureDaylightSensor",
	-2045627372i32 => "StructureSolarPanel",
	-539224550i32 => "StructureSolarPanelDual",
	-400115994i32 => "StructureBattery",
	-1388288459i32 => "StructureBatteryLarge",
	-1860064656i32 => "StructureWallLight",
	24258244i32 => "StructureWallHeater",
	-739292323i32 => "StructureWallCooler",
	1947944864i32 => "StructureFurnace",
	545937711i32 => "StructureAdvancedFurnace",
	-247344692i32 => "StructureArcFurnace",
	690945935i32 => "StructureCentrifuge",
	-348054045i32 => "StructureFiltration",
	-2087593337i32 => "StructureAirConditioner",
	-1758710260i32 => "StructureGrowLight",
	1464854517i32 => "StructureHydroponicsTray",
	-851746783i32 => "StructureLogicMemory",
	1220484876i32 => "StructureLogicSwitch",
	491845673i32 => "StructureLogicButton",
	235638270i32 => "StructureConsole",
	-815193061i32 => "StructureConsoleLED5",
	-39916701i32 => "StructureLEDDisplay",
	-1423212473i32 => "StructureTransformer",
	-890946730i32 => "StructureTransformerSmall",
	1999523701i32 => "StructureAreaPowerControl",
	1632165346i32 => "StructureGasTankStorage",
	435685051i32 => "StructurePipeAnalysizer",
	1310794736i32 => "StructureTurboVolumePump",
	209854039i32 => "StructurePressureRegulator",
	-1149857558i32 => "StructureBackPressureRegulator",
	-1280984102i32 => "StructureDigitalValve",
	-454028979i32 => "StructureLiquidVolumePump",
	-1713470563i32 => "StructureMotionSensor",
	322782515i32 => "StructureOccupancySensor",
	-793837322i32 => "StructureCompositeDoor",
	-2105052344i32 => "StructureAirlock",
	337416191i32 => "StructureBlastDoor",
	-260316435i32 => "StructureStirlingEngine",
	813146305i32 => "StructureSolidFuelGenerator",
	1165997963i32 => "StructureGasGenerator",
	-128473777i32 => "StructureCircuitHousing",
	-1009150565i32 => "StructureSorter",
	-2020231820i32 => "StructureStacker",
	-443130773i32 => "StructureVendingMachine",
	336213101i32 => "StructureAutolathe",
	1307165496i32 => "StructureElectronicsPrinter",
	-1888248335i32 => "StructureHydraulicPipeBender",
	-1633947337i32 => "StructureRecycler",
	1013514688i32 => "StructureTankSmall",
	-1606848156i32 => "StructureTankBig",
	723531460i32 => "StructureEmergencyHeater",
	797794350i32 => "StructureLightLong",
	1133353257i32 => "StructureSpeaker",
	-828056979i32 => "StructureKlaxon",
	-1535893860i32 => "StructureFlashingLight",
	1944485013i32 => "StructureDiode",
	1570931620i32 => "StructureTraderWaypoint",
	439026183i32 => "StructureSatelliteDish",
	-410032764i32 => "ItemKitVolumePump",
	-1924492105i32 => "ItemKitSolarPanel",
	-744098481i32 => "ItemIntegratedCircuit10",
};
