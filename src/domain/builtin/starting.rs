//! Engine starting diagnosis
//!
//! The ignition category depends on the battery category, so scoring a
//! battery symptom also moves the ignition posterior.

use crate::domain::DomainDefinition;
use crate::network::{CptSpec, NetworkDefinition};
use crate::rules::Rule;

pub const ID: &str = "starting";

pub fn definition() -> DomainDefinition {
    DomainDefinition {
        id: ID.to_string(),
        title: "Starting problems".to_string(),
        description: "Engine does not crank, does not fire, or starts and stalls.".to_string(),
        rules: rules(),
        network: network(),
    }
}

fn rules() -> Vec<Rule> {
    vec![
        Rule::ask(
            "ask_starter_cranks",
            "starter_cranks",
            "When you turn the key or press the start button, does the starter crank the engine? \
             Answer 'yes' if you hear the engine turning over, or 'no' if it remains silent.",
        ),
        // Starter does not crank
        Rule::ask(
            "ask_starter_spins",
            "starter_spins",
            "Does the starter motor spin but fail to engage with the engine? \
             This would sound like a whirring noise.",
        )
        .no("starter_cranks"),
        Rule::finalize(
            "solenoid_or_flywheel",
            "The starter solenoid might be stuck or not receiving power. \
             Inspect the flywheel for any missing teeth that could prevent engagement.",
        )
        .no("starter_cranks")
        .yes("starter_spins"),
        Rule::ask(
            "ask_battery_voltage",
            "battery_voltage",
            "Does the battery voltage read above 12 volts? \
             Use a multimeter to measure it, or check for indications of a weak battery (dim lights, etc.).",
        )
        .no("starter_cranks")
        .no("starter_spins"),
        Rule::finalize(
            "battery_discharged",
            "The battery might be discharged. Try jump-starting the car or replace the battery if needed. \
             Also, ensure the battery is charging correctly when the engine runs.",
        )
        .no("starter_spins")
        .no("battery_voltage"),
        Rule::ask(
            "ask_cleaned_terminals",
            "cleaned_terminals",
            "Are the battery terminals and cable connections clean and free of corrosion? \
             Check for white or green buildup that can interfere with electrical flow.",
        )
        .no("starter_spins")
        .yes("battery_voltage"),
        Rule::finalize(
            "terminals_corroded",
            "The battery terminals and ground connectors might be corroded. \
             Clean them thoroughly to restore proper electrical contact.",
        )
        .yes("battery_voltage")
        .no("cleaned_terminals"),
        Rule::finalize(
            "test_starter",
            "Test the starter by bypassing it directly in neutral or park. \
             If the starter doesn't engage or crank the engine, it may need to be replaced.",
        )
        .yes("battery_voltage")
        .yes("cleaned_terminals"),
        // Cranks but does not fire
        Rule::ask(
            "ask_engine_fires",
            "engine_fires",
            "Does the engine attempt to fire or start after the starter cranks the engine? \
             For example, do you hear the engine catching or struggling to start?",
        )
        .yes("starter_cranks"),
        Rule::ask(
            "ask_spark_to_plugs",
            "spark_to_plugs",
            "Is there a spark reaching the spark plugs? \
             This can be checked using a spark tester or by observing the plugs.",
        )
        .yes("starter_cranks")
        .no("engine_fires"),
        Rule::ask(
            "ask_spark_from_coil",
            "spark_from_coil",
            "Is there a spark coming from the ignition coil? \
             You can test this with an inline spark tester connected to the coil.",
        )
        .no("engine_fires")
        .no("spark_to_plugs"),
        Rule::ask(
            "ask_coil_primary_voltage",
            "coil_primary_voltage",
            "Is there 12 volts or more at the coil's primary terminal? \
             Use a multimeter to check the voltage while the ignition is on.",
        )
        .no("spark_to_plugs")
        .no("spark_from_coil"),
        Rule::finalize(
            "ignition_wiring",
            "Inspect the ignition wiring for damage or disconnections. \
             Check the voltage regulator to ensure it is providing the correct output.",
        )
        .no("spark_from_coil")
        .no("coil_primary_voltage"),
        Rule::finalize(
            "ignition_coil",
            "Test the ignition coil for shorts or internal damage. \
             Measure the resistance of the secondary output wire to ensure proper operation.",
        )
        .no("spark_from_coil")
        .yes("coil_primary_voltage"),
        Rule::ask(
            "ask_mechanical_distributor",
            "mechanical_distributor",
            "Is the vehicle equipped with a mechanical distributor? \
             Mechanical distributors have points and condensers.",
        )
        .no("spark_to_plugs")
        .yes("spark_from_coil"),
        Rule::finalize(
            "distributor_points",
            "Inspect the distributor points, condenser, rotor, and cap for signs of wear or damage. \
             Replace any faulty components.",
        )
        .yes("spark_from_coil")
        .yes("mechanical_distributor"),
        Rule::finalize(
            "electronic_distributor",
            "Refer to the vehicle's service manual for specific diagnostic procedures \
             related to the electronic distributor.",
        )
        .yes("spark_from_coil")
        .no("mechanical_distributor"),
        Rule::ask(
            "ask_fuel_to_filter",
            "fuel_to_filter",
            "Is fuel reaching the fuel filter? \
             Inspect the fuel line leading to the filter for any blockages or issues.",
        )
        .no("engine_fires")
        .yes("spark_to_plugs"),
        Rule::finalize(
            "fuel_pump_or_lines",
            "Inspect the fuel pump, fuel filter, and fuel lines for blockages, leaks, or malfunctions. \
             A failed fuel pump or clogged filter could prevent fuel from reaching the engine.",
        )
        .yes("spark_to_plugs")
        .no("fuel_to_filter"),
        Rule::ask(
            "ask_fuel_to_injector",
            "fuel_to_injector",
            "Is fuel reaching the fuel injector? \
             This can be checked by inspecting the injector lines or using a pressure tester.",
        )
        .yes("spark_to_plugs")
        .yes("fuel_to_filter"),
        Rule::finalize(
            "starter_spray",
            "Try using starter spray in the carburetor, throttle body, or intake manifold. \
             This may help identify whether the issue is fuel delivery-related.",
        )
        .yes("fuel_to_filter")
        .no("fuel_to_injector"),
        Rule::finalize(
            "throttle_body",
            "For single-point injection systems, check the throttle body for clogs or malfunctions. \
             For electronic multi-point injection systems, consider a specialized diagnostic.",
        )
        .yes("fuel_to_filter")
        .yes("fuel_to_injector"),
        // Fires, possibly stalls
        Rule::ask(
            "ask_starts_and_stalls",
            "starts_and_stalls",
            "Does the engine start but then stall after a short period? \
             This might indicate an issue with the fuel system or ignition timing.",
        )
        .yes("starter_cranks")
        .yes("engine_fires"),
        Rule::finalize(
            "timing_and_fuel_pressure",
            "Inspect the ignition timing, fuel system, and battery. Ensure the fuel pressure is adequate, \
             and verify that the ignition components are functioning properly.",
        )
        .yes("engine_fires")
        .no("starts_and_stalls"),
        Rule::ask(
            "ask_obd_codes",
            "obd_codes",
            "Are On-Board Diagnostics (OBD) or blink codes available for troubleshooting? \
             This requires a diagnostic scanner or observing flashing lights on the dash.",
        )
        .yes("engine_fires")
        .yes("starts_and_stalls"),
        Rule::finalize(
            "read_obd_codes",
            "Use an OBD reader or interpret the blink codes to pinpoint the issue. \
             These codes can guide you to the specific malfunction.",
        )
        .yes("starts_and_stalls")
        .no("obd_codes"),
        Rule::ask(
            "ask_stalls_on_key_release",
            "stalls_on_key_release",
            "Does the engine stall when you release the key after starting? \
             This could indicate an issue with the ignition switch or related wiring.",
        )
        .yes("starts_and_stalls")
        .yes("obd_codes"),
        Rule::finalize(
            "ignition_switch",
            "Inspect the ignition circuit and key switch for faults. \
             This may include worn-out contacts, loose connections, or a faulty switch mechanism.",
        )
        .yes("obd_codes")
        .yes("stalls_on_key_release"),
        Rule::ask(
            "ask_stalls_in_rain",
            "stalls_in_rain",
            "Does the vehicle stall during rainy or wet conditions? \
             This could indicate issues with moisture affecting electrical components.",
        )
        .yes("obd_codes")
        .no("stalls_on_key_release"),
        Rule::finalize(
            "moisture_in_ignition",
            "Inspect the ignition coils and distributor for cracks or moisture. \
             Look for visible electrical arcs that may indicate short circuits. Dry and reseal if needed.",
        )
        .no("stalls_on_key_release")
        .yes("stalls_in_rain"),
        Rule::ask(
            "ask_stalls_when_warm",
            "stalls_when_warm",
            "Does the vehicle stall when the engine is warm or after running for a while? \
             This could indicate issues with the fuel system or idle settings.",
        )
        .no("stalls_on_key_release")
        .no("stalls_in_rain"),
        Rule::finalize(
            "idle_and_vacuum",
            "Adjust the idle speed, clean the fuel filters, and inspect for vacuum leaks. \
             Warm stalling could also indicate issues with the throttle body or a failing fuel pump.",
        )
        .no("stalls_in_rain")
        .yes("stalls_when_warm"),
        Rule::ask(
            "ask_stalls_when_cold",
            "stalls_when_cold",
            "Does the vehicle stall when the engine is cold or during cold starts? \
             This could be related to the choke system or air-fuel mixture.",
        )
        .no("stalls_in_rain")
        .no("stalls_when_warm"),
        Rule::finalize(
            "choke_and_egr",
            "Inspect the choke system and Exhaust Gas Recirculation (EGR) system for proper operation. \
             Check for vacuum leaks and ensure that the air intake system is free of obstructions.",
        )
        .no("stalls_when_warm")
        .yes("stalls_when_cold"),
        Rule::finalize(
            "no_stall_pattern",
            "No stalling pattern matched. Review the stored diagnostic codes and inspect the \
             engine sensors they point to.",
        )
        .no("stalls_when_warm")
        .no("stalls_when_cold"),
    ]
}

fn network() -> NetworkDefinition {
    NetworkDefinition::new()
        .category("StarterSystem", "Starter system")
        .category("BatterySystem", "Battery system")
        .category("FuelSystem", "Fuel system")
        .category("IgnitionSystem", "Ignition system")
        .category("SensorSystem", "Sensor system")
        .cpt(CptSpec::prior("StarterSystem", 0.75, 0.25))
        .cpt(CptSpec::prior("BatterySystem", 0.85, 0.15))
        .cpt(CptSpec::prior("FuelSystem", 0.90, 0.10))
        .edge("BatterySystem", "IgnitionSystem")
        .cpt(CptSpec::conditional(
            "IgnitionSystem",
            &["BatterySystem"],
            &[0.90, 0.30],
            &[0.10, 0.70],
        ))
        .cpt(CptSpec::prior("SensorSystem", 0.95, 0.05))
        .symptom("starter_cranks")
        .edge("StarterSystem", "starter_cranks")
        .edge("BatterySystem", "starter_cranks")
        .cpt(CptSpec::conditional(
            "starter_cranks",
            &["StarterSystem", "BatterySystem"],
            &[0.99, 0.70, 0.80, 0.10],
            &[0.01, 0.30, 0.20, 0.90],
        ))
        .symptom("engine_fires")
        .edge("FuelSystem", "engine_fires")
        .edge("IgnitionSystem", "engine_fires")
        .cpt(CptSpec::conditional(
            "engine_fires",
            &["FuelSystem", "IgnitionSystem"],
            &[0.95, 0.25, 0.30, 0.10],
            &[0.05, 0.75, 0.70, 0.90],
        ))
        .single_parent_symptom("starter_spins", "StarterSystem", [0.95, 0.05], [0.20, 0.80])
        .single_parent_symptom("battery_voltage", "BatterySystem", [0.98, 0.02], [0.30, 0.70])
        .single_parent_symptom("cleaned_terminals", "BatterySystem", [0.90, 0.10], [0.40, 0.60])
        .single_parent_symptom("fuel_to_filter", "FuelSystem", [0.95, 0.05], [0.50, 0.50])
        .single_parent_symptom("fuel_to_injector", "FuelSystem", [0.90, 0.10], [0.40, 0.60])
        .single_parent_symptom("starts_and_stalls", "FuelSystem", [0.80, 0.20], [0.20, 0.80])
        .single_parent_symptom("spark_to_plugs", "IgnitionSystem", [0.90, 0.10], [0.30, 0.70])
        .single_parent_symptom("spark_from_coil", "IgnitionSystem", [0.85, 0.15], [0.25, 0.75])
        .single_parent_symptom("coil_primary_voltage", "IgnitionSystem", [0.80, 0.20], [0.20, 0.80])
        .single_parent_symptom("mechanical_distributor", "IgnitionSystem", [0.75, 0.25], [0.15, 0.85])
        .single_parent_symptom("obd_codes", "SensorSystem", [0.95, 0.05], [0.50, 0.50])
        .single_parent_symptom("stalls_on_key_release", "SensorSystem", [0.90, 0.10], [0.40, 0.60])
        .single_parent_symptom("stalls_in_rain", "SensorSystem", [0.85, 0.15], [0.50, 0.50])
        .single_parent_symptom("stalls_when_warm", "SensorSystem", [0.80, 0.20], [0.55, 0.45])
        .single_parent_symptom("stalls_when_cold", "SensorSystem", [0.80, 0.20], [0.55, 0.45])
}
