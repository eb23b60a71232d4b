//! Clicking and ticking noise diagnosis

use crate::domain::DomainDefinition;
use crate::network::{CptSpec, NetworkDefinition};
use crate::rules::Rule;

pub const ID: &str = "noises";

pub fn definition() -> DomainDefinition {
    DomainDefinition {
        id: ID.to_string(),
        title: "Strange noises".to_string(),
        description: "Clunks, clicks and ticking noises while driving or idling.".to_string(),
        rules: rules(),
        network: network(),
    }
}

const COLD_QUESTION: &str = "Does the ticking noise only happen when the engine is cold? (yes/no)";

fn rules() -> Vec<Rule> {
    vec![
        Rule::ask(
            "ask_clunk_or_single_tick",
            "clunk_or_single_tick",
            "Can you describe the noise? Does it sound like a loud clunk or a single ticking noise? \
             This information will help us narrow down the potential issue.",
        ),
        Rule::ask(
            "ask_noise_on_bumps",
            "noise_on_bumps",
            "Have you noticed if the noise occurs only when driving over bumps or uneven surfaces? \
             For example, does it happen when the car experiences vertical motion?",
        )
        .yes("clunk_or_single_tick"),
        Rule::finalize(
            "check_suspension",
            "The noise might be related to the suspension system. Inspect the struts, shocks, springs, \
             and frame welds for damage or wear.",
        )
        .yes("clunk_or_single_tick")
        .yes("noise_on_bumps"),
        Rule::finalize(
            "check_components",
            "The noise might involve components like ball joints, brakes (pads and rotors), \
             rack and pinion, tie rod ends, or motor mounts. Check these parts carefully.",
        )
        .yes("clunk_or_single_tick")
        .no("noise_on_bumps"),
        Rule::ask(
            "ask_ticks_when_moving",
            "ticks_when_moving",
            "Does the noise occur only when the vehicle is in motion, or does it also happen when stationary? \
             This distinction will help pinpoint the source.",
        )
        .no("clunk_or_single_tick"),
        // Ticking while moving
        Rule::ask(
            "ask_ticks_in_neutral",
            "ticks_in_neutral",
            "Does the ticking noise occur when the car is rolling in neutral? \
             This will help us determine if the issue is related to the drivetrain or the engine. (yes/no)",
        )
        .no("clunk_or_single_tick")
        .yes("ticks_when_moving"),
        Rule::ask(
            "ask_ticks_in_reverse",
            "ticks_in_reverse",
            "Does the ticking noise occur only when the car is in reverse? \
             This could indicate a problem with the transmission or related components. (yes/no)",
        )
        .yes("ticks_when_moving")
        .no("ticks_in_neutral"),
        Rule::finalize(
            "check_brake_adjuster",
            "The issue might be caused by a rear brake adjuster. Ensure the parking brake is fully released, \
             and inspect for any signs of improper adjustment.",
        )
        .no("ticks_in_neutral")
        .yes("ticks_in_reverse"),
        Rule::finalize(
            "check_transmission",
            "The noise might be coming from the transmission. Check the transmission fluid and filter for \
             any irregularities or contamination.",
        )
        .no("ticks_in_neutral")
        .no("ticks_in_reverse"),
        Rule::ask(
            "ask_frequency_changes",
            "frequency_changes",
            "Does the frequency of the ticking noise decrease or change when shifting gears? \
             This will help identify if the issue is related to the transmission or engine timing. (yes/no)",
        )
        .yes("ticks_when_moving")
        .yes("ticks_in_neutral"),
        Rule::ask(
            "ask_ticks_in_turns",
            "ticks_in_turns",
            "Does the ticking noise occur only when taking turns or sharp curves? \
             This could indicate an issue with the CV joint or related components. (yes/no)",
        )
        .yes("ticks_in_neutral")
        .no("frequency_changes"),
        Rule::finalize(
            "check_cv_joint",
            "The CV joint might be failing. Oversized tires rubbing against the wheel well could also be the cause.",
        )
        .no("frequency_changes")
        .yes("ticks_in_turns"),
        Rule::ask(
            "ask_changed_tires",
            "changed_tires",
            "Have you recently changed the tires? \
             This could help identify whether the sound is related to improper tire installation. (yes/no)",
        )
        .no("frequency_changes")
        .no("ticks_in_turns"),
        Rule::finalize(
            "check_wheel_lugs",
            "Stop driving immediately! Ensure that the wheel lugs are tightened properly.",
        )
        .no("ticks_in_turns")
        .yes("changed_tires"),
        Rule::ask(
            "ask_removed_hubcaps",
            "removed_hubcaps",
            "Have you removed the hubcaps recently? \
             This helps identify if the sound is related to loose or misaligned hubcaps. (yes/no)",
        )
        .no("ticks_in_turns")
        .no("changed_tires"),
        Rule::finalize(
            "remove_hubcaps",
            "Before proceeding, remove the hubcaps. Loose wire retainers or trapped pebbles may be causing the ticking noise.",
        )
        .no("changed_tires")
        .no("removed_hubcaps"),
        Rule::ask(
            "ask_inspect_treads",
            "inspect_treads",
            "Have you inspected the tire treads for embedded objects like nails or stones? \
             This could explain the noise. (yes/no)",
        )
        .no("changed_tires")
        .yes("removed_hubcaps"),
        Rule::finalize(
            "check_nails_stones",
            "Inspect the tire treads for nails, stones, or other debris embedded in the rubber.",
        )
        .yes("removed_hubcaps")
        .no("inspect_treads"),
        Rule::ask(
            "ask_ticks_slow_speed",
            "ticks_slow_speed",
            "Does the ticking noise occur only at slow speeds? \
             This helps narrow down potential issues with the wheels or axles. (yes/no)",
        )
        .yes("removed_hubcaps")
        .yes("inspect_treads"),
        Rule::finalize(
            "check_wheel_covers",
            "Check the bolted wheel covers or hub protectors for loose parts or pebbles trapped inside.",
        )
        .yes("inspect_treads")
        .yes("ticks_slow_speed"),
        Rule::finalize(
            "check_brake_pads",
            "The noise could be caused by brake pads ticking on a warped rotor. Also, inspect the axles for signs of rubbing.",
        )
        .yes("inspect_treads")
        .no("ticks_slow_speed"),
        // Engine-side ticking: reached when stationary, or when the pitch follows gear changes
        Rule::ask("ask_ticks_when_cold_stationary", "ticks_when_cold", COLD_QUESTION)
            .no("clunk_or_single_tick")
            .no("ticks_when_moving"),
        Rule::ask("ask_ticks_when_cold_after_shift", "ticks_when_cold", COLD_QUESTION)
            .yes("ticks_in_neutral")
            .yes("frequency_changes"),
        Rule::finalize(
            "check_exhaust",
            "The noise might be caused by an exhaust system issue. Inspect the exhaust pipe near the catalytic \
             converter for leaks and listen for any rattling noises near the valve cover.",
        )
        .no("clunk_or_single_tick")
        .yes("ticks_when_cold"),
        Rule::ask(
            "ask_windshield_wipers_radio",
            "windshield_wipers_radio",
            "Are the windshield wipers and radio turned off while you're hearing the noise? \
             This helps rule out external distractions causing the sound. (yes/no)",
        )
        .no("clunk_or_single_tick")
        .no("ticks_when_cold"),
        Rule::finalize(
            "check_silly_stuff",
            "Always check for unusual causes, such as passengers tapping on the roof or random objects causing noise.",
        )
        .no("ticks_when_cold")
        .no("windshield_wipers_radio"),
        Rule::finalize(
            "final_checks",
            "Inspect for pulley wobble or belt wear. Check for exhaust manifold leaks. \
             If the sound persists, get someone with better hearing to help localize the source on the engine.",
        )
        .no("ticks_when_cold")
        .yes("windshield_wipers_radio"),
    ]
}

fn network() -> NetworkDefinition {
    NetworkDefinition::new()
        .category("Suspension_issues", "Suspension issues")
        .category("Brake_and_wheel_problems", "Brake and wheel problems")
        .category("Transmission_or_drivetrain", "Transmission or drivetrain")
        .category("Exhaust_or_engine_noises", "Exhaust or engine noises")
        .category("CV_joint_or_alignment", "CV joint or alignment")
        .cpt(CptSpec::prior("Suspension_issues", 0.85, 0.15))
        .cpt(CptSpec::prior("Brake_and_wheel_problems", 0.80, 0.20))
        .cpt(CptSpec::prior("Transmission_or_drivetrain", 0.90, 0.10))
        .cpt(CptSpec::prior("Exhaust_or_engine_noises", 0.85, 0.15))
        .cpt(CptSpec::prior("CV_joint_or_alignment", 0.88, 0.12))
        .symptom("clunk_or_single_tick")
        .edge("Suspension_issues", "clunk_or_single_tick")
        .edge("Brake_and_wheel_problems", "clunk_or_single_tick")
        .cpt(CptSpec::conditional(
            "clunk_or_single_tick",
            &["Suspension_issues", "Brake_and_wheel_problems"],
            &[0.95, 0.40, 0.30, 0.05],
            &[0.05, 0.60, 0.70, 0.95],
        ))
        .symptom("ticks_when_moving")
        .edge("Brake_and_wheel_problems", "ticks_when_moving")
        .edge("Transmission_or_drivetrain", "ticks_when_moving")
        .edge("CV_joint_or_alignment", "ticks_when_moving")
        .cpt(CptSpec::conditional(
            "ticks_when_moving",
            &[
                "Brake_and_wheel_problems",
                "Transmission_or_drivetrain",
                "CV_joint_or_alignment",
            ],
            &[0.95, 0.30, 0.20, 0.10, 0.30, 0.15, 0.05, 0.01],
            &[0.05, 0.70, 0.80, 0.90, 0.70, 0.85, 0.95, 0.99],
        ))
        .single_parent_symptom("noise_on_bumps", "Suspension_issues", [0.90, 0.10], [0.15, 0.85])
        .single_parent_symptom("ticks_in_neutral", "Transmission_or_drivetrain", [0.90, 0.10], [0.20, 0.80])
        .single_parent_symptom("ticks_in_reverse", "Brake_and_wheel_problems", [0.95, 0.05], [0.30, 0.70])
        .single_parent_symptom("frequency_changes", "Transmission_or_drivetrain", [0.85, 0.15], [0.25, 0.75])
        .single_parent_symptom("ticks_when_cold", "Exhaust_or_engine_noises", [0.90, 0.10], [0.20, 0.80])
        .single_parent_symptom("windshield_wipers_radio", "Exhaust_or_engine_noises", [0.80, 0.20], [0.30, 0.70])
        .single_parent_symptom("ticks_in_turns", "CV_joint_or_alignment", [0.95, 0.05], [0.15, 0.85])
        .single_parent_symptom("changed_tires", "Brake_and_wheel_problems", [0.90, 0.10], [0.60, 0.40])
        .single_parent_symptom("removed_hubcaps", "Brake_and_wheel_problems", [0.95, 0.05], [0.70, 0.30])
        .single_parent_symptom("inspect_treads", "Brake_and_wheel_problems", [0.80, 0.20], [0.30, 0.70])
        .single_parent_symptom("ticks_slow_speed", "Brake_and_wheel_problems", [0.90, 0.10], [0.20, 0.80])
}
