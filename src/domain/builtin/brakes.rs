//! Brake system diagnosis

use crate::domain::DomainDefinition;
use crate::network::{CptSpec, NetworkDefinition};
use crate::rules::Rule;

pub const ID: &str = "brakes";

pub fn definition() -> DomainDefinition {
    DomainDefinition {
        id: ID.to_string(),
        title: "Brake system".to_string(),
        description: "Stopping power, parking brake, drag, noise and pull problems.".to_string(),
        rules: rules(),
        network: network(),
    }
}

fn rules() -> Vec<Rule> {
    vec![
        Rule::ask("ask_brakes_stop_car", "brakes_stop_car", "Do the brakes stop the car?"),
        // Brakes do not stop the car
        Rule::ask("ask_pedal_to_floor", "pedal_to_floor", "Does the pedal go to floor?")
            .no("brakes_stop_car"),
        Rule::finalize(
            "pedal_linkage",
            "Pedal linkage, glazed, frozen calipers, pinched lines, or booster failure.",
        )
        .no("brakes_stop_car")
        .no("pedal_to_floor"),
        Rule::ask("ask_brake_fluid_ok", "brake_fluid_ok", "Is brake fluid level OK?")
            .no("brakes_stop_car")
            .yes("pedal_to_floor"),
        Rule::finalize(
            "fill_and_bleed",
            "Fill to line. If brakes are soft, bleed lines following service manual.",
        )
        .no("brakes_stop_car")
        .yes("pedal_to_floor")
        .no("brake_fluid_ok"),
        Rule::ask("ask_brake_light", "brake_light", "Is the brake warning light on?")
            .no("brakes_stop_car")
            .yes("pedal_to_floor")
            .yes("brake_fluid_ok"),
        Rule::finalize(
            "power_assist",
            "Likely power assist related, see service manual.",
        )
        .no("brakes_stop_car")
        .yes("pedal_to_floor")
        .yes("brake_fluid_ok")
        .no("brake_light"),
        Rule::finalize(
            "booster_or_antilock",
            "If parking brake released see service manual for power booster problem or anti-lock failure.",
        )
        .no("brakes_stop_car")
        .yes("pedal_to_floor")
        .yes("brake_fluid_ok")
        .yes("brake_light"),
        // Brakes stop the car: parking brake branch
        Rule::ask(
            "ask_parking_brake_failure",
            "parking_brake_failure",
            "Is there a parking brake failure?",
        )
        .yes("brakes_stop_car"),
        Rule::ask("ask_rear_wheel_locked", "rear_wheel_locked", "Is rear wheel locked?")
            .yes("brakes_stop_car")
            .yes("parking_brake_failure"),
        Rule::finalize(
            "spring_return",
            "Spring return failure or cable rusted bound.",
        )
        .yes("brakes_stop_car")
        .yes("parking_brake_failure")
        .yes("rear_wheel_locked"),
        Rule::ask(
            "ask_ratchets_without_force",
            "ratchets_without_force",
            "Does it ratchet without force?",
        )
        .yes("brakes_stop_car")
        .yes("parking_brake_failure")
        .no("rear_wheel_locked"),
        Rule::finalize(
            "cable_stretched",
            "Cable stretched or broken, freeze adjuster.",
        )
        .yes("brakes_stop_car")
        .yes("parking_brake_failure")
        .no("rear_wheel_locked")
        .yes("ratchets_without_force"),
        Rule::finalize(
            "shoes_worn",
            "Shoes worn out, glazed, fluid in drums.",
        )
        .yes("brakes_stop_car")
        .yes("parking_brake_failure")
        .no("rear_wheel_locked")
        .no("ratchets_without_force"),
        // Drag and pumping
        Rule::ask("ask_wheel_drag_much", "wheel_drag_much", "Do the wheels drag too much?")
            .yes("brakes_stop_car")
            .no("parking_brake_failure"),
        Rule::finalize(
            "stuck_piston",
            "Stuck piston, hydraulic lock, over adjusted drum shoes, warped rotor.",
        )
        .yes("brakes_stop_car")
        .no("parking_brake_failure")
        .yes("wheel_drag_much"),
        Rule::ask("ask_need_pump_brakes", "need_pump_brakes", "Need to pump up brakes?")
            .yes("brakes_stop_car")
            .no("parking_brake_failure")
            .no("wheel_drag_much"),
        Rule::ask("ask_only_after_turning", "only_after_turning", "Only after turning?")
            .yes("need_pump_brakes"),
        Rule::finalize(
            "wheel_bearings",
            "Front wheel bearings worn; axle loose; wheel lugs loose.",
        )
        .yes("need_pump_brakes")
        .yes("only_after_turning"),
        Rule::finalize("air_or_leak", "Air in system; fluid leak.")
            .yes("need_pump_brakes")
            .no("only_after_turning"),
        // Noise
        Rule::ask("ask_making_noise", "making_noise", "Making noise?")
            .no("wheel_drag_much")
            .no("need_pump_brakes"),
        Rule::ask("ask_squealing", "squealing", "Squealing?").yes("making_noise"),
        Rule::finalize(
            "pads_and_shoes",
            "Check pads and shoes for wear, foreign objects.",
        )
        .yes("making_noise")
        .yes("squealing"),
        Rule::ask("ask_clunks", "clunks", "Clunks?")
            .yes("making_noise")
            .no("squealing"),
        Rule::finalize(
            "caliper_bolt",
            "Caliper bolt loose, suspension problem (see clicking noises diagnostic).",
        )
        .no("squealing")
        .yes("clunks"),
        Rule::ask("ask_scrape_or_grind", "scrape_or_grind", "Scrape or grind?")
            .no("squealing")
            .no("clunks"),
        Rule::finalize(
            "broken_pad",
            "Broken pad or shoe (facing, warning sound) or excessive wear.",
        )
        .no("clunks")
        .yes("scrape_or_grind"),
        Rule::ask("ask_rattles", "rattles", "Rattles?")
            .no("clunks")
            .no("scrape_or_grind"),
        Rule::finalize(
            "anti_rattle_clips",
            "Anti-rattle clips on disc pads missing or installed wrong.",
        )
        .no("scrape_or_grind")
        .yes("rattles"),
        Rule::finalize(
            "rotor_runout",
            "Chirps and ticks that increase with speed due to rotor warp or run out.",
        )
        .no("scrape_or_grind")
        .no("rattles"),
        // Quiet brakes: behaviour
        Rule::ask("ask_brakes_pull", "brakes_pull", "Do brakes pull?").no("making_noise"),
        Rule::finalize(
            "front_brake",
            "Front brake issue - stuck or cocked piston, air or crimp in line, master cylinder problem.",
        )
        .no("making_noise")
        .yes("brakes_pull"),
        Rule::ask("ask_jerky_pulsing", "jerky_pulsing", "Jerky pulsing?")
            .no("making_noise")
            .no("brakes_pull"),
        Rule::finalize(
            "antilock_or_drum",
            "Anti-lock brake issue, deformed drum or rotor (test with parking brake).",
        )
        .no("brakes_pull")
        .yes("jerky_pulsing"),
        Rule::ask("ask_hard_braking", "hard_braking", "Hard braking?")
            .no("brakes_pull")
            .no("jerky_pulsing"),
        Rule::finalize(
            "worn_or_boost",
            "Worn pads, shoes, bound piston, power boost problem.",
        )
        .no("jerky_pulsing")
        .yes("hard_braking"),
        Rule::finalize(
            "warning_light_codes",
            "If brake warning light on and parking brake is released, see service manual for codes.",
        )
        .no("jerky_pulsing")
        .no("hard_braking"),
    ]
}

fn network() -> NetworkDefinition {
    NetworkDefinition::new()
        .category("BrakeEffectiveness", "Issues with braking effectiveness")
        .category("ParkingBrake", "Parking brake issues")
        .category("WheelResistance", "Wheel resistance issues")
        .category("BrakePadOrRotorIssue", "Brake pad or rotor issues")
        .category("BrakeBehavior", "Braking behavior issues")
        .cpt(CptSpec::prior("BrakeEffectiveness", 0.8, 0.2))
        .cpt(CptSpec::prior("ParkingBrake", 0.9, 0.1))
        .cpt(CptSpec::prior("WheelResistance", 0.85, 0.15))
        .cpt(CptSpec::prior("BrakePadOrRotorIssue", 0.75, 0.25))
        .cpt(CptSpec::prior("BrakeBehavior", 0.9, 0.1))
        .single_parent_symptom("brakes_stop_car", "BrakeEffectiveness", [0.9, 0.1], [0.1, 0.9])
        .single_parent_symptom("pedal_to_floor", "BrakeEffectiveness", [0.8, 0.2], [0.2, 0.8])
        .single_parent_symptom("brake_fluid_ok", "BrakeEffectiveness", [0.7, 0.3], [0.3, 0.7])
        .single_parent_symptom("brake_light", "BrakeEffectiveness", [0.6, 0.4], [0.4, 0.6])
        .single_parent_symptom("parking_brake_failure", "ParkingBrake", [0.85, 0.15], [0.15, 0.85])
        .single_parent_symptom("rear_wheel_locked", "ParkingBrake", [0.7, 0.3], [0.3, 0.7])
        .single_parent_symptom("ratchets_without_force", "ParkingBrake", [0.8, 0.2], [0.2, 0.8])
        .single_parent_symptom("wheel_drag_much", "WheelResistance", [0.9, 0.1], [0.1, 0.9])
        .single_parent_symptom("need_pump_brakes", "WheelResistance", [0.7, 0.3], [0.3, 0.7])
        .single_parent_symptom("only_after_turning", "WheelResistance", [0.6, 0.4], [0.4, 0.6])
        .single_parent_symptom("making_noise", "BrakePadOrRotorIssue", [0.9, 0.1], [0.1, 0.9])
        .single_parent_symptom("squealing", "BrakePadOrRotorIssue", [0.8, 0.2], [0.2, 0.8])
        .single_parent_symptom("clunks", "BrakePadOrRotorIssue", [0.7, 0.3], [0.3, 0.7])
        .single_parent_symptom("scrape_or_grind", "BrakePadOrRotorIssue", [0.6, 0.4], [0.4, 0.6])
        .single_parent_symptom("rattles", "BrakePadOrRotorIssue", [0.7, 0.3], [0.3, 0.7])
        .single_parent_symptom("brakes_pull", "BrakeBehavior", [0.8, 0.2], [0.2, 0.8])
        .single_parent_symptom("jerky_pulsing", "BrakeBehavior", [0.7, 0.3], [0.3, 0.7])
}
