//! Brake Scenario Tests
//!
//! End-to-end sessions over the built-in brakes domain:
//! - Known answer paths reach their exact recommendation
//! - Invalid answers leave the session untouched
//! - Completed sessions reject further answers
//! - Category posteriors come from the cached causal model

use std::sync::Arc;

use vehidiag::domain::{builtin, Domain};
use vehidiag::evidence::Observations;
use vehidiag::network::VariableElimination;
use vehidiag::session::{DiagnosticSession, SessionError, SessionState, Step};

// =============================================================================
// Helper Functions
// =============================================================================

fn brakes() -> Arc<Domain> {
    Arc::new(Domain::from_definition(builtin::brakes::definition()).unwrap())
}

fn started() -> DiagnosticSession {
    let mut session = DiagnosticSession::new(brakes());
    session.start().unwrap();
    session
}

fn answer_all(session: &mut DiagnosticSession, answers: &[&str]) -> Step {
    let mut last = None;
    for answer in answers {
        last = Some(session.submit(answer).unwrap());
    }
    last.unwrap()
}

fn observations(pairs: &[(&str, bool)]) -> Observations {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// =============================================================================
// Known Paths
// =============================================================================

/// Brakes don't stop, pedal goes to the floor, fluid is low.
#[test]
fn test_fill_and_bleed_in_three_answers() {
    let mut session = started();
    assert_eq!(
        session.pending_question().unwrap().key,
        "brakes_stop_car"
    );

    let step = answer_all(&mut session, &["no", "yes", "no"]);
    let result = step.diagnosis().unwrap();

    assert_eq!(
        result.message,
        "Fill to line. If brakes are soft, bleed lines following service manual."
    );
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.transcript().len(), 3);
    assert_eq!(session.evidence().len(), 3);
}

/// Brakes stop, parking brake fine, wheels drag.
#[test]
fn test_stuck_piston() {
    let mut session = started();
    let step = answer_all(&mut session, &["yes", "no", "yes"]);

    let keys: Vec<&str> = session.transcript().iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["brakes_stop_car", "parking_brake_failure", "wheel_drag_much"]);
    assert_eq!(
        step.diagnosis().unwrap().message,
        "Stuck piston, hydraulic lock, over adjusted drum shoes, warped rotor."
    );
}

/// Same answers always give the same questions and result.
#[test]
fn test_replay_is_deterministic() {
    let mut first = started();
    let mut second = started();

    let a = answer_all(&mut first, &["no", "yes", "no"]);
    let b = answer_all(&mut second, &["no", "yes", "no"]);

    assert_eq!(a.diagnosis(), b.diagnosis());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_invalid_answer_keeps_pending_question() {
    let mut session = started();
    session.submit("no").unwrap();
    let before = session.pending_question().cloned();

    let err = session.submit("maybe").unwrap_err();
    assert!(matches!(err, SessionError::InvalidAnswer(_)));
    assert_eq!(session.pending_question().cloned(), before);
    assert_eq!(session.evidence().len(), 1);
    assert_eq!(session.state(), SessionState::AwaitingAnswer);
}

#[test]
fn test_completed_session_rejects_answers() {
    let mut session = started();
    answer_all(&mut session, &["no", "yes", "no"]);
    let stored = session.result().cloned();

    for answer in ["yes", "no", "maybe"] {
        let err = session.submit(answer).unwrap_err();
        assert!(matches!(err, SessionError::SessionCompleted(_)));
    }

    assert_eq!(session.result().cloned(), stored);
    assert_eq!(session.evidence().len(), 3);
}

// =============================================================================
// Posteriors
// =============================================================================

/// Only BrakeEffectiveness is connected to the answered symptoms.
#[test]
fn test_fill_and_bleed_posteriors() {
    let domain = brakes();
    let engine = VariableElimination::new(domain.model());
    let scores = engine
        .score(&observations(&[
            ("brakes_stop_car", false),
            ("pedal_to_floor", true),
            ("brake_fluid_ok", false),
        ]))
        .unwrap();

    // 0.2*0.1*0.8*0.3 / (0.2*0.1*0.8*0.3 + 0.8*0.9*0.2*0.7)
    let effectiveness = scores.get("BrakeEffectiveness").unwrap();
    assert!((effectiveness - 0.0048 / 0.1056).abs() < 1e-9);

    assert!((scores.get("ParkingBrake").unwrap() - 0.1).abs() < 1e-9);
    assert!((scores.get("WheelResistance").unwrap() - 0.15).abs() < 1e-9);
    assert!((scores.get("BrakePadOrRotorIssue").unwrap() - 0.25).abs() < 1e-9);
    assert!((scores.get("BrakeBehavior").unwrap() - 0.1).abs() < 1e-9);

    assert_eq!(
        scores.most_probable().unwrap().category,
        "BrakePadOrRotorIssue"
    );

    let total: f64 = scores.iter().map(|s| s.probability).sum();
    assert!((total - 1.0).abs() > 0.1);
}

/// The session result carries the same numbers.
#[test]
fn test_session_result_uses_model_scores() {
    let mut session = started();
    let step = answer_all(&mut session, &["no", "yes", "no"]);
    let result = step.diagnosis().unwrap();

    assert_eq!(result.most_probable_category, "BrakePadOrRotorIssue");
    assert_eq!(result.category_label, "Brake pad or rotor issues");
    assert_eq!(result.category_probabilities.len(), 5);
    let effectiveness = result.probability_of("BrakeEffectiveness").unwrap();
    assert!((effectiveness - 0.0048 / 0.1056).abs() < 1e-9);
}

/// hard_braking is asked but not modelled; inference ignores it.
#[test]
fn test_unmodelled_key_is_ignored() {
    let domain = brakes();
    let engine = VariableElimination::new(domain.model());

    let base = observations(&[("brakes_stop_car", true)]);
    let mut extended = base.clone();
    extended.insert("hard_braking".to_string(), true);

    assert_eq!(engine.score(&base).unwrap(), engine.score(&extended).unwrap());
    assert_eq!(domain.unmodelled_keys(), &["hard_braking".to_string()]);
}
