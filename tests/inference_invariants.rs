//! Inference Invariant Tests
//!
//! Variable elimination against brute-force enumeration of the joint
//! distribution on small random networks:
//! - posteriors match the enumerated joint
//! - posteriors stay within [0, 1]
//! - unknown observation keys change nothing
//! - zero-probability evidence is reported, not divided by

use proptest::prelude::*;

use vehidiag::evidence::Observations;
use vehidiag::network::{CausalModel, CptSpec, ModelErrorCode, NetworkDefinition, VariableElimination};

const SYMPTOMS: [&str; 3] = ["s0", "s1", "s2"];

// =============================================================================
// Helper Functions
// =============================================================================

/// Two categories, C1 optionally conditioned on C0, and three symptoms whose
/// parents are picked by bit masks over {C0, C1}.
fn build_network(
    p_c0: f64,
    p_c1: [f64; 2],
    chained: bool,
    masks: [u8; 3],
    symptom_true: [[f64; 4]; 3],
) -> CausalModel {
    let mut def = NetworkDefinition::new()
        .category("C0", "First cause")
        .category("C1", "Second cause")
        .cpt(CptSpec::prior("C0", 1.0 - p_c0, p_c0));

    def = if chained {
        def.edge("C0", "C1").cpt(CptSpec::conditional(
            "C1",
            &["C0"],
            &[1.0 - p_c1[0], 1.0 - p_c1[1]],
            &p_c1,
        ))
    } else {
        def.cpt(CptSpec::prior("C1", 1.0 - p_c1[0], p_c1[0]))
    };

    for (i, name) in SYMPTOMS.iter().enumerate() {
        let parents: Vec<&str> = [("C0", 1u8), ("C1", 2u8)]
            .iter()
            .filter(|(_, bit)| masks[i] & bit != 0)
            .map(|(p, _)| *p)
            .collect();
        let columns = 1usize << parents.len();
        let true_row: Vec<f64> = symptom_true[i][..columns].to_vec();
        let false_row: Vec<f64> = true_row.iter().map(|p| 1.0 - p).collect();

        def = def.symptom(name);
        for parent in &parents {
            def = def.edge(parent, name);
        }
        def = def.cpt(CptSpec::conditional(*name, &parents, &false_row, &true_row));
    }

    CausalModel::from_definition(&def).unwrap()
}

fn observations(evidence: &[Option<bool>; 3]) -> Observations {
    SYMPTOMS
        .iter()
        .zip(evidence.iter())
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
}

/// P(`query` = true | observations) by summing the full joint.
fn brute_force(model: &CausalModel, query: &str, observations: &Observations) -> f64 {
    let nodes = model.nodes();
    let query = model.node_index(query).unwrap();
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for assignment in 0u32..(1 << nodes.len()) {
        let state = |i: usize| assignment & (1 << i) != 0;

        let consistent = observations
            .iter()
            .all(|(key, &value)| state(model.node_index(key).unwrap()) == value);
        if !consistent {
            continue;
        }

        let joint: f64 = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let column = node
                    .parents()
                    .iter()
                    .fold(0usize, |col, &p| (col << 1) | state(p) as usize);
                node.cpt().probability(state(i), column)
            })
            .product();

        denominator += joint;
        if state(query) {
            numerator += joint;
        }
    }

    numerator / denominator
}

fn network_strategy() -> impl Strategy<Value = CausalModel> {
    (
        0.05f64..0.95,
        prop::array::uniform2(0.05f64..0.95),
        any::<bool>(),
        prop::array::uniform3(1u8..4),
        prop::array::uniform3(prop::array::uniform4(0.05f64..0.95)),
    )
        .prop_map(|(p_c0, p_c1, chained, masks, symptom_true)| {
            build_network(p_c0, p_c1, chained, masks, symptom_true)
        })
}

fn evidence_strategy() -> impl Strategy<Value = [Option<bool>; 3]> {
    prop::array::uniform3(prop::option::of(any::<bool>()))
}

// =============================================================================
// Exactness
// =============================================================================
proptest! {
    #[test]
    fn posteriors_match_enumeration(model in network_strategy(), evidence in evidence_strategy()) {
        let observations = observations(&evidence);
        let engine = VariableElimination::new(&model);
        let scores = engine.score(&observations).unwrap();

        for category in ["C0", "C1"] {
            let expected = brute_force(&model, category, &observations);
            let actual = scores.get(category).unwrap();
            prop_assert!(
                (expected - actual).abs() < 1e-9,
                "{}: expected {}, got {}", category, expected, actual
            );
        }
    }

    #[test]
    fn symptom_marginals_match_enumeration(model in network_strategy(), evidence in evidence_strategy()) {
        let mut partial = evidence;
        partial[2] = None;
        let observations = observations(&partial);
        let engine = VariableElimination::new(&model);

        let expected = brute_force(&model, "s2", &observations);
        let actual = engine.marginal("s2", &observations).unwrap();
        prop_assert!((expected - actual).abs() < 1e-9);
    }
}

// =============================================================================
// Bounds and Ignored Keys
// =============================================================================
proptest! {
    #[test]
    fn posteriors_are_probabilities(model in network_strategy(), evidence in evidence_strategy()) {
        let scores = VariableElimination::new(&model).score(&observations(&evidence)).unwrap();
        prop_assert_eq!(scores.len(), 2);
        for score in scores.iter() {
            prop_assert!((0.0..=1.0).contains(&score.probability));
        }
    }

    #[test]
    fn unknown_keys_are_ignored(
        model in network_strategy(),
        evidence in evidence_strategy(),
        extra in any::<bool>()
    ) {
        let engine = VariableElimination::new(&model);
        let base = observations(&evidence);
        let mut extended = base.clone();
        extended.insert("not_in_network".to_string(), extra);

        prop_assert_eq!(engine.score(&base).unwrap(), engine.score(&extended).unwrap());
        prop_assert_eq!(engine.unmodelled(&extended), vec!["not_in_network"]);
    }
}

#[test]
fn test_prior_without_evidence() {
    let model = build_network(0.3, [0.2, 0.6], true, [1, 2, 3], [[0.5; 4]; 3]);
    let engine = VariableElimination::new(&model);
    let scores = engine.score(&Observations::new()).unwrap();

    assert!((scores.get("C0").unwrap() - 0.3).abs() < 1e-12);
    // 0.7 * 0.2 + 0.3 * 0.6
    assert!((scores.get("C1").unwrap() - 0.32).abs() < 1e-12);
}

#[test]
fn test_impossible_evidence() {
    let def = NetworkDefinition::new()
        .category("Fuel", "Fuel")
        .cpt(CptSpec::prior("Fuel", 0.5, 0.5))
        .single_parent_symptom("fuel_smell", "Fuel", [1.0, 0.0], [1.0, 0.0]);
    let model = CausalModel::from_definition(&def).unwrap();

    let mut observations = Observations::new();
    observations.insert("fuel_smell".to_string(), true);

    let err = VariableElimination::new(&model).score(&observations).unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::DiagInferenceImpossibleEvidence);
}

#[test]
fn test_unknown_query() {
    let model = build_network(0.3, [0.2, 0.6], false, [1, 2, 3], [[0.5; 4]; 3]);
    let err = VariableElimination::new(&model)
        .marginal("Transmission", &Observations::new())
        .unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::DiagInferenceUnknownNode);
}

// =============================================================================
// Built-in Models
// =============================================================================

#[test]
fn test_builtin_cpts_are_normalized() {
    for definition in vehidiag::domain::builtin::all() {
        let model = CausalModel::from_definition(&definition.network).unwrap();
        for node in model.nodes() {
            let cpt = node.cpt();
            assert_eq!(cpt.columns(), 1 << node.parents().len(), "{}", node.name());
            for column in 0..cpt.columns() {
                let sum = cpt.probability(false, column) + cpt.probability(true, column);
                assert!((sum - 1.0).abs() < 1e-6, "{} column {}", node.name(), column);
            }
        }
    }
}

#[test]
fn test_builtin_scores_without_evidence_are_priors() {
    for definition in vehidiag::domain::builtin::all() {
        let model = CausalModel::from_definition(&definition.network).unwrap();
        let engine = VariableElimination::new(&model);
        let scores = engine.score(&Observations::new()).unwrap();

        for node in model.categories().filter(|n| n.parents().is_empty()) {
            let prior = node.cpt().probability(true, 0);
            assert!((scores.get(node.name()).unwrap() - prior).abs() < 1e-12);
        }
    }
}
