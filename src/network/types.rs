//! Network definition types
//!
//! A `NetworkDefinition` is the unvalidated, serializable description of a
//! causal model: declared nodes, parent → child edges and one conditional
//! probability table per node.
//!
//! CPT layout: `values[0]` holds P(node = false | parents) and `values[1]`
//! holds P(node = true | parents). Columns enumerate parent assignments with
//! the first listed parent as the most significant bit and the last listed
//! parent varying fastest; state 0 is false ("no"), state 1 is true ("yes").

use serde::{Deserialize, Serialize};

/// Role of a node in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Subsystem-level root cause, scored at diagnosis time
    Category,
    /// Observable yes/no fact, bound to a question key
    Symptom,
}

/// A declared network variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    /// Human-readable category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Conditional probability table for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CptSpec {
    pub variable: String,
    /// Parents the table conditions on, in column order
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Two rows (false, true) of `2^evidence.len()` columns each
    pub values: Vec<Vec<f64>>,
}

impl CptSpec {
    /// Table for a node without parents
    pub fn prior(variable: impl Into<String>, p_false: f64, p_true: f64) -> Self {
        Self {
            variable: variable.into(),
            evidence: Vec::new(),
            values: vec![vec![p_false], vec![p_true]],
        }
    }

    /// Table conditioned on `evidence`
    pub fn conditional(
        variable: impl Into<String>,
        evidence: &[&str],
        false_row: &[f64],
        true_row: &[f64],
    ) -> Self {
        Self {
            variable: variable.into(),
            evidence: evidence.iter().map(|e| e.to_string()).collect(),
            values: vec![false_row.to_vec(), true_row.to_vec()],
        }
    }
}

/// Unvalidated network description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub nodes: Vec<NodeSpec>,
    /// `(parent, child)` pairs
    #[serde(default)]
    pub edges: Vec<(String, String)>,
    pub cpts: Vec<CptSpec>,
}

impl NetworkDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a category node with a display label.
    pub fn category(mut self, name: &str, label: &str) -> Self {
        self.nodes.push(NodeSpec {
            name: name.to_string(),
            kind: NodeKind::Category,
            label: Some(label.to_string()),
        });
        self
    }

    /// Declares a symptom node.
    pub fn symptom(mut self, name: &str) -> Self {
        self.nodes.push(NodeSpec {
            name: name.to_string(),
            kind: NodeKind::Symptom,
            label: None,
        });
        self
    }

    /// Declares a `parent -> child` edge.
    pub fn edge(mut self, parent: &str, child: &str) -> Self {
        self.edges.push((parent.to_string(), child.to_string()));
        self
    }

    /// Adds a CPT.
    pub fn cpt(mut self, cpt: CptSpec) -> Self {
        self.cpts.push(cpt);
        self
    }

    /// Declares a symptom with a single parent together with its edge and CPT.
    ///
    /// `given_false` and `given_true` are `[P(false), P(true)]` for the parent
    /// in state false and true respectively.
    pub fn single_parent_symptom(
        self,
        name: &str,
        parent: &str,
        given_false: [f64; 2],
        given_true: [f64; 2],
    ) -> Self {
        self.symptom(name).edge(parent, name).cpt(CptSpec::conditional(
            name,
            &[parent],
            &[given_false[0], given_true[0]],
            &[given_false[1], given_true[1]],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_declarations() {
        let def = NetworkDefinition::new()
            .category("Battery", "Battery problems")
            .single_parent_symptom("voltage_low", "Battery", [0.9, 0.1], [0.3, 0.7])
            .cpt(CptSpec::prior("Battery", 0.85, 0.15));

        assert_eq!(def.nodes.len(), 2);
        assert_eq!(def.edges, vec![("Battery".to_string(), "voltage_low".to_string())]);
        assert_eq!(def.cpts.len(), 2);
        assert_eq!(def.cpts[0].values, vec![vec![0.9, 0.3], vec![0.1, 0.7]]);
    }

    #[test]
    fn test_definition_json_shape() {
        let json = r#"{
            "nodes": [
                {"name": "Fuel", "kind": "category", "label": "Fuel system"},
                {"name": "fuel_to_filter", "kind": "symptom"}
            ],
            "edges": [["Fuel", "fuel_to_filter"]],
            "cpts": [
                {"variable": "Fuel", "values": [[0.9], [0.1]]},
                {"variable": "fuel_to_filter", "evidence": ["Fuel"], "values": [[0.95, 0.5], [0.05, 0.5]]}
            ]
        }"#;

        let def: NetworkDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.nodes[0].kind, NodeKind::Category);
        assert_eq!(def.nodes[1].label, None);
        assert_eq!(def.cpts[0].evidence, Vec::<String>::new());
        assert_eq!(def.cpts[1].evidence, vec!["Fuel".to_string()]);
    }
}
