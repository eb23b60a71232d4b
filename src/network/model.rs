//! Validated causal model
//!
//! `CausalModel::from_definition` is the only way to obtain a model. Every
//! structural and numeric check runs once, at construction; inference relies
//! on the result without re-checking.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;

use super::errors::{ModelError, ModelResult};
use super::types::{CptSpec, NetworkDefinition, NodeKind};

/// Maximum deviation from 1 tolerated when summing a CPT column
pub const CPT_TOLERANCE: f64 = 1e-6;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Checks whether `name` is usable as a node name or question key.
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// Conditional probability table in column order of `Node::parents`
#[derive(Debug, Clone, PartialEq)]
pub struct Cpt {
    false_row: Vec<f64>,
    true_row: Vec<f64>,
}

impl Cpt {
    /// P(node = `state` | parent assignment `column`)
    pub fn probability(&self, state: bool, column: usize) -> f64 {
        if state {
            self.true_row[column]
        } else {
            self.false_row[column]
        }
    }

    /// Number of parent assignments
    pub fn columns(&self) -> usize {
        self.true_row.len()
    }
}

/// A validated network variable
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    kind: NodeKind,
    label: Option<String>,
    parents: Vec<usize>,
    cpt: Cpt,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Display label; falls back to the node name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Parent node indices in CPT column order
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn cpt(&self) -> &Cpt {
        &self.cpt
    }

    pub fn is_category(&self) -> bool {
        self.kind == NodeKind::Category
    }
}

/// Validated discrete Bayesian network over binary variables.
#[derive(Debug, Clone)]
pub struct CausalModel {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    categories: Vec<usize>,
    topological: Vec<usize>,
}

impl CausalModel {
    /// Validates `definition` and builds the model.
    ///
    /// Checks, in order: node names, duplicate nodes, presence of a
    /// category, edge endpoints, duplicate edges, acyclicity, CPT coverage,
    /// CPT parent sets, CPT shape, CPT value range, CPT column sums, and
    /// symptom parents.
    pub fn from_definition(definition: &NetworkDefinition) -> ModelResult<Self> {
        let mut index = HashMap::with_capacity(definition.nodes.len());
        for (i, spec) in definition.nodes.iter().enumerate() {
            if !is_valid_name(&spec.name) {
                return Err(ModelError::invalid_name(&spec.name));
            }
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(ModelError::duplicate_node(&spec.name));
            }
        }

        let categories: Vec<usize> = definition
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.kind == NodeKind::Category)
            .map(|(i, _)| i)
            .collect();
        if categories.is_empty() {
            return Err(ModelError::no_categories());
        }

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let handles: Vec<NodeIndex> = (0..definition.nodes.len())
            .map(|i| graph.add_node(i))
            .collect();

        let mut parent_sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); definition.nodes.len()];
        for (parent, child) in &definition.edges {
            let context = format!("edge '{}' -> '{}'", parent, child);
            let p = *index
                .get(parent)
                .ok_or_else(|| ModelError::unknown_node(parent, &context))?;
            let c = *index
                .get(child)
                .ok_or_else(|| ModelError::unknown_node(child, &context))?;
            if !parent_sets[c].insert(p) {
                return Err(ModelError::duplicate_edge(parent, child));
            }
            graph.add_edge(handles[p], handles[c], ());
        }

        let topological: Vec<usize> = toposort(&graph, None)
            .map_err(|cycle| ModelError::cyclic(&definition.nodes[graph[cycle.node_id()]].name))?
            .into_iter()
            .map(|handle| graph[handle])
            .collect();

        let mut cpts: Vec<Option<&CptSpec>> = vec![None; definition.nodes.len()];
        for cpt in &definition.cpts {
            let context = format!("CPT of '{}'", cpt.variable);
            let i = *index
                .get(&cpt.variable)
                .ok_or_else(|| ModelError::unknown_node(&cpt.variable, &context))?;
            if cpts[i].replace(cpt).is_some() {
                return Err(ModelError::duplicate_cpt(&cpt.variable));
            }
        }

        let mut nodes = Vec::with_capacity(definition.nodes.len());
        for (i, spec) in definition.nodes.iter().enumerate() {
            let cpt_spec = cpts[i].ok_or_else(|| ModelError::missing_cpt(&spec.name))?;
            let parents = Self::resolve_parents(&spec.name, cpt_spec, &parent_sets[i], &index, definition)?;
            let cpt = Self::validate_cpt(&spec.name, cpt_spec, parents.len())?;

            if spec.kind == NodeKind::Symptom && parents.is_empty() {
                return Err(ModelError::orphan_symptom(&spec.name));
            }

            nodes.push(Node {
                name: spec.name.clone(),
                kind: spec.kind,
                label: spec.label.clone(),
                parents,
                cpt,
            });
        }

        Ok(Self {
            nodes,
            index,
            categories,
            topological,
        })
    }

    /// Maps the CPT's evidence list to node indices and checks it names
    /// exactly the parents declared by edges.
    fn resolve_parents(
        name: &str,
        cpt: &CptSpec,
        declared: &BTreeSet<usize>,
        index: &HashMap<String, usize>,
        definition: &NetworkDefinition,
    ) -> ModelResult<Vec<usize>> {
        let mismatch = || {
            let expected: Vec<String> = declared
                .iter()
                .map(|&p| definition.nodes[p].name.clone())
                .collect();
            ModelError::cpt_parent_mismatch(name, &expected, &cpt.evidence)
        };

        let mut parents = Vec::with_capacity(cpt.evidence.len());
        let mut seen = HashSet::with_capacity(cpt.evidence.len());
        for parent in &cpt.evidence {
            let p = *index.get(parent).ok_or_else(mismatch)?;
            if !declared.contains(&p) || !seen.insert(p) {
                return Err(mismatch());
            }
            parents.push(p);
        }
        if parents.len() != declared.len() {
            return Err(mismatch());
        }
        Ok(parents)
    }

    fn validate_cpt(name: &str, cpt: &CptSpec, parent_count: usize) -> ModelResult<Cpt> {
        if cpt.values.len() != 2 {
            return Err(ModelError::cpt_shape(
                name,
                format!("expected 2 rows, found {}", cpt.values.len()),
            ));
        }
        let columns = 1usize << parent_count;
        for row in &cpt.values {
            if row.len() != columns {
                return Err(ModelError::cpt_shape(
                    name,
                    format!("expected {} columns, found {}", columns, row.len()),
                ));
            }
            if let Some(&bad) = row.iter().find(|v| !v.is_finite() || **v < 0.0 || **v > 1.0) {
                return Err(ModelError::cpt_out_of_range(name, bad));
            }
        }

        let false_row = cpt.values[0].clone();
        let true_row = cpt.values[1].clone();
        for column in 0..columns {
            let sum = false_row[column] + true_row[column];
            if (sum - 1.0).abs() > CPT_TOLERANCE {
                return Err(ModelError::cpt_not_normalized(name, column, sum));
            }
        }

        Ok(Cpt {
            false_row,
            true_row,
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Category nodes in declaration order
    pub fn categories(&self) -> impl Iterator<Item = &Node> {
        self.categories.iter().map(|&i| &self.nodes[i])
    }

    pub fn category_indices(&self) -> &[usize] {
        &self.categories
    }

    /// Node indices with every parent before its children
    pub fn topological_order(&self) -> &[usize] {
        &self.topological
    }

    /// Marks `seeds` and all of their ancestors.
    pub fn ancestral_closure(&self, seeds: impl IntoIterator<Item = usize>) -> Vec<bool> {
        let mut marked = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = seeds.into_iter().collect();
        while let Some(i) = stack.pop() {
            if marked[i] {
                continue;
            }
            marked[i] = true;
            stack.extend(self.nodes[i].parents.iter().copied());
        }
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::errors::ModelErrorCode;
    use crate::network::types::CptSpec;

    fn small() -> NetworkDefinition {
        NetworkDefinition::new()
            .category("Fuel", "Fuel system")
            .cpt(CptSpec::prior("Fuel", 0.9, 0.1))
            .single_parent_symptom("fuel_to_filter", "Fuel", [0.95, 0.05], [0.5, 0.5])
    }

    fn code_of(def: &NetworkDefinition) -> ModelErrorCode {
        CausalModel::from_definition(def).unwrap_err().code()
    }

    #[test]
    fn test_valid_model() {
        let model = CausalModel::from_definition(&small()).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.categories().count(), 1);
        let symptom = model.node(model.node_index("fuel_to_filter").unwrap());
        assert_eq!(symptom.parents(), &[0]);
        assert_eq!(symptom.cpt().probability(true, 1), 0.5);
        assert_eq!(model.topological_order(), &[0, 1]);
    }

    #[test]
    fn test_invalid_name() {
        let def = small().symptom("bad name");
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelInvalidName);
    }

    #[test]
    fn test_duplicate_node() {
        let def = small().category("Fuel", "again");
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelDuplicateNode);
    }

    #[test]
    fn test_no_categories() {
        let def = NetworkDefinition::new()
            .symptom("x")
            .cpt(CptSpec::prior("x", 0.5, 0.5));
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelNoCategories);
    }

    #[test]
    fn test_unknown_edge_endpoint() {
        let def = small().edge("Ghost", "fuel_to_filter");
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelUnknownNode);
    }

    #[test]
    fn test_duplicate_edge() {
        let def = small().edge("Fuel", "fuel_to_filter");
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelDuplicateEdge);
    }

    #[test]
    fn test_cycle_rejected() {
        let def = NetworkDefinition::new()
            .category("A", "A")
            .category("B", "B")
            .edge("A", "B")
            .edge("B", "A")
            .cpt(CptSpec::conditional("A", &["B"], &[0.5, 0.5], &[0.5, 0.5]))
            .cpt(CptSpec::conditional("B", &["A"], &[0.5, 0.5], &[0.5, 0.5]));
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelCyclic);
    }

    #[test]
    fn test_missing_cpt() {
        let def = small().symptom("orphan_table").edge("Fuel", "orphan_table");
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelMissingCpt);
    }

    #[test]
    fn test_duplicate_cpt() {
        let def = small().cpt(CptSpec::prior("Fuel", 0.5, 0.5));
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelDuplicateCpt);
    }

    #[test]
    fn test_cpt_parent_mismatch() {
        let def = NetworkDefinition::new()
            .category("Fuel", "Fuel")
            .category("Spark", "Spark")
            .cpt(CptSpec::prior("Fuel", 0.9, 0.1))
            .cpt(CptSpec::prior("Spark", 0.9, 0.1))
            .symptom("fires")
            .edge("Fuel", "fires")
            .cpt(CptSpec::conditional("fires", &["Spark"], &[0.9, 0.1], &[0.1, 0.9]));
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelCptParentMismatch);
    }

    #[test]
    fn test_cpt_shape() {
        let mut def = small();
        def.cpts[0].values = vec![vec![0.9, 0.1], vec![0.1, 0.9]];
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelCptShape);

        let mut def = small();
        def.cpts[0].values = vec![vec![1.0]];
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelCptShape);
    }

    #[test]
    fn test_cpt_out_of_range() {
        let mut def = small();
        def.cpts[0].values = vec![vec![1.2], vec![-0.2]];
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelCptOutOfRange);
    }

    #[test]
    fn test_cpt_not_normalized() {
        let mut def = small();
        def.cpts[1].values = vec![vec![0.95, 0.5], vec![0.05, 0.4]];
        let err = CausalModel::from_definition(&def).unwrap_err();
        assert_eq!(err.code(), ModelErrorCode::DiagModelCptNotNormalized);
        assert_eq!(err.node(), Some("fuel_to_filter"));
    }

    #[test]
    fn test_cpt_tolerance_accepts_rounding() {
        let mut def = small();
        def.cpts[0].values = vec![vec![0.9 + 5e-7], vec![0.1]];
        assert!(CausalModel::from_definition(&def).is_ok());
    }

    #[test]
    fn test_orphan_symptom() {
        let def = small()
            .symptom("loose")
            .cpt(CptSpec::prior("loose", 0.5, 0.5));
        assert_eq!(code_of(&def), ModelErrorCode::DiagModelOrphanSymptom);
    }

    #[test]
    fn test_category_may_have_category_parent() {
        let def = NetworkDefinition::new()
            .category("Battery", "Battery")
            .category("Ignition", "Ignition")
            .edge("Battery", "Ignition")
            .cpt(CptSpec::prior("Battery", 0.85, 0.15))
            .cpt(CptSpec::conditional("Ignition", &["Battery"], &[0.9, 0.3], &[0.1, 0.7]));
        let model = CausalModel::from_definition(&def).unwrap();
        assert_eq!(model.categories().count(), 2);
    }

    #[test]
    fn test_ancestral_closure() {
        let model = CausalModel::from_definition(&small()).unwrap();
        let marked = model.ancestral_closure([1]);
        assert_eq!(marked, vec![true, true]);
        let marked = model.ancestral_closure([0]);
        assert_eq!(marked, vec![true, false]);
    }
}
