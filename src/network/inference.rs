//! Exact inference by variable elimination
//!
//! # Procedure
//!
//! 1. Resolve observations to node indices; keys the model does not contain
//!    are ignored.
//! 2. Keep only the query, the evidence nodes and their ancestors. Every
//!    other node is barren and sums to 1.
//! 3. Build one factor per kept node and reduce it by the evidence.
//! 4. Eliminate the remaining hidden nodes, each time choosing the node whose
//!    combined factor is smallest (ties broken by node index).
//! 5. Multiply what is left and normalize.
//!
//! The elimination order is a pure function of the model and the evidence
//! key set, so repeated queries produce bit-identical results.

use std::collections::BTreeMap;

use serde::Serialize;

use super::errors::{ModelError, ModelResult};
use super::factor::Factor;
use super::model::CausalModel;
use crate::evidence::Observations;

/// Posterior of one category node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub label: String,
    /// P(category = true | evidence)
    pub probability: f64,
}

/// Independent per-category posteriors in declaration order.
///
/// These are marginals of separate variables, so they do not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScores {
    scores: Vec<CategoryScore>,
}

impl CategoryScores {
    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.probability)
    }

    /// Highest posterior; the earliest declared category wins ties.
    pub fn most_probable(&self) -> Option<&CategoryScore> {
        let mut best: Option<&CategoryScore> = None;
        for score in &self.scores {
            match best {
                Some(current) if score.probability <= current.probability => {}
                _ => best = Some(score),
            }
        }
        best
    }

    /// Category name → posterior
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.scores
            .iter()
            .map(|s| (s.category.clone(), s.probability))
            .collect()
    }
}

/// Variable elimination over a validated model.
#[derive(Debug, Clone, Copy)]
pub struct VariableElimination<'m> {
    model: &'m CausalModel,
}

impl<'m> VariableElimination<'m> {
    pub fn new(model: &'m CausalModel) -> Self {
        Self { model }
    }

    /// P(`query` = true | observations)
    pub fn marginal(&self, query: &str, observations: &Observations) -> ModelResult<f64> {
        let index = self
            .model
            .node_index(query)
            .ok_or_else(|| ModelError::unknown_query(query))?;
        let evidence = self.resolve(observations);
        self.marginal_of(index, &evidence)
    }

    /// Posterior of every category node.
    pub fn score(&self, observations: &Observations) -> ModelResult<CategoryScores> {
        let evidence = self.resolve(observations);
        let scores = self
            .model
            .category_indices()
            .iter()
            .map(|&index| {
                let node = self.model.node(index);
                Ok(CategoryScore {
                    category: node.name().to_string(),
                    label: node.label().to_string(),
                    probability: self.marginal_of(index, &evidence)?,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(CategoryScores { scores })
    }

    /// Observation keys the model does not contain
    pub fn unmodelled<'o>(&self, observations: &'o Observations) -> Vec<&'o str> {
        observations
            .keys()
            .filter(|key| !self.model.contains(key))
            .map(String::as_str)
            .collect()
    }

    fn resolve(&self, observations: &Observations) -> Vec<(usize, bool)> {
        observations
            .iter()
            .filter_map(|(key, &state)| self.model.node_index(key).map(|i| (i, state)))
            .collect()
    }

    fn marginal_of(&self, query: usize, evidence: &[(usize, bool)]) -> ModelResult<f64> {
        if let Some(&(_, state)) = evidence.iter().find(|(i, _)| *i == query) {
            return Ok(if state { 1.0 } else { 0.0 });
        }

        let relevant = self
            .model
            .ancestral_closure(std::iter::once(query).chain(evidence.iter().map(|(i, _)| *i)));

        let mut factors: Vec<Factor> = Vec::new();
        let mut hidden: Vec<usize> = Vec::new();
        for (index, node) in self.model.nodes().iter().enumerate() {
            if !relevant[index] {
                continue;
            }
            let factor = evidence
                .iter()
                .fold(Factor::from_node(index, node), |f, &(var, state)| {
                    f.reduce(var, state)
                });
            factors.push(factor);
            if index != query && !evidence.iter().any(|(i, _)| *i == index) {
                hidden.push(index);
            }
        }

        while !hidden.is_empty() {
            let (position, var) = Self::next_to_eliminate(&hidden, &factors);
            hidden.remove(position);

            let (involved, rest): (Vec<Factor>, Vec<Factor>) =
                factors.into_iter().partition(|f| f.contains(var));
            factors = rest;
            if let Some(combined) = Self::product_all(&involved) {
                factors.push(combined.sum_out(var));
            }
        }

        // Only the query remains in scope; scalar factors cancel on normalization
        // unless the evidence is impossible, in which case they zero the total.
        let name = self.model.node(query).name();
        let result = Self::product_all(&factors).ok_or_else(|| ModelError::impossible_evidence(name))?;

        let yes = result.value_of(true);
        let total = result.value_of(false) + yes;
        if !(total.is_finite() && total > 0.0) {
            return Err(ModelError::impossible_evidence(name));
        }
        Ok(yes / total)
    }

    fn product_all(factors: &[Factor]) -> Option<Factor> {
        let (first, rest) = factors.split_first()?;
        Some(rest.iter().fold(first.clone(), |acc, f| acc.product(f)))
    }

    /// Picks the hidden node whose combined factor has the fewest variables.
    fn next_to_eliminate(hidden: &[usize], factors: &[Factor]) -> (usize, usize) {
        let mut best = (0, hidden[0], usize::MAX);
        for (position, &var) in hidden.iter().enumerate() {
            let mut scope: Vec<usize> = Vec::new();
            for factor in factors.iter().filter(|f| f.contains(var)) {
                for &v in factor.vars() {
                    if !scope.contains(&v) {
                        scope.push(v);
                    }
                }
            }
            let size = scope.len();
            if size < best.2 || (size == best.2 && var < best.1) {
                best = (position, var, size);
            }
        }
        (best.0, best.1)
    }
}
